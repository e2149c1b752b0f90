use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::{Comment, Project, ProjectMember, Tag, Task, TaskTag, Team, TeamMember, User};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamRecord {
    pub id: i64,
    pub name: String,
    pub project_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub project_id: i64,
    pub creator_id: i64,
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentRecord {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub task_id: i64,
    pub author_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct TaskTagRecord {
    pub task_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct ProjectMemberRecord {
    pub project_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct TeamMemberRecord {
    pub team_id: i64,
    pub user_id: i64,
}

/// Row counts of every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TableCounts {
    pub projects: i64,
    pub teams: i64,
    pub users: i64,
    pub tasks: i64,
    pub tags: i64,
    pub comments: i64,
    pub task_tags: i64,
    pub project_members: i64,
    pub team_members: i64,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
        }
    }
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            project_id: record.project_id,
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            project_id: record.project_id,
            creator_id: record.creator_id,
            assignee_id: record.assignee_id,
        }
    }
}

impl From<TagRecord> for Tag {
    fn from(record: TagRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            created_at: record.created_at,
            task_id: record.task_id,
            author_id: record.author_id,
        }
    }
}

impl From<TaskTagRecord> for TaskTag {
    fn from(record: TaskTagRecord) -> Self {
        Self {
            task_id: record.task_id,
            tag_id: record.tag_id,
        }
    }
}

impl From<ProjectMemberRecord> for ProjectMember {
    fn from(record: ProjectMemberRecord) -> Self {
        Self {
            project_id: record.project_id,
            user_id: record.user_id,
        }
    }
}

impl From<TeamMemberRecord> for TeamMember {
    fn from(record: TeamMemberRecord) -> Self {
        Self {
            team_id: record.team_id,
            user_id: record.user_id,
        }
    }
}
