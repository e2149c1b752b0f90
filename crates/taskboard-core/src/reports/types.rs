//! Row shapes produced by the reports.

use crate::models::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project with its task and member totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: EntityId,
    pub name: String,
    pub description: String,
    pub task_count: usize,
    /// Distinct users that belong to the project directly or through one of its teams.
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentedTask {
    pub task_id: EntityId,
    pub title: String,
    pub comment_count: usize,
}

/// User with the number of created tasks carrying a given tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreator {
    pub user_id: EntityId,
    pub name: String,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUsage {
    pub tag_id: EntityId,
    pub tag: String,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfAssignedTask {
    pub task_id: EntityId,
    pub title: String,
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDigest {
    pub comment_id: EntityId,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestComment {
    pub task_id: EntityId,
    pub task_title: String,
    pub comment: CommentDigest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedTask {
    pub task_id: EntityId,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCommentCount {
    pub user_id: EntityId,
    pub name: String,
    pub comment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTaskRank {
    pub team_id: EntityId,
    pub name: String,
    pub created_tasks: usize,
    pub assigned_tasks: usize,
}

impl TeamTaskRank {
    pub fn total(&self) -> usize {
        self.created_tasks + self.assigned_tasks
    }
}

/// One commenter row; equality covers every field, which is what
/// duplicate elimination compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryCommenter {
    pub user_name: String,
    pub user_email: String,
    pub task_title: String,
    pub project_name: String,
    pub team_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTopTag {
    pub user_id: EntityId,
    pub user: String,
    pub tag: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCommentAverage {
    pub project_id: EntityId,
    pub name: String,
    pub task_count: usize,
    pub average_comments: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignCommenter {
    pub user_id: EntityId,
    pub name: String,
}
