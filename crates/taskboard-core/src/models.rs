use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EntityId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub project_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: EntityId,
    pub creator_id: EntityId,
    #[serde(default)]
    pub assignee_id: Option<EntityId>,
}

impl Task {
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        project_id: EntityId,
        creator_id: EntityId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            project_id,
            creator_id,
            assignee_id: None,
        }
    }

    pub fn with_assignee(mut self, assignee_id: EntityId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// True when the task has an assignee and it is the creator.
    pub fn is_self_assigned(&self) -> bool {
        self.assignee_id == Some(self.creator_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub task_id: EntityId,
    pub author_id: EntityId,
}
