use thiserror::Error;

use crate::models::EntityId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: EntityId },

    #[error("{entity} {id} references missing {target} {target_id}")]
    DanglingReference {
        entity: &'static str,
        id: EntityId,
        target: &'static str,
        target_id: EntityId,
    },

    #[error("{relation} link {left}-{right} references missing {target} {target_id}")]
    DanglingLink {
        relation: &'static str,
        left: EntityId,
        right: EntityId,
        target: &'static str,
        target_id: EntityId,
    },

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Graph source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
