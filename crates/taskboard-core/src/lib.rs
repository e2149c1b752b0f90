pub mod models;
pub mod graph;
pub mod source;
pub mod reports;
pub mod error;

// Re-exports
pub use models::{Comment, EntityId, Project, Tag, Task, Team, User};
pub use graph::{EntityGraph, GraphSnapshot, ProjectMember, TaskTag, TeamMember};
pub use source::GraphSource;
pub use reports::{ReportKind, ReportOutput, Reports};
pub use error::{Error, Result};
