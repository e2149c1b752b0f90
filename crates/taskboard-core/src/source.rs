use crate::graph::EntityGraph;
use crate::Result;
use async_trait::async_trait;

/// Anything that can hand the reports a populated entity graph.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Load a consistent snapshot of every entity and relation.
    async fn load_graph(&self) -> Result<EntityGraph>;
}

#[async_trait]
impl GraphSource for EntityGraph {
    async fn load_graph(&self) -> Result<EntityGraph> {
        Ok(self.clone())
    }
}
