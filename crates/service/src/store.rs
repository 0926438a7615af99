use async_trait::async_trait;

use crate::errors::StoreError;
use crate::record::Record;

/// The five operations a collection exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Trait abstraction over a record collection, as consumed by HTTP handlers.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Collection name used in logs and metrics.
    fn name(&self) -> &str;
    async fn list(&self) -> Result<Vec<R>, StoreError>;
    async fn get(&self, id: &str) -> Result<R, StoreError>;
    async fn create(&self, candidate: R) -> Result<R, StoreError>;
    async fn update(&self, id: &str, patch: R) -> Result<R, StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
