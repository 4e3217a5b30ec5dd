// Repository trait for traffic document access
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A raw store document in extended-JSON form.
pub type Document = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait TrafficRepository: Send + Sync {
    /// Establish the store session. Calling it again reuses the session.
    async fn connect(&self) -> Result<(), StoreError>;

    /// Read every document of a collection, with `exclude_fields` projected away
    async fn find_all(
        &self,
        collection: &str,
        exclude_fields: &[&str],
    ) -> Result<Vec<Document>, StoreError>;
}
