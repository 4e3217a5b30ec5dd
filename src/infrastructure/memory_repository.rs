// In-memory repository, optionally seeded from a JSON file
use crate::application::traffic_repository::{Document, StoreError, TrafficRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Collections keyed by name. Unknown collections read as empty.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: impl Into<String>, documents: Vec<Document>) -> Self {
        self.collections.insert(name.into(), documents);
        self
    }

    /// Reads `{ "<collection>": [documents...] }`.
    pub async fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let collections: HashMap<String, Vec<Document>> = serde_json::from_slice(&bytes)?;
        tracing::info!(
            "Seeded in-memory store from {} ({} collections)",
            path.display(),
            collections.len()
        );
        Ok(Self { collections })
    }
}

#[async_trait]
impl TrafficRepository for MemoryRepository {
    async fn connect(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(
        &self,
        collection: &str,
        exclude_fields: &[&str],
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .cloned()
                    .map(|mut doc| {
                        for field in exclude_fields {
                            doc.remove(*field);
                        }
                        doc
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(documents)
    }
}
