// Traffic loader - Use case for generating the dashboard's page data
use crate::application::normalize::{normalize_document, SerializationError};
use crate::application::traffic_repository::{StoreError, TrafficRepository};
use crate::domain::traffic::{DashboardData, TrafficKind, TrafficRecord, BOOKKEEPING_FIELDS};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot reach the traffic store: {0}")]
    Connection(String),
    #[error("loading {kind} failed: {message}")]
    Query { kind: TrafficKind, message: String },
    #[error("{kind} record #{index} is not serializable: {source}")]
    Serialization {
        kind: TrafficKind,
        index: usize,
        #[source]
        source: SerializationError,
    },
}

impl LoadError {
    fn from_store(kind: TrafficKind, err: StoreError) -> Self {
        match err {
            StoreError::Connection(message) => LoadError::Connection(message),
            StoreError::Query(message) => LoadError::Query { kind, message },
        }
    }
}

/// Collection names for each record kind.
#[derive(Debug, Clone)]
pub struct Collections {
    pub clones: String,
    pub views: String,
}

impl Collections {
    pub fn name(&self, kind: TrafficKind) -> &str {
        match kind {
            TrafficKind::Clone => &self.clones,
            TrafficKind::View => &self.views,
        }
    }
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            clones: "clones".to_string(),
            views: "views".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct TrafficLoader {
    repository: Arc<dyn TrafficRepository>,
    collections: Collections,
    query_timeout: Option<Duration>,
}

impl TrafficLoader {
    pub fn new(
        repository: Arc<dyn TrafficRepository>,
        collections: Collections,
        query_timeout: Option<Duration>,
    ) -> Self {
        Self {
            repository,
            collections,
            query_timeout,
        }
    }

    pub async fn load(&self) -> Result<DashboardData, LoadError> {
        // Whatever the store reports here, the session could not be opened
        self.repository.connect().await.map_err(|e| match e {
            StoreError::Connection(message) | StoreError::Query(message) => {
                LoadError::Connection(message)
            }
        })?;

        let (clones, views) = futures::try_join!(
            self.load_kind(TrafficKind::Clone),
            self.load_kind(TrafficKind::View),
        )?;

        tracing::info!(
            clones = clones.len(),
            views = views.len(),
            "Loaded traffic records"
        );

        Ok(DashboardData::new(clones, views))
    }

    async fn load_kind(&self, kind: TrafficKind) -> Result<Vec<TrafficRecord>, LoadError> {
        let collection = self.collections.name(kind);
        let query = self.repository.find_all(collection, &BOOKKEEPING_FIELDS);

        let documents = match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .map_err(|_| LoadError::Query {
                    kind,
                    message: format!("no answer from {collection} within {limit:?}"),
                })?,
            None => query.await,
        }
        .map_err(|e| LoadError::from_store(kind, e))?;

        tracing::debug!("Fetched {} documents from {}", documents.len(), collection);

        documents
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                normalize_document(doc).map_err(|source| LoadError::Serialization {
                    kind,
                    index,
                    source,
                })
            })
            .collect()
    }
}
