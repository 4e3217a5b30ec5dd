// MongoDB repository implementation
use crate::application::traffic_repository::{Document, StoreError, TrafficRepository};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;

const APP_NAME: &str = "repo-traffic-dashboard";

#[derive(Debug)]
pub struct MongoRepository {
    uri: String,
    database: String,
    server_selection_timeout: Option<Duration>,
    client: OnceCell<Client>,
}

impl MongoRepository {
    pub fn new(uri: String, database: String, server_selection_timeout: Option<Duration>) -> Self {
        Self {
            uri,
            database,
            server_selection_timeout,
            client: OnceCell::new(),
        }
    }

    /// One client per process. A failed attempt is not cached, so the next
    /// call tries again.
    async fn client(&self) -> Result<&Client, StoreError> {
        self.client
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.uri)
                    .await
                    .map_err(|e| StoreError::Connection(format!("invalid MongoDB URI: {e}")))?;
                options.app_name = Some(APP_NAME.to_string());
                if self.server_selection_timeout.is_some() {
                    options.server_selection_timeout = self.server_selection_timeout;
                }

                let client = Client::with_options(options)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;

                // The driver connects lazily; ping so bad hosts and credentials surface here
                client
                    .database(&self.database)
                    .run_command(doc! { "ping": 1 })
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;

                tracing::info!("Connected to MongoDB database {}", self.database);
                Ok(client)
            })
            .await
    }
}

fn exclusion_projection(exclude_fields: &[&str]) -> bson::Document {
    exclude_fields
        .iter()
        .map(|field| (field.to_string(), Bson::Int32(0)))
        .collect()
}

/// Relaxed extended JSON keeps `$oid` and `$date` wrappers for the normalizer.
fn to_json_document(document: bson::Document) -> Result<Document, StoreError> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Query(format!("unexpected document shape: {other}"))),
    }
}

fn query_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Authentication { .. }
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Io(_) => StoreError::Connection(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

#[async_trait]
impl TrafficRepository for MongoRepository {
    async fn connect(&self) -> Result<(), StoreError> {
        self.client().await.map(|_| ())
    }

    async fn find_all(
        &self,
        collection: &str,
        exclude_fields: &[&str],
    ) -> Result<Vec<Document>, StoreError> {
        let client = self.client().await?;

        tracing::debug!("Executing find on {}.{}", self.database, collection);
        let cursor = client
            .database(&self.database)
            .collection::<bson::Document>(collection)
            .find(doc! {})
            .projection(exclusion_projection(exclude_fields))
            .await
            .map_err(query_error)?;

        let documents: Vec<bson::Document> = cursor.try_collect().await.map_err(query_error)?;
        documents.into_iter().map(to_json_document).collect()
    }
}
