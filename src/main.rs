// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use repo_traffic_dashboard::application::page_service::PageService;
use repo_traffic_dashboard::application::traffic_loader::{Collections, TrafficLoader};
use repo_traffic_dashboard::application::traffic_repository::TrafficRepository;
use repo_traffic_dashboard::infrastructure::config::{load_app_config, StoreKind, StoreSettings};
use repo_traffic_dashboard::infrastructure::memory_repository::MemoryRepository;
use repo_traffic_dashboard::infrastructure::mongo_repository::MongoRepository;
use repo_traffic_dashboard::{router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = build_repository(&config.store).await?;

    // Create services (application layer)
    let collections = Collections {
        clones: config.store.clones_collection.clone(),
        views: config.store.views_collection.clone(),
    };
    let loader = TrafficLoader::new(repository, collections, config.store.query_timeout());
    let page_service = PageService::new(loader, config.dashboard.revalidate_after())
        .with_retry_after(config.dashboard.retry_after());

    // Generate the page data once up front
    let snapshot = page_service.generate().await;
    if let Some(notice) = &snapshot.notice {
        tracing::warn!("Serving fallback dashboard: {}", notice);
    }

    let state = Arc::new(AppState {
        page_service,
        title: config.dashboard.title.clone(),
    });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind {:?}", config.server.bind))?;
    tracing::info!("Starting repo-traffic-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}

async fn build_repository(store: &StoreSettings) -> anyhow::Result<Arc<dyn TrafficRepository>> {
    match store.kind {
        StoreKind::Mongo => {
            let uri = store
                .uri
                .clone()
                .context("store.uri is required for the mongo store")?;
            Ok(Arc::new(MongoRepository::new(
                uri,
                store.database.clone(),
                store.query_timeout(),
            )))
        }
        StoreKind::Memory => {
            let repository = match &store.seed_path {
                Some(path) => MemoryRepository::from_seed_file(path)
                    .await
                    .with_context(|| format!("cannot read seed file {}", path.display()))?,
                None => MemoryRepository::new(),
            };
            Ok(Arc::new(repository))
        }
    }
}
