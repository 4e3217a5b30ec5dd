use async_trait::async_trait;
use repo_traffic_dashboard::application::page_service::PageService;
use repo_traffic_dashboard::application::traffic_loader::{Collections, TrafficLoader};
use repo_traffic_dashboard::application::traffic_repository::{
    Document, StoreError, TrafficRepository,
};
use repo_traffic_dashboard::infrastructure::memory_repository::MemoryRepository;
use repo_traffic_dashboard::{router, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Counts queries so tests can check nothing is re-fetched.
struct CountingRepository {
    inner: MemoryRepository,
    queries: Arc<AtomicUsize>,
}

#[async_trait]
impl TrafficRepository for CountingRepository {
    async fn connect(&self) -> Result<(), StoreError> {
        self.inner.connect().await
    }

    async fn find_all(
        &self,
        collection: &str,
        exclude_fields: &[&str],
    ) -> Result<Vec<Document>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all(collection, exclude_fields).await
    }
}

struct UnreachableRepository;

#[async_trait]
impl TrafficRepository for UnreachableRepository {
    async fn connect(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }

    async fn find_all(&self, _: &str, _: &[&str]) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Connection("connection refused".into()))
    }
}

fn clone_doc(oid: &str, day: u32) -> Document {
    json!({
        "_id": { "$oid": oid },
        "timestamp": { "$date": format!("2024-04-{day:02}T00:00:00Z") },
        "count": day,
        "uniques": 1,
        "createdAt": { "$date": "2024-04-30T00:00:00Z" },
        "updatedAt": { "$date": "2024-04-30T00:00:00Z" },
        "__v": 0
    })
    .as_object()
    .cloned()
    .unwrap()
}

async fn spawn_server(repository: Arc<dyn TrafficRepository>) -> TestServer {
    let loader = TrafficLoader::new(
        repository,
        Collections::default(),
        Some(Duration::from_secs(2)),
    );
    let page_service = PageService::new(loader, None);
    page_service.generate().await;

    let state = Arc::new(AppState {
        page_service,
        title: "octo/site traffic".to_string(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        handle,
    }
}

async fn seeded_server() -> (TestServer, Arc<AtomicUsize>) {
    let queries = Arc::new(AtomicUsize::new(0));
    let repository = CountingRepository {
        inner: MemoryRepository::new().with_collection(
            "clones",
            vec![clone_doc("a", 1), clone_doc("b", 2), clone_doc("c", 3)],
        ),
        queries: queries.clone(),
    };
    (spawn_server(Arc::new(repository)).await, queries)
}

#[tokio::test]
async fn http_dashboard_data_contract() {
    let (server, _) = seeded_server().await;

    let response = Client::new()
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(body["views"], json!([]));

    let clones = body["clones"].as_array().unwrap();
    let mut ids: Vec<&str> = clones.iter().map(|c| c["_id"].as_str().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, ["a", "b", "c"]);
    for clone in clones {
        assert!(clone.get("createdAt").is_none());
        assert!(clone.get("updatedAt").is_none());
        assert!(clone.get("__v").is_none());
        assert!(clone["timestamp"].is_string());
    }
}

#[tokio::test]
async fn http_dashboard_page_renders_clones_tab() {
    let (server, queries) = seeded_server().await;
    let client = Client::new();
    let after_generation = queries.load(Ordering::SeqCst);

    for path in ["/", "/?tab=views", "/?tab=clones"] {
        let response = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = response.text().await.unwrap();
        assert!(html.contains(r#"class="tab active" id="tab-clones""#), "{path}");
        assert!(html.contains(r#"aria-disabled="true""#));
        assert_eq!(html.matches("<rect class=\"day\"").count(), 3);
        assert!(html.contains("Light Mode"));
    }

    assert_eq!(queries.load(Ordering::SeqCst), after_generation);
}

#[tokio::test]
async fn http_dashboard_page_dark_mode() {
    let (server, _) = seeded_server().await;

    let html = Client::new()
        .get(format!("{}/?mode=dark", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains(r#"<body class="dark">"#));
    assert!(html.contains("Dark Mode"));
    assert!(html.contains(r#"href="/?mode=light&tab=clones""#));
}

#[tokio::test]
async fn http_unreachable_store_serves_fallback() {
    let server = spawn_server(Arc::new(UnreachableRepository)).await;
    let client = Client::new();

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::SERVICE_UNAVAILABLE);
    let html = page.text().await.unwrap();
    assert!(html.contains(r#"class="notice" role="alert""#));
    assert!(html.contains("heatmap-empty"));

    let data = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(data.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = data.json().await.unwrap();
    assert_eq!(body, json!({ "clones": [], "views": [] }));
}

#[tokio::test]
async fn http_health_check() {
    let (server, _) = seeded_server().await;

    let body = Client::new()
        .get(format!("{}/healthz", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "ok");
}
