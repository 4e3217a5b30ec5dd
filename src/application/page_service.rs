// Page service - Generates and caches the dashboard page data
use crate::application::traffic_loader::TrafficLoader;
use crate::domain::traffic::DashboardData;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// One generated copy of the page data.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub data: Arc<DashboardData>,
    /// Set when the last generation failed.
    pub notice: Option<String>,
    /// False while no generation has ever succeeded.
    pub has_data: bool,
    pub generated_at: DateTime<Utc>,
}

struct Generation {
    snapshot: PageSnapshot,
    at: Instant,
}

/// Wait before retrying a failed generation.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct PageService {
    loader: TrafficLoader,
    revalidate_after: Option<Duration>,
    retry_after: Duration,
    current: Arc<RwLock<Option<Generation>>>,
    // Held by whoever is running a generation; at most one at a time
    refresh: Arc<Mutex<()>>,
}

impl PageService {
    pub fn new(loader: TrafficLoader, revalidate_after: Option<Duration>) -> Self {
        Self {
            loader,
            revalidate_after,
            retry_after: DEFAULT_RETRY_AFTER,
            current: Arc::new(RwLock::new(None)),
            refresh: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Runs page generation now, replacing the current snapshot.
    pub async fn generate(&self) -> PageSnapshot {
        let _guard = self.refresh.lock().await;
        self.regenerate().await
    }

    /// Current snapshot. A due snapshot that still has data is served as is
    /// while one background task regenerates it; without data the caller
    /// waits for the generation.
    pub async fn snapshot(&self) -> PageSnapshot {
        if let Some((snapshot, due)) = self.peek().await {
            if !due {
                return snapshot;
            }
            if snapshot.has_data {
                if let Ok(guard) = self.refresh.clone().try_lock_owned() {
                    let service = self.clone();
                    tokio::spawn(async move {
                        let _guard = guard;
                        service.regenerate().await;
                    });
                }
                return snapshot;
            }
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have finished a generation while we waited
        match self.peek().await {
            Some((snapshot, false)) => snapshot,
            _ => self.regenerate().await,
        }
    }

    async fn peek(&self) -> Option<(PageSnapshot, bool)> {
        let current = self.current.read().await;
        current
            .as_ref()
            .map(|generation| (generation.snapshot.clone(), self.is_due(generation)))
    }

    fn is_due(&self, generation: &Generation) -> bool {
        // A failed attempt is retried even when revalidation is off
        let interval = if generation.snapshot.notice.is_some() {
            Some(self.retry_after)
        } else {
            self.revalidate_after
        };
        interval.is_some_and(|interval| generation.at.elapsed() >= interval)
    }

    /// Callers hold the `refresh` lock.
    async fn regenerate(&self) -> PageSnapshot {
        let result = self.loader.load().await;

        let mut current = self.current.write().await;
        let snapshot = match result {
            Ok(data) => PageSnapshot {
                data: Arc::new(data),
                notice: None,
                has_data: true,
                generated_at: Utc::now(),
            },
            Err(e) => {
                tracing::error!("Dashboard data generation failed: {}", e);
                let notice = format!("Traffic data is unavailable right now ({e}).");
                match current.as_ref() {
                    Some(previous) if previous.snapshot.has_data => {
                        let since = previous.snapshot.generated_at.format("%Y-%m-%d %H:%M UTC");
                        PageSnapshot {
                            notice: Some(format!("{notice} Showing data from {since}.")),
                            ..previous.snapshot.clone()
                        }
                    }
                    _ => PageSnapshot {
                        data: Arc::new(DashboardData::default()),
                        notice: Some(notice),
                        has_data: false,
                        generated_at: Utc::now(),
                    },
                }
            }
        };

        *current = Some(Generation {
            snapshot: snapshot.clone(),
            at: Instant::now(),
        });
        snapshot
    }
}
