use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Mongo,
    #[default]
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    #[serde(default)]
    pub kind: StoreKind,
    /// `mongodb://` or `mongodb+srv://` connection string
    pub uri: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_clones_collection")]
    pub clones_collection: String,
    #[serde(default = "default_views_collection")]
    pub views_collection: String,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
    pub seed_path: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            uri: None,
            database: default_database(),
            clones_collection: default_clones_collection(),
            views_collection: default_views_collection(),
            query_timeout_secs: default_query_timeout_secs(),
            seed_path: None,
        }
    }
}

impl StoreSettings {
    /// Zero turns the query timeout off.
    pub fn query_timeout(&self) -> Option<Duration> {
        match self.query_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_title")]
    pub title: String,
    pub revalidate_secs: Option<u64>,
    #[serde(default = "default_retry_secs")]
    pub retry_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            revalidate_secs: None,
            retry_secs: default_retry_secs(),
        }
    }
}

impl DashboardSettings {
    pub fn revalidate_after(&self) -> Option<Duration> {
        self.revalidate_secs.map(Duration::from_secs)
    }

    /// How long a failed generation is served before it is retried.
    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_secs)
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database() -> String {
    "github-traffic".to_string()
}

fn default_clones_collection() -> String {
    "clones".to_string()
}

fn default_views_collection() -> String {
    "views".to_string()
}

fn default_query_timeout_secs() -> u64 {
    10
}

fn default_retry_secs() -> u64 {
    5
}

fn default_title() -> String {
    "Repository Traffic".to_string()
}

/// Reads `config/dashboard.*` when present, then `DASHBOARD__SECTION__KEY`
/// environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
