// Traffic record domain models
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields the store maintains for its own bookkeeping. They never leave the
/// data layer.
pub const BOOKKEEPING_FIELDS: [&str; 3] = ["createdAt", "updatedAt", "__v"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficKind {
    Clone,
    View,
}

impl TrafficKind {
    pub fn label(self) -> &'static str {
        match self {
            TrafficKind::Clone => "clones",
            TrafficKind::View => "views",
        }
    }
}

impl std::fmt::Display for TrafficKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One aggregated clone or view observation with plain, serializable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "whole_number")]
    pub count: u64,
    #[serde(default, deserialize_with = "whole_number")]
    pub uniques: u64,
    /// Remaining schema fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Counts may be stored as doubles; any non-negative whole number is accepted.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::Null => Some(0),
        _ => None,
    };
    count.ok_or_else(|| D::Error::custom(format!("expected a non-negative whole number, got {value}")))
}

/// What page generation hands to the dashboard view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub clones: Vec<TrafficRecord>,
    pub views: Vec<TrafficRecord>,
}

impl DashboardData {
    pub fn new(clones: Vec<TrafficRecord>, views: Vec<TrafficRecord>) -> Self {
        Self { clones, views }
    }

    pub fn records(&self, kind: TrafficKind) -> &[TrafficRecord] {
        match kind {
            TrafficKind::Clone => &self.clones,
            TrafficKind::View => &self.views,
        }
    }
}
