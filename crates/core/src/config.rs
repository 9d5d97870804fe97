use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between tick sweeps.
    pub tick_interval_secs: u64,
    /// Heartbeats older than this are reported stale.
    pub stale_after_secs: i64,
    /// Absolute strike-match tolerance when resolving chain contracts.
    pub strike_tolerance: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            stale_after_secs: 180,
            strike_tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON order document.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "orders.json".to_string(),
        }
    }
}
