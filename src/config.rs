use std::time::Duration;

use tracing::trace;

/// Process configuration, supplied once at startup and immutable thereafter.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Monitoring feed endpoint serving a JSON feed report
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Base URL of the lamp
    #[serde(default = "default_lamp_url")]
    pub lamp_url: String,

    /// Poll interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            lamp_url: default_lamp_url(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_feed_url() -> String {
    String::from("http://localhost:8649/metrics")
}

fn default_lamp_url() -> String {
    String::from("http://alarmpi.local:1337")
}

fn default_interval_secs() -> u64 {
    1
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
