pub mod color;
pub mod config;
pub mod driver;
pub mod fader;
pub mod feed;
pub mod lamp;
pub mod sampler;

use serde::{Deserialize, Serialize};

/// Snapshot of per-host CPU figures as reported by the monitoring feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedReport {
    pub cluster: Option<String>,
    pub hosts: Vec<HostLoad>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostLoad {
    pub name: String,
    pub cpu_user: f64,
    pub cpu_system: f64,
}

impl FeedReport {
    /// Aggregate load percentage: mean of user+system CPU across all hosts.
    ///
    /// An empty host list aggregates to 0 rather than dividing by zero.
    pub fn aggregate_load(&self) -> u64 {
        if self.hosts.is_empty() {
            return 0;
        }

        let total: f64 = self
            .hosts
            .iter()
            .map(|host| host.cpu_user + host.cpu_system)
            .sum();

        (total / self.hosts.len() as f64) as u64
    }
}
