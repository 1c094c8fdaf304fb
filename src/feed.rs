//! Metric source seam and the HTTP monitoring-feed implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::trace;

use crate::FeedReport;

/// Anything that can report the cluster's aggregate CPU load percentage.
///
/// The percentage is conceptually 0–100, but values above 100 are valid and
/// represent hyperthread saturation.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch_load(&self) -> Result<u64>;
}

/// Fetches load from a monitoring feed endpoint serving a JSON [`FeedReport`].
pub struct HttpMetricSource {
    url: String,

    /// HTTP client (reused across requests for efficiency)
    client: reqwest::Client,
}

impl HttpMetricSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch_load(&self) -> Result<u64> {
        trace!("requesting feed report from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("failed to send HTTP request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let report: FeedReport = response
            .json()
            .await
            .context("failed to parse feed report JSON")?;

        let load = report.aggregate_load();
        trace!("feed reports aggregate load {load}%");

        Ok(load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_and_aggregates_feed_report() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cluster": "yashik",
                "hosts": [
                    { "name": "yashik01", "cpu_user": 60.0, "cpu_system": 20.0 },
                    { "name": "yashik02", "cpu_user": 10.0, "cpu_system": 10.0 }
                ]
            })))
            .mount(&mock_server)
            .await;

        let source = HttpMetricSource::new(format!("{}/metrics", mock_server.uri())).unwrap();

        assert_eq!(source.fetch_load().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn http_error_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let source = HttpMetricSource::new(format!("{}/metrics", mock_server.uri())).unwrap();

        assert!(source.fetch_load().await.is_err());
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let source = HttpMetricSource::new(format!("{}/metrics", mock_server.uri())).unwrap();

        assert!(source.fetch_load().await.is_err());
    }

    #[tokio::test]
    async fn unreachable_feed_is_an_error() {
        let source = HttpMetricSource::new("http://127.0.0.1:1/metrics").unwrap();

        assert!(source.fetch_load().await.is_err());
    }
}
