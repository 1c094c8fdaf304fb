//! Actuator seam and the HTTP lamp implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::trace;

use crate::color::Rgb;

/// A remote light that can be set to a color and queried for its current one.
///
/// `set_color` is idempotent; callers treat failures as best-effort and carry
/// on without retrying.
#[async_trait]
pub trait ActuatorSink: Send + Sync {
    async fn set_color(&self, color: Rgb) -> Result<()>;

    async fn current_color(&self) -> Result<Rgb>;
}

/// Drives a lamp over its HTTP interface.
///
/// Colors are set via `GET {base}/do?action=set&r=R&g=G&b=B`; the lamp reports
/// its current color as a `#RRGGBB` body on `GET {base}/color`.
pub struct HttpLamp {
    base_url: String,

    /// HTTP client (reused across requests for efficiency)
    client: reqwest::Client,
}

impl HttpLamp {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl ActuatorSink for HttpLamp {
    async fn set_color(&self, color: Rgb) -> Result<()> {
        let url = format!(
            "{}/do?action=set&r={}&g={}&b={}",
            self.base_url, color.r, color.g, color.b
        );

        trace!("setting lamp to {color}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to send HTTP request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        Ok(())
    }

    async fn current_color(&self) -> Result<Rgb> {
        let url = format!("{}/color", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to send HTTP request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        body.parse()
            .context("lamp reported an unparsable current color")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn set_color_hits_the_set_action_with_channel_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/do"))
            .and(query_param("action", "set"))
            .and(query_param("r", "242"))
            .and(query_param("g", "0"))
            .and(query_param("b", "13"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let lamp = HttpLamp::new(mock_server.uri()).unwrap();

        lamp.set_color(Rgb::new(242, 0, 13)).await.unwrap();
    }

    #[tokio::test]
    async fn set_color_surfaces_http_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/do"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let lamp = HttpLamp::new(mock_server.uri()).unwrap();

        assert!(lamp.set_color(Rgb::new(1, 2, 3)).await.is_err());
    }

    #[tokio::test]
    async fn current_color_parses_the_hex_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(200).set_body_string("#12ab34"))
            .mount(&mock_server)
            .await;

        let lamp = HttpLamp::new(format!("{}/", mock_server.uri())).unwrap();

        assert_eq!(
            lamp.current_color().await.unwrap(),
            Rgb::new(0x12, 0xab, 0x34)
        );
    }

    #[tokio::test]
    async fn current_color_rejects_garbage_bodies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/color"))
            .respond_with(ResponseTemplate::new(200).set_body_string("lamp says no"))
            .mount(&mock_server)
            .await;

        let lamp = HttpLamp::new(mock_server.uri()).unwrap();

        assert!(lamp.current_color().await.is_err());
    }
}
