//! The browser's HTTP debugging endpoint, as seen by recovery.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cdp::{BrowserVersion, CdpClient, CdpError, PageInfo};

/// Reachability and tab operations against `host:port`.
#[async_trait]
pub trait DebugEndpoint: Send + Sync {
    /// True when `/json/version` answers with a debugger URL.
    async fn is_reachable(&self, port: u16) -> bool;

    /// URLs of the open user pages.
    async fn page_urls(&self, port: u16) -> Result<Vec<String>, CdpError>;

    /// Open one tab per URL; returns how many opened.
    async fn open_tabs(&self, port: u16, urls: &[String]) -> Result<usize, CdpError>;
}

/// [`DebugEndpoint`] over reqwest and a short-lived CDP connection.
pub struct HttpDebugEndpoint {
    host: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpDebugEndpoint {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            host: host.into(),
            http,
            request_timeout: timeout,
        }
    }

    fn url(&self, port: u16, path: &str) -> String {
        format!("http://{}:{}{}", self.host, port, path)
    }

    async fn version(&self, port: u16) -> Result<BrowserVersion, CdpError> {
        let response = self.http.get(self.url(port, "/json/version")).send().await?;
        if !response.status().is_success() {
            return Err(CdpError::Http(format!("/json/version returned {}", response.status())));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl DebugEndpoint for HttpDebugEndpoint {
    async fn is_reachable(&self, port: u16) -> bool {
        match self.version(port).await {
            Ok(version) => !version.web_socket_debugger_url.is_empty(),
            Err(e) => {
                debug!(port, error = %e, "Debugging endpoint not reachable");
                false
            }
        }
    }

    async fn page_urls(&self, port: u16) -> Result<Vec<String>, CdpError> {
        let response = self.http.get(self.url(port, "/json/list")).send().await?;
        if !response.status().is_success() {
            return Err(CdpError::Http(format!("/json/list returned {}", response.status())));
        }
        let pages: Vec<PageInfo> = response.json().await?;
        Ok(pages
            .into_iter()
            .filter(PageInfo::is_user_page)
            .map(|p| p.url)
            .collect())
    }

    async fn open_tabs(&self, port: u16, urls: &[String]) -> Result<usize, CdpError> {
        if urls.is_empty() {
            return Ok(0);
        }
        let version = self.version(port).await?;
        let client = CdpClient::connect(&version.web_socket_debugger_url, self.request_timeout).await?;

        let mut opened = 0;
        for url in urls {
            match client.create_target(url).await {
                Ok(target_id) => {
                    debug!(%url, %target_id, "Restored tab");
                    opened += 1;
                }
                Err(e) => warn!(%url, error = %e, "Failed to restore tab"),
            }
        }
        client.close().await;
        Ok(opened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint_for(server: &MockServer) -> (HttpDebugEndpoint, u16) {
        let port = server.address().port();
        (HttpDebugEndpoint::new("127.0.0.1", Duration::from_secs(2)), port)
    }

    #[tokio::test]
    async fn test_is_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Browser": "Chrome/120.0.0.0",
                "webSocketDebuggerUrl": "ws://127.0.0.1/devtools/browser/abc"
            })))
            .mount(&server)
            .await;

        let (endpoint, port) = endpoint_for(&server);
        assert!(endpoint.is_reachable(port).await);
    }

    #[tokio::test]
    async fn test_unreachable_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/version"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (endpoint, port) = endpoint_for(&server);
        assert!(!endpoint.is_reachable(port).await);
    }

    #[tokio::test]
    async fn test_page_urls_filters_internal_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "type": "page", "title": "Mail", "url": "https://mail.example.com/"},
                {"id": "2", "type": "page", "title": "Settings", "url": "chrome://settings/"},
                {"id": "3", "type": "service_worker", "url": "https://mail.example.com/sw.js"},
                {"id": "4", "type": "page", "title": "Docs", "url": "https://docs.example.com/"}
            ])))
            .mount(&server)
            .await;

        let (endpoint, port) = endpoint_for(&server);
        let urls = endpoint.page_urls(port).await.unwrap();

        assert_eq!(urls, vec!["https://mail.example.com/", "https://docs.example.com/"]);
    }

    #[tokio::test]
    async fn test_open_no_tabs_skips_connection() {
        let endpoint = HttpDebugEndpoint::new("127.0.0.1", Duration::from_millis(100));
        assert_eq!(endpoint.open_tabs(1, &[]).await.unwrap(), 0);
    }
}
