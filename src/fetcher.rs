//! Upstream page fetching.
//!
//! [`PageFetcher`] is the seam between the scrapers and the network: the
//! scrapers only ever see page bodies, so they can be exercised against
//! canned HTML. [`HttpFetcher`] is the real implementation on top of a
//! shared `reqwest::Client`.

use crate::config::Settings;
use crate::error::FetchError;
use crate::utils::truncate_for_log;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::{debug, error, instrument};
use url::Url;

/// Retrieve one page body.
///
/// Implementations return the decoded body on HTTP 200 and an error for any
/// other status or transport failure. No retries.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`PageFetcher`] backed by reqwest, following redirects.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the shared client from settings (timeout, user agent).
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(Policy::limited(10))
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(%url, error = %e, "Failed to fetch page");
                return Err(e.into());
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!(%url, status = status.as_u16(), "Failed to fetch page");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.inspect_err(|e| {
            error!(%url, error = %e, "Failed to read page body");
        })?;
        debug!(
            bytes = body.len(),
            preview = %truncate_for_log(&body, 120),
            "Fetched page"
        );
        Ok(body)
    }
}

/// In-memory fetcher serving canned pages, for scraper tests.
#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub(crate) struct StaticPages {
        pages: HashMap<String, String>,
        fallback: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticPages {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        /// Serve `body` for every url without a registered page.
        pub(crate) fn fallback(mut self, body: &str) -> Self {
            self.fallback = Some(body.to_string());
            self
        }

        pub(crate) fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageFetcher for StaticPages {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .or(self.fallback.as_ref())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&Settings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div>hello</div>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/news?page=1", mock_server.uri())).unwrap();
        let body = fetcher().fetch(&url).await.unwrap();
        assert_eq!(body, "<div>hello</div>");
    }

    #[tokio::test]
    async fn test_fetch_fails_on_non_200() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_treats_other_2xx_as_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/new", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/old", mock_server.uri())).unwrap();
        assert_eq!(fetcher().fetch(&url).await.unwrap(), "moved");
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // nothing listens on port 1
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
