//! Composite health check: this API plus the upstream website.

use crate::fetcher::PageFetcher;
use crate::models::{ComponentHealth, HealthReport, HealthState};
use tracing::{debug, info, instrument};
use url::Url;

pub const API_MESSAGE: &str = "The API is up and running";
pub const UPSTREAM_OK_MESSAGE: &str = "Successfully connected to Throne and Liberty website";
pub const UPSTREAM_DOWN_MESSAGE: &str = "Unable to connect to Throne and Liberty website";

/// Probe the upstream root page and build a [`HealthReport`].
///
/// Never fails: any fetch error marks the upstream unhealthy.
#[instrument(level = "info", skip(fetcher, health_url), fields(%health_url))]
pub async fn check_health<F: PageFetcher>(fetcher: &F, health_url: &Url) -> HealthReport {
    let api = ComponentHealth {
        status: HealthState::Healthy,
        message: API_MESSAGE.to_string(),
    };

    let upstream = match fetcher.fetch(health_url).await {
        Ok(_) => ComponentHealth {
            status: HealthState::Healthy,
            message: UPSTREAM_OK_MESSAGE.to_string(),
        },
        Err(e) => {
            debug!(error = %e, "Upstream unreachable; reporting unhealthy");
            ComponentHealth {
                status: HealthState::Unhealthy,
                message: UPSTREAM_DOWN_MESSAGE.to_string(),
            }
        }
    };

    let report = HealthReport::new(api, upstream);
    info!(status = ?report.status, "Health check complete");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::fetcher::HttpFetcher;
    use crate::fetcher::stub::StaticPages;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROOT: &str = "https://playthroneandliberty.com/";

    #[tokio::test]
    async fn test_healthy_when_upstream_answers() {
        let fetcher = StaticPages::new().page(ROOT, "<html></html>");
        let report = check_health(&fetcher, &Url::parse(ROOT).unwrap()).await;

        assert_eq!(report.status, HealthState::Healthy);
        assert_eq!(report.api.message, API_MESSAGE);
        assert_eq!(report.throne_and_liberty.status, HealthState::Healthy);
        assert_eq!(report.throne_and_liberty.message, UPSTREAM_OK_MESSAGE);
    }

    #[tokio::test]
    async fn test_unhealthy_when_upstream_missing() {
        let fetcher = StaticPages::new();
        let report = check_health(&fetcher, &Url::parse(ROOT).unwrap()).await;

        assert_eq!(report.status, HealthState::Unhealthy);
        assert_eq!(report.api.status, HealthState::Healthy);
        assert_eq!(report.throne_and_liberty.message, UPSTREAM_DOWN_MESSAGE);
    }

    #[tokio::test]
    async fn test_unhealthy_on_upstream_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(&Settings::default()).unwrap();
        let report = check_health(&fetcher, &Url::parse(&mock_server.uri()).unwrap()).await;
        assert_eq!(report.status, HealthState::Unhealthy);
    }

    #[tokio::test]
    async fn test_unhealthy_on_connection_refused() {
        let fetcher = HttpFetcher::new(&Settings::default()).unwrap();
        let report = check_health(&fetcher, &Url::parse("http://127.0.0.1:1/").unwrap()).await;
        assert_eq!(report.status, HealthState::Unhealthy);
        assert_eq!(report.throne_and_liberty.status, HealthState::Unhealthy);
    }
}
