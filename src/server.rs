//! HTTP surface: routes, handlers and the serve loop.
//!
//! | Route | Query | Response |
//! |-------|-------|----------|
//! | `GET /news` | `q` = category | JSON array of articles |
//! | `GET /server-status` | `region` = region id | JSON object region -> servers |
//! | `GET /health` | | JSON health report |
//!
//! `/news` also reports how the pagination walk ended through the
//! `x-news-pages` and `x-news-complete` response headers.

use crate::config::Settings;
use crate::error::{ApiError, ConfigError};
use crate::fetcher::HttpFetcher;
use crate::health::check_health;
use crate::models::{HealthReport, RegionStatuses};
use crate::scrapers::news::{NewsSource, list_news};
use crate::scrapers::server_status::server_status;
use crate::utils::non_empty;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};
use url::Url;

/// Number of news pages that contributed articles.
pub const NEWS_PAGES_HEADER: &str = "x-news-pages";
/// `false` when the walk stopped on a fetch failure or the page cap.
pub const NEWS_COMPLETE_HEADER: &str = "x-news-complete";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    fetcher: HttpFetcher,
    news: Arc<NewsSource>,
    status_url: Arc<Url>,
    health_url: Arc<Url>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let parse = |field: &'static str, value: &str| {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })
        };

        let news = NewsSource {
            news_url: parse("news_url", &settings.news_url)?,
            link_origin: parse("link_origin", &settings.link_origin)?,
            max_pages: settings.max_pages,
        };

        Ok(Self {
            fetcher: HttpFetcher::new(settings)?,
            news: Arc::new(news),
            status_url: Arc::new(parse("server_status_url", &settings.server_status_url)?),
            health_url: Arc::new(parse("health_url", &settings.health_url)?),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServerStatusQuery {
    pub region: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/news", get(news))
        .route("/server-status", get(server_status_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /news?q=<category>`
pub async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> impl IntoResponse {
    let category = non_empty(query.q);
    let listing = list_news(&state.fetcher, &state.news, category.as_deref()).await;

    if !listing.is_complete() {
        warn!(
            stop = ?listing.stop,
            pages = listing.pages_collected,
            "Returning partial news listing"
        );
    }

    let headers = [
        (NEWS_PAGES_HEADER, listing.pages_collected.to_string()),
        (NEWS_COMPLETE_HEADER, listing.is_complete().to_string()),
    ];
    (headers, Json(listing.articles))
}

/// `GET /server-status?region=<id>`
pub async fn server_status_handler(
    State(state): State<AppState>,
    Query(query): Query<ServerStatusQuery>,
) -> Result<Json<RegionStatuses>, ApiError> {
    let region = non_empty(query.region);
    let statuses = server_status(&state.fetcher, &state.status_url, region.as_deref()).await?;
    Ok(Json(statuses))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(check_health(&state.fetcher, &state.health_url).await)
}

/// Bind to `settings.bind` and serve until Ctrl-C.
#[instrument(level = "info", skip_all, fields(bind = %settings.bind))]
pub async fn serve(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let state = AppState::from_settings(settings)?;
    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
