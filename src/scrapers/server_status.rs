//! Throne and Liberty server status scraper.
//!
//! The support site renders one container per region, tagged with a
//! `data-regionid` attribute. Each server row holds a label and an inline SVG
//! icon whose fill color encodes the server's state.

use crate::error::ApiError;
use crate::fetcher::PageFetcher;
use crate::models::{Region, RegionStatuses, ServerEntry, ServerStatus};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static REGION_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[data-regionid]").unwrap());
static SERVER_ITEM: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.ags-ServerStatus-content-serverStatuses-server-item").unwrap()
});
static SERVER_LABEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("span.ags-ServerStatus-content-serverStatuses-server-item-label").unwrap()
});
static STATUS_ICON: Lazy<Selector> = Lazy::new(|| Selector::parse("svg").unwrap());

/// Icon fill colors, checked in this order.
const STATUS_COLORS: [(&str, ServerStatus); 4] = [
    ("24FF00", ServerStatus::Good),
    ("FFF500", ServerStatus::Busy),
    ("FF0000", ServerStatus::Full),
    ("00F0FF", ServerStatus::InMaintenance),
];

/// Map a status icon's markup to a [`ServerStatus`] by its color code.
///
/// Color codes are matched without regard to case. Markup containing none
/// of the known codes is [`ServerStatus::Unknown`].
pub fn classify_status(icon_markup: &str) -> ServerStatus {
    let markup = icon_markup.to_ascii_uppercase();
    STATUS_COLORS
        .iter()
        .find(|(code, _)| markup.contains(code))
        .map(|(_, status)| *status)
        .unwrap_or(ServerStatus::Unknown)
}

/// Extract server rows for every region present on the page.
///
/// With `only` set, other regions are skipped. Regions whose container is
/// missing are left out of the result.
pub fn extract_server_status(html: &str, only: Option<Region>) -> RegionStatuses {
    let document = Html::parse_document(html);
    let mut statuses = Vec::new();

    for region in Region::ALL {
        if only.is_some_and(|wanted| wanted != region) {
            continue;
        }

        let Some(container) = document
            .select(&REGION_CONTAINER)
            .find(|el| el.value().attr("data-regionid") == Some(region.id()))
        else {
            debug!(%region, "Region container not found; omitting");
            continue;
        };

        let servers: Vec<ServerEntry> = container
            .select(&SERVER_ITEM)
            .filter_map(|item| extract_server(item, region))
            .collect();
        debug!(%region, count = servers.len(), "Extracted servers");
        statuses.push((region, servers));
    }

    RegionStatuses(statuses)
}

fn extract_server(item: ElementRef<'_>, region: Region) -> Option<ServerEntry> {
    let Some(label) = item.select(&SERVER_LABEL).next() else {
        warn!(%region, "Server row without a label; skipping");
        return None;
    };

    let status = item
        .select(&STATUS_ICON)
        .next()
        .map(|icon| classify_status(&icon.html()))
        .unwrap_or(ServerStatus::Unknown);

    Some(ServerEntry {
        name: label.text().collect::<String>(),
        status,
    })
}

/// Fetch the status page and report servers per region.
///
/// `region` must be one of the five region ids when given; it is validated
/// before anything is fetched.
#[instrument(level = "info", skip(fetcher, status_url), fields(%status_url))]
pub async fn server_status<F: PageFetcher>(
    fetcher: &F,
    status_url: &Url,
    region: Option<&str>,
) -> Result<RegionStatuses, ApiError> {
    let only = match region {
        Some(id) => Some(id.parse::<Region>().map_err(|e| {
            warn!(region = %e.0, "Rejected unknown region");
            ApiError::InvalidRegion
        })?),
        None => None,
    };

    let html = fetcher.fetch(status_url).await.map_err(|e| {
        warn!(error = %e, "Server status page unavailable");
        ApiError::UpstreamUnavailable
    })?;

    let statuses = extract_server_status(&html, only);
    if statuses.is_empty() {
        warn!("No region containers found on the status page");
    }
    info!(regions = statuses.len(), "Server status scraped");
    Ok(statuses)
}
