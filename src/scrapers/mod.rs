//! Scrapers for the Throne and Liberty website.
//!
//! Each scraper splits into a pure extraction function (HTML text in, typed
//! records out) and an async driver that fetches through a
//! [`PageFetcher`](crate::fetcher::PageFetcher).
//!
//! | Data | Module | Upstream page |
//! |------|--------|---------------|
//! | News teasers | [`news`] | `news-load-more?page=N`, paginated |
//! | Server status | [`server_status`] | `support/server-status` |
//!
//! Both depend on the site's CSS class names; markup changes upstream are
//! contained to these modules and their fixtures.

pub mod news;
pub mod server_status;
