//! Throne and Liberty news listing scraper.
//!
//! The news page loads teasers through a paginated HTML fragment endpoint
//! (`news-load-more?page=N`). Each teaser is a "slot module" block carrying a
//! link, heading, category subheading and blurb.
//!
//! # Pagination
//!
//! Pages are fetched one after another starting at 1 until a page fails to
//! fetch, a page yields no articles, or `max_pages` is reached. The outcome
//! records which of these ended the walk.

use crate::fetcher::PageFetcher;
use crate::models::Article;
use crate::utils::category_matches;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static SLOT_MODULE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.ags-SlotModule").unwrap());
static SLOT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.ags-SlotModule-slotLink").unwrap());
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".ags-SlotModule-slotLink-info-heading--blog").unwrap());
static CATEGORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".ags-SlotModule-slotLink-info-subheading--featured").unwrap());
static BLURB: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".ags-SlotModule-slotLink-info-text--blog").unwrap());

/// Where and how far to paginate.
#[derive(Debug, Clone)]
pub struct NewsSource {
    /// Fragment endpoint; `page=N` is appended as a query pair.
    pub news_url: Url,
    /// Base for resolving relative article links.
    pub link_origin: Url,
    pub max_pages: usize,
}

impl NewsSource {
    pub fn page_url(&self, page: usize) -> Url {
        let mut url = self.news_url.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }
}

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page parsed to zero articles: the normal end of the listing.
    EmptyPage,
    /// A page could not be fetched; the listing may be incomplete.
    FetchFailed,
    /// `max_pages` pages all had articles; the listing may be incomplete.
    PageLimit,
}

/// Result of one paginated listing.
#[derive(Debug, Clone)]
pub struct NewsListing {
    /// Collected articles, trimmed and filtered, in page then document order.
    pub articles: Vec<Article>,
    /// Number of pages that contributed articles.
    pub pages_collected: usize,
    pub stop: StopReason,
}

impl NewsListing {
    /// Whether the walk ended on the listing's natural end.
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::EmptyPage
    }
}

/// Extract every complete article teaser from one page of HTML.
///
/// Blocks missing the link `href`, heading, category or blurb are skipped.
/// Text is returned as found; trimming happens after pagination.
pub fn extract_articles(html: &str, link_origin: &Url) -> Vec<Article> {
    let document = Html::parse_document(html);
    document
        .select(&SLOT_MODULE)
        .filter_map(|block| extract_article(block, link_origin))
        .collect()
}

fn extract_article(block: ElementRef<'_>, link_origin: &Url) -> Option<Article> {
    let href = block.select(&SLOT_LINK).next()?.value().attr("href")?;
    let title = block.select(&HEADING).next()?;
    let category = block.select(&CATEGORY).next()?;
    let description = block.select(&BLURB).next()?;

    Some(Article {
        link: resolve_link(link_origin, href),
        title: title.text().collect::<String>(),
        category: category.text().collect::<String>(),
        description: description.text().collect::<String>(),
    })
}

/// Resolve `href` against the origin, falling back to plain prefixing when
/// the href does not parse as a URL reference.
fn resolve_link(link_origin: &Url, href: &str) -> String {
    match link_origin.join(href) {
        Ok(link) => link.to_string(),
        Err(e) => {
            debug!(%href, error = %e, "Unresolvable article link; prefixing origin");
            format!("{}{}", link_origin.as_str().trim_end_matches('/'), href)
        }
    }
}

/// Walk the paginated news listing and collect every article.
///
/// When `category` is given only articles whose category equals it,
/// ignoring case and surrounding whitespace, are kept.
#[instrument(level = "info", skip(fetcher, source), fields(news_url = %source.news_url))]
pub async fn list_news<F: PageFetcher>(
    fetcher: &F,
    source: &NewsSource,
    category: Option<&str>,
) -> NewsListing {
    let mut articles = Vec::new();
    let mut page = 1;

    let stop = loop {
        if page > source.max_pages {
            warn!(max_pages = source.max_pages, "Page limit reached. Stopping.");
            break StopReason::PageLimit;
        }

        let url = source.page_url(page);
        debug!(page, %url, "Fetching page");

        let body = match fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(page, error = %e, "Page fetch failed. Stopping.");
                break StopReason::FetchFailed;
            }
        };

        let extracted = extract_articles(&body, &source.link_origin);
        if extracted.is_empty() {
            debug!(page, "No articles found on page. Stopping.");
            break StopReason::EmptyPage;
        }

        debug!(page, count = extracted.len(), "Extracted articles");
        articles.extend(extracted);
        page += 1;
    };

    for article in &mut articles {
        article.trim_fields();
    }
    let total = articles.len();

    if let Some(filter) = category {
        articles.retain(|a| category_matches(&a.category, filter));
        debug!(category = %filter, count = articles.len(), "Filtered articles by category");
    }

    info!(
        total,
        returned = articles.len(),
        pages = page - 1,
        ?stop,
        "News listing complete"
    );

    NewsListing {
        articles,
        pages_collected: page - 1,
        stop,
    }
}
