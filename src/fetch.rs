use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::config::Heuristics;
use crate::error::{Result, ScrapeError};
use crate::pipeline::extract_rows;
use crate::schema::Schema;
use crate::types::{PageContext, RawTable, TableGrab};

/// One fetched page: its parsed context tree, the next pagination target if
/// the page advertises one, and when it was fetched.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub context: PageContext,
    pub next_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Anything that can produce page contexts for the pipeline.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Short identifier for logs.
    fn source_name(&self) -> &'static str;

    /// Fetch and parse one page by location (URL or path, per source).
    async fn fetch_page(&self, location: &str) -> Result<FetchedPage>;
}

/// Fetches pages over HTTP and follows embedded remote frames up to a
/// depth cap. Inline `srcdoc` frames are parsed in place without a request.
pub struct HttpPageSource {
    client: reqwest::Client,
    max_frame_depth: u8,
}

impl HttpPageSource {
    pub fn new(timeout_secs: u64, max_frame_depth: u8) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_frame_depth,
        })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.as_str()).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch one embedded document and, below the depth cap, its own remote
    /// frames. Boxed because the recursion goes through an async fn.
    fn fetch_frame<'a>(
        &'a self,
        url: Url,
        depth: u8,
    ) -> Pin<Box<dyn Future<Output = Result<PageContext>> + Send + 'a>> {
        Box::pin(async move {
            let html = self.fetch_html(&url).await?;
            let parsed = parse_document(&html, Some(&url));
            let mut context = parsed.context;
            self.expand_frames(&mut context, parsed.frame_urls, depth + 1).await;
            Ok(context)
        })
    }

    /// Attach the contexts behind `frame_urls` as children. A frame that
    /// fails to fetch is skipped with a warning, never fatal.
    async fn expand_frames(&self, context: &mut PageContext, frame_urls: Vec<Url>, depth: u8) {
        if frame_urls.is_empty() {
            return;
        }
        if depth > self.max_frame_depth {
            debug!(
                "Frame depth cap {} reached, skipping {} embedded document(s)",
                self.max_frame_depth,
                frame_urls.len()
            );
            return;
        }
        for url in frame_urls {
            match self.fetch_frame(url.clone(), depth).await {
                Ok(child) => context.children.push(child),
                Err(err) => warn!("Skipping embedded document {}: {}", url, err),
            }
        }
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch_page(&self, location: &str) -> Result<FetchedPage> {
        let url = Url::parse(location)
            .map_err(|err| ScrapeError::InvalidUrl(format!("{}: {}", location, err)))?;
        let html = self.fetch_html(&url).await?;
        let parsed = parse_document(&html, Some(&url));
        let mut context = parsed.context;
        self.expand_frames(&mut context, parsed.frame_urls, 1).await;
        Ok(FetchedPage {
            context,
            next_url: parsed.next_url,
            fetched_at: Utc::now(),
        })
    }
}

/// Reads a page from a local HTML file. Remote frames and pagination links
/// are ignored; inline `srcdoc` frames still parse.
pub struct FilePageSource;

#[async_trait::async_trait]
impl PageSource for FilePageSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    async fn fetch_page(&self, location: &str) -> Result<FetchedPage> {
        let html = tokio::fs::read_to_string(location).await?;
        let parsed = parse_document(&html, None);
        if !parsed.frame_urls.is_empty() {
            debug!(
                "Ignoring {} remote frame(s) in local file {}",
                parsed.frame_urls.len(),
                location
            );
        }
        Ok(FetchedPage {
            context: parsed.context,
            next_url: None,
            fetched_at: Utc::now(),
        })
    }
}

/// One parsed HTML document: its context (tables plus inline-frame
/// children), the remote frame URLs still to fetch, and the page's "next"
/// link if any.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub context: PageContext,
    pub frame_urls: Vec<Url>,
    pub next_url: Option<String>,
}

/// Parses an HTML string into tables and frames. `base` resolves relative
/// frame and link targets; without it only absolute targets survive.
pub fn parse_document(html: &str, base: Option<&Url>) -> ParsedDocument {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();
    let frame_selector = Selector::parse("iframe, frame").unwrap();

    let mut tables = Vec::new();
    for table in document.select(&table_selector) {
        let mut rows = Vec::new();
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        tables.push(TableGrab::from_rows(rows));
    }

    let mut children = Vec::new();
    let mut frame_urls = Vec::new();
    for frame in document.select(&frame_selector) {
        if let Some(srcdoc) = frame.value().attr("srcdoc") {
            let child = parse_document(srcdoc, base);
            children.push(child.context);
            frame_urls.extend(child.frame_urls);
        } else if let Some(src) = frame.value().attr("src") {
            match resolve_link(src, base) {
                Some(url) => frame_urls.push(url),
                None => debug!("Ignoring unresolvable frame src '{}'", src),
            }
        }
    }

    let next_url = find_next_url(&document, base);
    ParsedDocument {
        context: PageContext::new(tables, children),
        frame_urls,
        next_url,
    }
}

/// The page's pagination target: the first anchor carrying a `rel="next"`
/// token or whose text starts with "next" (case-insensitive).
fn find_next_url(document: &Html, base: Option<&Url>) -> Option<String> {
    let link_selector = Selector::parse("a[href]").unwrap();
    document.select(&link_selector).find_map(|link| {
        let href = link.value().attr("href")?;
        let rel_next = link
            .value()
            .attr("rel")
            .map(|rel| rel.split_whitespace().any(|token| token.eq_ignore_ascii_case("next")))
            .unwrap_or(false);
        let text = link.text().collect::<String>().trim().to_lowercase();
        if !rel_next && !text.starts_with("next") {
            return None;
        }
        resolve_link(href, base).map(|url| url.to_string())
    })
}

fn resolve_link(target: &str, base: Option<&Url>) -> Option<Url> {
    let url = match base {
        Some(base) => base.join(target).ok()?,
        None => Url::parse(target).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Walks the pagination chain from `start` and merges every page's data
/// rows under the first page's header. Stops at the page cap, on a repeated
/// location, or when a page has no next link. A fetch failure on the first
/// page is fatal; on later pages it just ends the walk.
pub async fn gather_rows(
    source: &dyn PageSource,
    start: &str,
    schema: Schema,
    heuristics: &Heuristics,
    max_pages: usize,
) -> Result<RawTable> {
    let mut merged = RawTable::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut next = Some(start.to_string());
    let mut page_no = 0usize;

    while let Some(location) = next {
        if page_no >= max_pages {
            warn!("Pagination cap of {} page(s) reached, stopping", max_pages);
            break;
        }
        if !visited.insert(location.clone()) {
            warn!("Pagination loop at {}, stopping", location);
            break;
        }
        page_no += 1;

        let page = match source.fetch_page(&location).await {
            Ok(page) => page,
            Err(err) if page_no > 1 => {
                warn!("Failed to fetch page {} at {}: {}", page_no, location, err);
                break;
            }
            Err(err) => return Err(err),
        };

        let table = extract_rows(&page.context, schema, heuristics);
        info!(
            "Extracted {} row(s) from {} page {}",
            table.rows.len(),
            source.source_name(),
            page_no
        );
        if merged.is_empty() {
            merged = table;
        } else {
            merged.rows.extend(table.data_rows().iter().cloned());
        }
        next = page.next_url;
    }

    Ok(merged)
}
