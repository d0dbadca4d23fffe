// Job-posting page fetch.
// Firecrawl when a key is configured, otherwise a direct GET with HTML text extraction.

use std::net::{IpAddr, Ipv4Addr};

use axum::{extract::State, Json};
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{ApiJson, AppError};
use crate::models::lenient_string;
use crate::state::AppState;

const FIRECRAWL_SCRAPE_URL: &str = "https://api.firecrawl.dev/v1/scrape";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid body selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title, h1").expect("valid title selector"));

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeSource {
    Firecrawl,
    Direct,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: ScrapeSource,
}

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    success: bool,
    data: Option<FirecrawlData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlData {
    #[serde(default)]
    markdown: String,
    metadata: Option<FirecrawlMetadata>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlMetadata {
    title: Option<String>,
}

fn parse_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| AppError::validation("A valid http(s) URL is required"))?;
    if is_internal_host(&url) {
        return Err(AppError::validation("URL host is not allowed"));
    }
    Ok(url)
}

/// Loopback, private, link-local and unspecified hosts, given as literals or `localhost`.
fn is_internal_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.eq_ignore_ascii_case("localhost") || host.to_ascii_lowercase().ends_with(".localhost") {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => is_internal_v4(ip),
        Ok(IpAddr::V6(ip)) => match ip.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(v4),
            None => {
                let first = ip.segments()[0];
                ip.is_loopback()
                    || ip.is_unspecified()
                    || (first & 0xfe00) == 0xfc00
                    || (first & 0xffc0) == 0xfe80
            }
        },
        Err(_) => false,
    }
}

fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_private() || ip.is_loopback() || ip.is_link_local() || ip.is_unspecified() || ip.is_broadcast()
}

/// POST /api/scrape
pub async fn handle_scrape(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, AppError> {
    let url = parse_url(&request.url)?;
    info!("Scraping {url}");

    if let Some(key) = state.config.firecrawl_api_key.as_deref() {
        match scrape_with_firecrawl(&state.http, key, &url).await {
            Ok(response) => return Ok(Json(response)),
            Err(e) => warn!("Firecrawl scrape failed, fetching directly: {e}"),
        }
    }

    let html = fetch_html(&state.http, &url)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch URL", e))?;
    let (title, content) = extract_page(&html);
    info!("Fetched {} chars of text from {url}", content.len());

    Ok(Json(ScrapeResponse {
        content,
        title,
        source: ScrapeSource::Direct,
    }))
}

async fn scrape_with_firecrawl(
    http: &reqwest::Client,
    api_key: &str,
    url: &Url,
) -> anyhow::Result<ScrapeResponse> {
    let response = http
        .post(FIRECRAWL_SCRAPE_URL)
        .bearer_auth(api_key)
        .json(&json!({ "url": url.as_str(), "formats": ["markdown"] }))
        .send()
        .await?;

    let status = response.status();
    let body: FirecrawlResponse = response.json().await?;
    firecrawl_content(status.as_u16(), body)
}

fn firecrawl_content(status: u16, body: FirecrawlResponse) -> anyhow::Result<ScrapeResponse> {
    match body.data {
        Some(data) if body.success && !data.markdown.trim().is_empty() => Ok(ScrapeResponse {
            content: data.markdown,
            title: data.metadata.and_then(|m| m.title),
            source: ScrapeSource::Firecrawl,
        }),
        _ => anyhow::bail!(
            "Firecrawl returned {status}: {}",
            body.error.as_deref().unwrap_or("no content")
        ),
    }
}

async fn fetch_html(http: &reqwest::Client, url: &Url) -> Result<String, reqwest::Error> {
    http.get(url.clone())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Page title and visible body text, one text node per line.
pub fn extract_page(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty());

    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let lines: Vec<String> = root
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(|p| p.value().as_element().map(|e| e.name()));
            if parent.is_some_and(|name| SKIPPED_ELEMENTS.contains(&name)) {
                return None;
            }
            let line = collapse_whitespace(text);
            (!line.is_empty()).then_some(line)
        })
        .collect();

    (title, lines.join("\n"))
}
