//! Web scraping — fetches a job-posting URL and returns cleaned visible text.
//!
//! Failure is never retried here: the caller routes the user to manual paste.

use axum::{extract::State, Json};
use ego_tree::NodeRef;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

const FETCH_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub text: String,
    pub chars: usize,
}

impl ScrapeResponse {
    fn from_text(text: String) -> Self {
        Self {
            chars: text.chars().count(),
            text,
        }
    }
}

/// POST /api/v1/scrape
pub async fn handle_scrape(
    State(_state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, AppError> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("url is required".to_string()));
    }

    let text = scrape_job_posting(url).await?;
    let response = ScrapeResponse::from_text(text);
    info!("Scraped {} chars from {url}", response.chars);

    Ok(Json(response))
}

/// Fetches the page and extracts cleaned visible text.
pub async fn scrape_job_posting(url: &str) -> Result<String, AppError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Scrape(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Scrape(format!("Request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Scrape(format!("Page returned status {status}")));
    }

    let html = response
        .text()
        .await
        .map_err(|e| AppError::Scrape(format!("Failed to read body: {e}")))?;

    let text = extract_visible_text(&html);
    if text.is_empty() {
        return Err(AppError::Scrape("Page contained no visible text".to_string()));
    }

    Ok(text)
}

/// Extracts visible text from an HTML document, skipping script/style/head
/// subtrees, and collapses whitespace into one trimmed line per text chunk.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks = Vec::new();
    collect_text(document.tree.root(), &mut chunks);

    chunks
        .iter()
        .flat_map(|chunk| chunk.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "head"];

fn collect_text(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    if let Node::Element(element) = node.value() {
        if SKIPPED_TAGS.contains(&element.name()) {
            return;
        }
    }
    if let Node::Text(text) = node.value() {
        out.push(text.to_string());
    }
    for child in node.children() {
        collect_text(child, out);
    }
}
