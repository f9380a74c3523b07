//! Headline service client.
//!
//! Talks to a NewsAPI-shaped HTTP endpoint (`/top-headlines`). The response
//! body is decoded defensively: articles with a missing title or URL are
//! skipped rather than failing the whole request.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Categories the headline service understands. `/news` arguments are
/// validated against this list (lowercased) before any request goes out.
pub const SUPPORTED_CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// Category used when `/news` is sent without an argument.
pub const DEFAULT_CATEGORY: &str = "general";

// Headlines shown per request.
const PAGE_SIZE: &str = "5";

/// A single headline as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    url: Option<String>,
}

pub fn is_supported_category(category: &str) -> bool {
    SUPPORTED_CATEGORIES.contains(&category)
}

/// Client for the headline service.
pub struct HeadlineClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HeadlineClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the current top headlines for `category`.
    ///
    /// Failures are returned to the caller once; there is no retry.
    pub async fn fetch_top_headlines(&self, category: &str) -> Result<Vec<Headline>> {
        let url = format!("{}/top-headlines", self.base_url);
        let body = self
            .http
            .get(&url)
            .query(&[
                ("country", "us"),
                ("category", category),
                ("pageSize", PAGE_SIZE),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("headline service request failed")?
            .error_for_status()
            .context("headline service returned an error status")?
            .text()
            .await
            .context("failed to read headline service response")?;

        parse_headlines(&body)
    }
}

fn parse_headlines(body: &str) -> Result<Vec<Headline>> {
    let response: HeadlinesResponse =
        serde_json::from_str(body).context("headline service returned malformed JSON")?;

    if response.status != "ok" {
        anyhow::bail!("headline service reported status '{}'", response.status);
    }

    let total = response.articles.len();
    let headlines: Vec<Headline> = response
        .articles
        .into_iter()
        .filter_map(|article| match (article.title, article.url) {
            (Some(title), Some(url)) => Some(Headline { title, url }),
            _ => None,
        })
        .collect();
    debug!(
        articles = total,
        usable = headlines.len(),
        "headline response parsed"
    );

    Ok(headlines)
}
