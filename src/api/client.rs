//! Favorites API HTTP client.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::feed::{FavoritesFeed, FavoritesPage};
use crate::api::types::{AccountInfo, ApiErrorResponse, Post, RateLimitInfo, Tweet};
use crate::download::MediaFetcher;
use crate::error::{Error, Result};
use crate::output::create_download_bar;

/// Default API base URL.
pub const API_BASE: &str = "https://api.twitter.com/1.1";

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// API client holding a ready-to-use bearer token.
pub struct TwitterApi {
    client: Client,
    token: String,
    api_base: String,
    show_progress: bool,
}

impl TwitterApi {
    /// Create a new API client.
    pub fn new(token: String, user_agent: &str, api_base: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            api_base: api_base
                .unwrap_or_else(|| API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            show_progress: true,
        })
    }

    /// Enable or disable progress bars for large downloads.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The underlying HTTP client, for collaborators that fetch public pages.
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Make an authenticated GET request and classify failures.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.api_base, path);

        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let rate_limit = RateLimitInfo::from_headers(response.headers());
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|e| e.describe())
            .unwrap_or(body);

        Err(classify_status(status, detail, rate_limit))
    }

    /// Validate the token and return the authenticated account.
    pub async fn verify_credentials(&self) -> Result<AccountInfo> {
        let response = self
            .get(
                "/account/verify_credentials.json",
                &[("skip_status", "true".to_string())],
            )
            .await?;
        let text = response.text().await?;

        parse_body(&text, "account info")
    }

    /// Get one page of favorites.
    pub async fn get_favorites(&self, max_id: Option<u64>, count: u32) -> Result<FavoritesPage> {
        let mut query = vec![
            ("count", count.to_string()),
            ("include_entities", "true".to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        if let Some(max_id) = max_id {
            query.push(("max_id", max_id.to_string()));
        }

        let response = self.get("/favorites/list.json", &query).await?;
        let rate_limit = RateLimitInfo::from_headers(response.headers());
        let text = response.text().await?;
        tracing::debug!("Favorites response length: {} bytes", text.len());

        let tweets: Vec<Tweet> = parse_body(&text, "favorites")?;

        Ok(FavoritesPage {
            posts: tweets.into_iter().map(Post::from).collect(),
            rate_limit,
        })
    }

    /// Download a file from a URL (unauthenticated).
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Characters of an unparseable body quoted in the error message.
const BODY_EXCERPT_CHARS: usize = 500;

/// Parse a JSON body, quoting the start of it on failure.
fn parse_body<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        Error::Api(format!(
            "Failed to parse {}: {} - Response: {}",
            what,
            e,
            text.chars().take(BODY_EXCERPT_CHARS).collect::<String>()
        ))
    })
}

/// Map a non-success status to the error taxonomy.
fn classify_status(status: StatusCode, detail: String, rate_limit: Option<RateLimitInfo>) -> Error {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
            reset: rate_limit.and_then(|r| r.reset),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::error!("Auth error response: {}", detail);
            Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if detail.is_empty() {
                    "Authentication failed"
                } else {
                    &detail
                }
            ))
        }
        _ => Error::Api(format!("HTTP {}: {}", status, detail)),
    }
}

#[async_trait]
impl FavoritesFeed for TwitterApi {
    async fn list_favorites(&self, before: Option<u64>, count: u32) -> Result<FavoritesPage> {
        self.get_favorites(before, count).await
    }
}

#[async_trait]
impl MediaFetcher for TwitterApi {
    async fn fetch_to_file(&self, url: &str, output_path: &Path) -> Result<u64> {
        let response = self.download_file(url).await?;

        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let mut file = File::create(output_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        if let Some(expected) = content_length {
            if downloaded != expected {
                return Err(Error::Download(format!(
                    "Truncated download: got {} of {} bytes",
                    downloaded, expected
                )));
            }
        }

        Ok(downloaded)
    }
}

impl std::fmt::Debug for TwitterApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterApi")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
