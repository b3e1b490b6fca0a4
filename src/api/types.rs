//! API response type definitions and the feed-independent post model.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer};

/// Timestamp format used by the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A favorited post, reduced to what the download pipeline needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub author_id: u64,
    pub author_name: String,
    pub author_screen_name: String,
    pub text: String,
    /// Base URIs of natively attached media, in attachment order.
    pub media_urls: Vec<String>,
    /// Expanded URLs of the plain links in the post.
    pub link_urls: Vec<String>,
}

impl Post {
    /// Whether the platform attached media to this post directly.
    pub fn has_native_media(&self) -> bool {
        !self.media_urls.is_empty()
    }
}

/// Quota counters reported by the feed alongside each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    /// Read `x-rate-limit-*` response headers, if present.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_number(headers, "x-rate-limit-limit")?;
        let remaining = header_number(headers, "x-rate-limit-remaining")?;
        let reset = header_number::<i64>(headers, "x-rate-limit-reset")
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// A tweet as returned by `favorites/list.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_twitter_date")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub user: TweetUser,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,
}

/// Author of a tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetUser {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
}

/// Plain entities of a tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// A link embedded in tweet text.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub url: String,
    pub expanded_url: Option<String>,
}

/// Native media attachments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

/// A single native media attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaEntity {
    pub media_url_https: Option<String>,
    pub media_url: Option<String>,
}

/// User returned by `account/verify_credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
}

/// Error body returned by the API on failures.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// A single API error entry.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: i64,
    pub message: String,
}

impl ApiErrorResponse {
    /// Join all error messages for display.
    pub fn describe(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl From<Tweet> for Post {
    fn from(tweet: Tweet) -> Self {
        let media_urls = tweet
            .extended_entities
            .map(|ext| {
                ext.media
                    .into_iter()
                    .filter_map(|m| m.media_url_https.or(m.media_url))
                    .collect()
            })
            .unwrap_or_default();

        let link_urls = tweet
            .entities
            .urls
            .into_iter()
            .filter_map(|u| match u.expanded_url {
                Some(expanded) if !expanded.is_empty() => Some(expanded),
                _ if !u.url.is_empty() => Some(u.url),
                _ => None,
            })
            .collect();

        Self {
            id: tweet.id,
            created_at: tweet.created_at,
            author_id: tweet.user.id,
            author_name: tweet.user.name,
            author_screen_name: tweet.user.screen_name,
            text: tweet.full_text.or(tweet.text).unwrap_or_default(),
            media_urls,
            link_urls,
        }
    }
}

fn deserialize_twitter_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&raw, TWITTER_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(&raw))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
