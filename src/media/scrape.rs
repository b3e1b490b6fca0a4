//! Best-effort scraping of shared pages for embedded video.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::media::item::ResolvedMedia;

static VIDEO_SOURCE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"source[type="video/mp4"][video-src]"#).expect("video selector is valid")
});

/// Looks inside a linked page for media the post does not carry natively.
#[async_trait]
pub trait EmbeddedMediaScraper: Send + Sync {
    /// Return the media embedded in the page at `url`.
    async fn scrape(&self, url: &str) -> Result<Vec<ResolvedMedia>>;
}

/// Scraper fetching pages over HTTP and reading `<source>` tags.
#[derive(Debug, Clone)]
pub struct HtmlScraper {
    client: Client,
}

impl HtmlScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddedMediaScraper for HtmlScraper {
    async fn scrape(&self, url: &str) -> Result<Vec<ResolvedMedia>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Scrape(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Scrape(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Scrape(format!("{}: {}", url, e)))?;

        Ok(extract_video_sources(&body, url))
    }
}

/// Every `<source type="video/mp4" video-src=...>` in the document.
///
/// Relative sources are resolved against `page_url`.
pub fn extract_video_sources(html: &str, page_url: &str) -> Vec<ResolvedMedia> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    document
        .select(&VIDEO_SOURCE)
        .filter_map(|element| element.value().attr("video-src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter_map(|src| match &base {
            Some(base) => base.join(src).ok().map(String::from),
            None => Some(src.to_string()),
        })
        .map(ResolvedMedia::from_source)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_sources() {
        let html = r#"
            <html><body>
              <video>
                <source type="video/mp4" video-src="https://cdn.example.com/v/first.mp4?sig=1">
                <source type="video/webm" video-src="https://cdn.example.com/v/skip.webm">
                <source type="video/mp4" src="https://cdn.example.com/v/no-attr.mp4">
                <source type="video/mp4" video-src="/v/second.mp4">
              </video>
            </body></html>
        "#;

        let items = extract_video_sources(html, "https://vine.example.com/p/42");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].download_uri, "https://cdn.example.com/v/first.mp4?sig=1");
        assert_eq!(items[0].filename, "first.mp4");
        assert_eq!(items[1].source_uri, "https://vine.example.com/v/second.mp4");
        assert_eq!(items[1].filename, "second.mp4");
    }

    #[test]
    fn test_extract_from_page_without_video() {
        assert!(extract_video_sources("<p>nothing here</p>", "https://example.com").is_empty());
    }
}
