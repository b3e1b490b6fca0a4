//! Media URI resolution policy for a post.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::Post;
use crate::media::item::ResolvedMedia;
use crate::media::scrape::EmbeddedMediaScraper;

/// Host serving natively attached images.
pub const IMAGE_HOST: &str = "pbs.twimg.com";

/// Size variant requesting the largest rendition.
pub const ORIGINAL_SIZE_SUFFIX: &str = ":orig";

static IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*\.(jpg|gif|png)$").expect("image link pattern is valid")
});

/// Resolve the media of a post, in order.
///
/// Native attachments win; links are only considered when there are none.
/// Links that are not direct images go to `scraper` when one is supplied.
pub async fn resolve_post_media(
    post: &Post,
    scraper: Option<&dyn EmbeddedMediaScraper>,
) -> Vec<ResolvedMedia> {
    if post.has_native_media() {
        return post
            .media_urls
            .iter()
            .map(|uri| ResolvedMedia::from_source(uri).with_download_uri(upgrade_image_uri(uri)))
            .collect();
    }

    let mut resolved = Vec::new();
    for link in &post.link_urls {
        if is_image_link(link) {
            resolved.push(ResolvedMedia::from_source(link));
            continue;
        }

        let Some(scraper) = scraper else {
            continue;
        };

        match scraper.scrape(link).await {
            Ok(found) => {
                tracing::debug!("Scraped {} item(s) from {}", found.len(), link);
                resolved.extend(found);
            }
            Err(e) => {
                tracing::warn!("Could not scrape {}: {}", link, e);
            }
        }
    }

    resolved
}

/// Request the largest rendition for URIs on the image host.
pub fn upgrade_image_uri(uri: &str) -> String {
    let on_image_host = url::Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(IMAGE_HOST)))
        .unwrap_or(false);

    if on_image_host && !uri.ends_with(ORIGINAL_SIZE_SUFFIX) {
        format!("{}{}", uri, ORIGINAL_SIZE_SUFFIX)
    } else {
        uri.to_string()
    }
}

/// Whether a link points straight at an image file.
pub fn is_image_link(link: &str) -> bool {
    match url::Url::parse(link) {
        Ok(parsed) => IMAGE_LINK.is_match(parsed.path()),
        Err(_) => IMAGE_LINK.is_match(link),
    }
}
