//! Resolved media representation.

/// A single downloadable media item for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    /// URI as discovered on the post; this is what the cache records.
    pub source_uri: String,

    /// URI actually fetched (may carry a size-variant suffix).
    pub download_uri: String,

    /// Unsanitized destination filename.
    pub filename: String,
}

impl ResolvedMedia {
    /// Create an item whose download URI and filename derive from the source.
    pub fn from_source(source_uri: impl Into<String>) -> Self {
        let source_uri = source_uri.into();
        Self {
            download_uri: source_uri.clone(),
            filename: filename_from_uri(&source_uri),
            source_uri,
        }
    }

    /// Override the URI that gets fetched.
    pub fn with_download_uri(mut self, download_uri: impl Into<String>) -> Self {
        self.download_uri = download_uri.into();
        self
    }
}

/// Last path segment of a URI, without query or fragment.
///
/// Returns an empty string when the URI has no usable segment; the caller
/// rejects that during sanitization.
pub fn filename_from_uri(uri: &str) -> String {
    if let Ok(parsed) = url::Url::parse(uri) {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
    }

    let without_query = uri.split(['?', '#']).next().unwrap_or_default();
    without_query
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_uri() {
        assert_eq!(
            filename_from_uri("https://pbs.twimg.com/media/AAA.jpg"),
            "AAA.jpg"
        );
        assert_eq!(
            filename_from_uri("https://cdn.example.com/v/clip.mp4?token=1#t=3"),
            "clip.mp4"
        );
        assert_eq!(filename_from_uri("https://example.com/"), "");
        assert_eq!(filename_from_uri("not a url/pic.png?x"), "pic.png");
    }

    #[test]
    fn test_from_source_defaults() {
        let item = ResolvedMedia::from_source("https://example.com/a/b.gif")
            .with_download_uri("https://example.com/a/b.gif?large");
        assert_eq!(item.source_uri, "https://example.com/a/b.gif");
        assert_eq!(item.download_uri, "https://example.com/a/b.gif?large");
        assert_eq!(item.filename, "b.gif");
    }
}
