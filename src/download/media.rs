//! Media file downloading.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Writes the body behind a URI to a local file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch `url` into `output_path`, returning the number of bytes written.
    ///
    /// The file may be left partially written on error; callers own cleanup.
    async fn fetch_to_file(&self, url: &str, output_path: &Path) -> Result<u64>;
}

/// What happened to a single media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    /// Destination already existed; nothing was fetched.
    Skipped { path: PathBuf },
}

/// Download `url` to `target_dir/filename` unless the file already exists.
///
/// Data lands in a uniquely named `.part` file next to the destination and is
/// renamed into place only after the fetch succeeds, so an interrupted or
/// failed download never occupies the final name.
pub async fn download_media(
    fetcher: &dyn MediaFetcher,
    url: &str,
    target_dir: &Path,
    filename: &str,
) -> Result<DownloadOutcome> {
    let output_path = target_dir.join(filename);

    if tokio::fs::try_exists(&output_path).await? {
        return Ok(DownloadOutcome::Skipped { path: output_path });
    }

    tokio::fs::create_dir_all(target_dir).await?;

    let part_path = target_dir.join(format!(".{}.{}.part", filename, uuid::Uuid::new_v4()));

    let bytes = match fetcher.fetch_to_file(url, &part_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            remove_part_file(&part_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&part_path, &output_path).await {
        remove_part_file(&part_path).await;
        return Err(Error::Download(format!(
            "Failed to move download into place at {}: {}",
            output_path.display(),
            e
        )));
    }

    Ok(DownloadOutcome::Downloaded {
        path: output_path,
        bytes,
    })
}

async fn remove_part_file(part_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(part_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                "Could not remove partial download {}: {}",
                part_path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    struct StubFetcher {
        calls: AtomicUsize,
        body: &'static [u8],
        fail_after_write: bool,
    }

    impl StubFetcher {
        fn new(body: &'static [u8], fail_after_write: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body,
                fail_after_write,
            }
        }
    }

    #[async_trait]
    impl MediaFetcher for StubFetcher {
        async fn fetch_to_file(&self, _url: &str, output_path: &Path) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::fs::write(output_path, self.body).await?;
            if self.fail_after_write {
                return Err(Error::Download("connection reset".into()));
            }
            Ok(self.body.len() as u64)
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_downloads_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("20240301").join("alice");
        let fetcher = StubFetcher::new(b"jpegdata", false);

        let outcome = assert_ok!(download_media(&fetcher, "https://x/a.jpg", &target, "a.jpg").await);

        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: target.join("a.jpg"),
                bytes: 8
            }
        );
        assert_eq!(std::fs::read(target.join("a.jpg")).unwrap(), b"jpegdata");
        assert_eq!(entries(&target), vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn test_existing_file_is_skipped_without_fetch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"old").unwrap();
        let fetcher = StubFetcher::new(b"new", false);

        let outcome = assert_ok!(download_media(&fetcher, "https://x/a.jpg", dir.path(), "a.jpg").await);

        assert!(matches!(outcome, DownloadOutcome::Skipped { .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read(dir.path().join("a.jpg")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let fetcher = StubFetcher::new(b"trunc", true);

        assert_err!(download_media(&fetcher, "https://x/a.jpg", dir.path(), "a.jpg").await);

        assert!(entries(dir.path()).is_empty());
    }
}
