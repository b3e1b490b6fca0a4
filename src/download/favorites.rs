//! Favorites pagination loop.

use std::time::Duration;

use futures::future;
use futures::stream::{self, StreamExt};

use crate::api::{Post, RateLimitInfo};
use crate::download::context::SyncContext;
use crate::download::post::process_post;
use crate::download::state::{PostReport, RunStats};
use crate::error::{Error, Result};

/// Why a sync run stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The feed returned a short page: the whole history has been walked.
    NoMoreHistory,
    /// The configured page cap was reached.
    PageCap,
    /// Shutdown was requested; in-flight work was drained.
    Interrupted,
}

/// Walk the favorites feed from newest to oldest, processing every post.
///
/// Pages are fetched one at a time. A rate-limited request is retried
/// unchanged after the configured cooldown until the consecutive wait would
/// exceed `max_rate_limit_wait`. Every other feed error ends the run.
pub async fn download_favorites(ctx: &SyncContext<'_>, stats: &mut RunStats) -> Result<SyncOutcome> {
    let options = ctx.options;
    let mut cursor: Option<u64> = None;
    let mut pages: u32 = 0;
    let mut rate_limit_waited = Duration::ZERO;

    tracing::info!("Downloading favorites...");

    loop {
        if ctx.shutdown.is_cancelled() {
            return Ok(SyncOutcome::Interrupted);
        }

        if pages >= options.max_pages {
            tracing::info!("Reached page cap ({} pages)", options.max_pages);
            return Ok(SyncOutcome::PageCap);
        }

        let before = cursor.map(|c| c.saturating_sub(1));
        let page = match ctx.feed.list_favorites(before, options.page_size).await {
            Ok(page) => page,
            Err(Error::RateLimited { reset }) => {
                let waited = rate_limit_waited + options.rate_limit_cooldown;
                // A zero cooldown never accumulates toward the cap.
                if options.rate_limit_cooldown.is_zero() || waited > options.max_rate_limit_wait {
                    return Err(Error::RateLimitExhausted(rate_limit_waited.as_secs()));
                }

                match reset {
                    Some(reset) => tracing::warn!(
                        "Rate limited (quota resets at {}), waiting {}s before retrying",
                        reset.to_rfc3339(),
                        options.rate_limit_cooldown.as_secs()
                    ),
                    None => tracing::warn!(
                        "Rate limited, waiting {}s before retrying",
                        options.rate_limit_cooldown.as_secs()
                    ),
                }

                stats.rate_limit_waits += 1;
                tokio::select! {
                    _ = ctx.shutdown.cancelled() => return Ok(SyncOutcome::Interrupted),
                    _ = tokio::time::sleep(options.rate_limit_cooldown) => {}
                }
                rate_limit_waited = waited;
                continue;
            }
            Err(e) => return Err(e),
        };

        rate_limit_waited = Duration::ZERO;
        pages += 1;
        stats.pages += 1;

        if let Some(quota) = &page.rate_limit {
            log_quota(quota);
        }

        let page_len = page.posts.len();
        tracing::debug!(
            "Page {} (before {:?}): {} post(s)",
            pages,
            before,
            page_len
        );
        cursor = next_cursor(cursor, &page.posts);

        let reports = process_page(ctx, page.posts).await?;
        for report in &reports {
            stats.record(report);
        }

        if ctx.shutdown.is_cancelled() {
            return Ok(SyncOutcome::Interrupted);
        }

        if page_len < options.page_size as usize {
            tracing::info!("No more favorites");
            return Ok(SyncOutcome::NoMoreHistory);
        }
    }
}

/// Process the posts of one page on a bounded pool.
///
/// Posts already in flight run to completion even after one of them fails,
/// so no download is abandoned halfway. The first error is returned after.
async fn process_page(ctx: &SyncContext<'_>, posts: Vec<Post>) -> Result<Vec<PostReport>> {
    let results: Vec<Result<PostReport>> = stream::iter(posts)
        .take_while(|_| future::ready(!ctx.shutdown.is_cancelled()))
        .map(|post| async move { process_post(ctx, &post).await })
        .buffer_unordered(ctx.options.post_concurrency)
        .collect()
        .await;

    results.into_iter().collect()
}

/// Lowest id seen so far. Never moves toward newer posts.
pub fn next_cursor(cursor: Option<u64>, posts: &[Post]) -> Option<u64> {
    let page_min = posts.iter().map(|p| p.id).min();
    match (cursor, page_min) {
        (Some(c), Some(m)) => Some(c.min(m)),
        (c, m) => c.or(m),
    }
}

fn log_quota(quota: &RateLimitInfo) {
    let reset = quota
        .reset
        .map(|r| r.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(
        "Limit: {}/{}, Reset: {}",
        quota.remaining,
        quota.limit,
        reset
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(ids: &[u64]) -> Vec<Post> {
        ids.iter()
            .map(|&id| Post {
                id,
                ..Post::default()
            })
            .collect()
    }

    #[test]
    fn test_first_page_sets_cursor_to_minimum() {
        assert_eq!(next_cursor(None, &posts(&[30, 10, 20])), Some(10));
    }

    #[test]
    fn test_cursor_never_increases() {
        assert_eq!(next_cursor(Some(10), &posts(&[15, 12])), Some(10));
        assert_eq!(next_cursor(Some(10), &posts(&[9, 5])), Some(5));
    }

    #[test]
    fn test_empty_page_keeps_cursor() {
        assert_eq!(next_cursor(Some(7), &[]), Some(7));
        assert_eq!(next_cursor(None, &[]), None);
    }
}
