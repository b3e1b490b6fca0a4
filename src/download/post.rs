//! Per-post pipeline: cache bookkeeping, resolution and media downloads.

use chrono::Local;
use futures::future;
use futures::stream::{self, StreamExt};

use crate::api::Post;
use crate::download::context::SyncContext;
use crate::download::media::{download_media, DownloadOutcome};
use crate::download::state::{PostReport, PostStatus};
use crate::error::Result;
use crate::fs::{sanitize_filename, subdirectory};
use crate::media::{resolve_post_media, ResolvedMedia};
use crate::store::FavoriteRecord;

/// Outcome of one media item within a post.
#[derive(Debug)]
enum ItemResult {
    Downloaded(u64),
    Skipped,
    Failed,
}

/// Run one post through the pipeline.
///
/// Only cache failures are returned as errors. Download problems are logged,
/// counted in the report and leave the post pending for the next run.
pub async fn process_post(ctx: &SyncContext<'_>, post: &Post) -> Result<PostReport> {
    if ctx.store.is_complete(post.id).await? {
        if ctx.options.show_skipped_downloads {
            tracing::debug!("Post {} already complete", post.id);
        }
        return Ok(PostReport::already_complete(post.id));
    }

    let items = resolve_post_media(post, ctx.scraper).await;

    let newly_seen = if ctx.store.exists(post.id).await? {
        false
    } else {
        let source_uris: Vec<String> = items.iter().map(|m| m.source_uri.clone()).collect();
        ctx.store
            .insert_pending(&FavoriteRecord::new_pending(post), &source_uris)
            .await?
    };

    if ctx.options.show_downloads {
        tracing::info!("{}", summary_line(post));
    }

    let mut report = PostReport {
        post_id: post.id,
        status: PostStatus::Incomplete,
        newly_seen,
        downloaded: 0,
        skipped: 0,
        failed: 0,
        bytes: 0,
    };

    let results = download_items(ctx, post, &items).await;
    for result in &results {
        match result {
            ItemResult::Downloaded(bytes) => {
                report.downloaded += 1;
                report.bytes += bytes;
            }
            ItemResult::Skipped => report.skipped += 1,
            ItemResult::Failed => report.failed += 1,
        }
    }

    let all_attempted = results.len() == items.len();
    if all_attempted && report.failed == 0 {
        ctx.store.mark_complete(post.id).await?;
        report.status = PostStatus::Completed;
    } else if !all_attempted {
        tracing::debug!(
            "Post {} interrupted after {} of {} item(s)",
            post.id,
            results.len(),
            items.len()
        );
    }

    Ok(report)
}

/// Download a post's media on a bounded pool. Stops starting new items once
/// shutdown is requested; in-flight items run to completion.
async fn download_items(
    ctx: &SyncContext<'_>,
    post: &Post,
    items: &[ResolvedMedia],
) -> Vec<ItemResult> {
    if items.is_empty() {
        return Vec::new();
    }

    let target_dir = match subdirectory(
        &ctx.options.download_directory,
        ctx.options.naming_convention,
        &post.created_at,
        &post.author_screen_name,
    ) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("No usable directory for post {}: {}", post.id, e);
            return items.iter().map(|_| ItemResult::Failed).collect();
        }
    };

    stream::iter(items)
        .take_while(|_| future::ready(!ctx.shutdown.is_cancelled()))
        .map(|item| {
            let target_dir = &target_dir;
            async move {
                let filename = match sanitize_filename(&item.filename) {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", item.source_uri, e);
                        return ItemResult::Failed;
                    }
                };

                if ctx.options.show_downloads {
                    tracing::info!(" - Downloading... {}", item.download_uri);
                }

                match download_media(ctx.fetcher, &item.download_uri, target_dir, &filename).await
                {
                    Ok(DownloadOutcome::Downloaded { bytes, .. }) => ItemResult::Downloaded(bytes),
                    Ok(DownloadOutcome::Skipped { path }) => {
                        if ctx.options.show_skipped_downloads {
                            tracing::info!(" - Already exists: {}", path.display());
                        }
                        ItemResult::Skipped
                    }
                    Err(e) => {
                        tracing::warn!("Failed to download {}: {}", item.download_uri, e);
                        ItemResult::Failed
                    }
                }
            }
        })
        .buffer_unordered(ctx.options.media_concurrency)
        .collect()
        .await
}

/// `Name (@screen) -- time` followed by the post text.
pub fn summary_line(post: &Post) -> String {
    format!(
        "{} (@{}) -- {}\n{}",
        post.author_name,
        post.author_screen_name,
        post.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S"),
        post.text
    )
}
