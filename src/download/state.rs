//! Per-post reports and run statistics.

/// How a post ended up after one pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    /// Already complete in the cache; nothing was done.
    AlreadyComplete,
    /// Every media item is on disk and the post is now marked complete.
    Completed,
    /// At least one item failed or was not attempted; the post stays pending.
    Incomplete,
}

/// Result of processing a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReport {
    pub post_id: u64,
    pub status: PostStatus,
    /// Whether this run inserted the post into the cache.
    pub newly_seen: bool,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes: u64,
}

impl PostReport {
    /// Report for a post that needed no work.
    pub fn already_complete(post_id: u64) -> Self {
        Self {
            post_id,
            status: PostStatus::AlreadyComplete,
            newly_seen: false,
            downloaded: 0,
            skipped: 0,
            failed: 0,
            bytes: 0,
        }
    }
}

/// Statistics aggregated over a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub pages: u64,
    pub posts_seen: u64,
    pub new_posts: u64,
    pub already_complete: u64,
    pub completed: u64,
    pub incomplete: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes: u64,
    pub rate_limit_waits: u64,
}

impl RunStats {
    /// Fold one post report into the totals.
    pub fn record(&mut self, report: &PostReport) {
        self.posts_seen += 1;
        if report.newly_seen {
            self.new_posts += 1;
        }
        match report.status {
            PostStatus::AlreadyComplete => self.already_complete += 1,
            PostStatus::Completed => self.completed += 1,
            PostStatus::Incomplete => self.incomplete += 1,
        }
        self.downloaded += report.downloaded;
        self.skipped += report.skipped;
        self.failed += report.failed;
        self.bytes += report.bytes;
    }

    /// Whether any post was left pending.
    pub fn has_failures(&self) -> bool {
        self.incomplete > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_aggregates() {
        let mut stats = RunStats::default();
        stats.record(&PostReport::already_complete(1));
        stats.record(&PostReport {
            post_id: 2,
            status: PostStatus::Completed,
            newly_seen: true,
            downloaded: 2,
            skipped: 1,
            failed: 0,
            bytes: 2048,
        });
        stats.record(&PostReport {
            post_id: 3,
            status: PostStatus::Incomplete,
            newly_seen: true,
            downloaded: 0,
            skipped: 0,
            failed: 1,
            bytes: 0,
        });

        assert_eq!(stats.posts_seen, 3);
        assert_eq!(stats.new_posts, 2);
        assert_eq!(stats.already_complete, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.incomplete, 1);
        assert_eq!(stats.downloaded, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.bytes, 2048);
        assert!(stats.has_failures());
    }
}
