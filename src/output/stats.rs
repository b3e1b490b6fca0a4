//! Statistics reporting.

use console::style;

use crate::download::{RunStats, SyncOutcome};
use crate::store::StoreSummary;

/// Print the cache state found at start-up.
pub fn print_cache_summary(summary: &StoreSummary, oldest: Option<u64>, latest: Option<u64>) {
    let id = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());

    println!("{}", style("Cache:").bold());
    println!(
        "  Favorites: {} ({} complete, {} pending)",
        summary.total, summary.complete, summary.pending
    );
    println!("  Media URIs: {}", summary.media_uris);
    println!("  Oldest id: {}", id(oldest));
    println!("  Latest id: {}", id(latest));
    println!();
}

/// Print statistics for a finished run.
pub fn print_run_stats(stats: &RunStats, outcome: Option<SyncOutcome>) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    if let Some(outcome) = outcome {
        let reason = match outcome {
            SyncOutcome::NoMoreHistory => "reached the oldest favorite",
            SyncOutcome::PageCap => "page cap reached",
            SyncOutcome::Interrupted => "interrupted",
        };
        println!("  Stopped:    {}", reason);
    }
    println!("  Pages:      {}", stats.pages);
    println!(
        "  Posts:      {} seen, {} new, {} already complete",
        stats.posts_seen, stats.new_posts, stats.already_complete
    );
    println!("  Completed:  {}", style(stats.completed).green());
    if stats.incomplete > 0 {
        println!(
            "  Pending:    {} (retried next run)",
            style(stats.incomplete).yellow()
        );
    }
    println!(
        "  Files:      {} downloaded, {} skipped (existing)",
        stats.downloaded, stats.skipped
    );
    if stats.failed > 0 {
        println!("  Failed:     {}", style(stats.failed).red());
    }
    println!("  Bytes:      {}", indicatif::HumanBytes(stats.bytes));
    if stats.rate_limit_waits > 0 {
        println!("  Rate-limit waits: {}", stats.rate_limit_waits);
    }
    println!("{}", style("═".repeat(50)).dim());
}
