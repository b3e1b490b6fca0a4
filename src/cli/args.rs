//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, NamingConvention};

/// Favorites media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "favorites-downloader",
    version,
    about = "Incrementally mirror media from your favorited posts",
    long_about = "Walks your favorites feed from newest to oldest and downloads every attached \
                  image or linked video.\n\n\
                  Progress is kept in a local cache, so repeated runs only fetch what is new \
                  or failed last time."
)]
pub struct Args {
    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Bearer token for the favorites API.
    #[arg(short, long, env = "FAVORITES_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// User agent sent with API and download requests.
    #[arg(short = 'a', long = "user-agent", env = "FAVORITES_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Subdirectory layout below the download directory.
    #[arg(short, long, value_enum)]
    pub naming: Option<NamingArg>,

    /// Favorites requested per page (1-200).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Maximum number of pages fetched in one run.
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Seconds to wait after hitting the rate limit.
    #[arg(long = "cooldown")]
    pub rate_limit_cooldown: Option<u64>,

    /// Posts processed concurrently.
    #[arg(long)]
    pub post_concurrency: Option<usize>,

    /// Downloads running concurrently within a post.
    #[arg(long)]
    pub media_concurrency: Option<usize>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the favorites cache database.
    #[arg(long = "database", env = "FAVORITES_DATABASE")]
    pub database_path: Option<PathBuf>,

    /// Mark every cached favorite pending again before syncing.
    #[arg(long)]
    pub reset: bool,

    /// Don't look inside linked pages for embedded video.
    #[arg(long)]
    pub no_scrape: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Show information about skipped downloads.
    #[arg(long)]
    pub show_skipped: bool,

    /// Exit without waiting for ENTER in an interactive terminal.
    #[arg(long, env = "FAVORITES_NO_PAUSE")]
    pub no_pause: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI naming convention argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NamingArg {
    /// All files directly in the download directory.
    Flat,
    /// One folder per posting date.
    Date,
    /// One folder per author.
    ScreenName,
    /// Date folder, then author folder.
    DateScreenName,
    /// Author folder, then date folder.
    ScreenNameDate,
}

impl From<NamingArg> for NamingConvention {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Flat => NamingConvention::Flat,
            NamingArg::Date => NamingConvention::Date,
            NamingArg::ScreenName => NamingConvention::ScreenName,
            NamingArg::DateScreenName => NamingConvention::DateScreenName,
            NamingArg::ScreenNameDate => NamingConvention::ScreenNameDate,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(token) = self.token {
            config.account.access_token = token;
        }

        if let Some(user_agent) = self.user_agent {
            config.account.user_agent = user_agent;
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }

        if let Some(naming) = self.naming {
            config.options.naming_convention = naming.into();
        }

        if let Some(page_size) = self.page_size {
            config.options.page_size = page_size;
        }

        if let Some(max_pages) = self.max_pages {
            config.options.max_pages = max_pages;
        }

        if let Some(cooldown) = self.rate_limit_cooldown {
            config.options.rate_limit_cooldown_secs = cooldown;
        }

        if let Some(n) = self.post_concurrency {
            config.options.post_concurrency = n;
        }

        if let Some(n) = self.media_concurrency {
            config.options.media_concurrency = n;
        }

        if let Some(path) = self.database_path {
            config.cache.database_path = Some(path);
        }

        // Boolean flags (only override if set to non-default)
        if self.no_scrape {
            config.options.scrape_links = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
            config.options.show_skipped_downloads = false;
        }

        if self.show_skipped {
            config.options.show_skipped_downloads = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from([
            "favorites-downloader",
            "--token",
            "abc",
            "--naming",
            "date-screen-name",
            "--page-size",
            "50",
            "--no-scrape",
            "--quiet",
        ])
        .unwrap();

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.account.access_token, "abc");
        assert_eq!(
            config.options.naming_convention,
            NamingConvention::DateScreenName
        );
        assert_eq!(config.options.page_size, 50);
        assert!(!config.options.scrape_links);
        assert!(!config.options.show_downloads);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = Args::try_parse_from(["favorites-downloader", "--reset"]).unwrap();
        assert!(args.reset);

        let mut config = Config::default();
        config.options.max_pages = 7;
        args.merge_into_config(&mut config);

        assert_eq!(config.options.max_pages, 7);
        assert!(config.options.scrape_links);
    }

    #[test]
    fn test_no_pause_flag() {
        let args = Args::try_parse_from(["favorites-downloader", "--no-pause"]).unwrap();
        assert!(args.no_pause);
    }
}
