//! Favorites Downloader - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use console::Term;
use tracing_subscriber::{fmt, EnvFilter};

use favorites_downloader::{
    api::TwitterApi,
    cli::Args,
    config::{validate_config, Config},
    download::{download_favorites, RunStats, SyncContext, SyncOptions, SyncOutcome},
    error::{exit_codes, Error, Result},
    media::{EmbeddedMediaScraper, HtmlScraper},
    output::{
        pause_before_exit, print_banner, print_cache_summary, print_config_summary, print_error, print_info,
        print_run_stats, print_success, print_warning,
    },
    shutdown::install_signal_handler,
    store::{FavoriteStore, SqliteFavoriteStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();
    let no_pause = args.no_pause;

    let code = match run(args).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(Error::Interrupted) => {
            print_warning("Interrupted; pending posts will be retried next run");
            exit_codes::INTERRUPTED
        }
        Err(e) => {
            print_error(&format!("{}", e));
            e.exit_code()
        }
    };

    // Interrupted runs exit straight away.
    if code != exit_codes::INTERRUPTED {
        if let Err(e) = pause_before_exit(no_pause) {
            tracing::debug!("Exit prompt failed: {}", e);
        }
    }

    ExitCode::from(code as u8)
}

async fn run(args: Args) -> Result<()> {
    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let reset = args.reset;
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    if config.download_directory().is_none() {
        let chosen = prompt_download_directory()?;
        persist_download_directory(&config_path, &chosen)?;
        config.options.download_directory = Some(chosen);
    }

    let options = SyncOptions::from_config(&config)?;
    let database_path = config.database_path();

    print_config_summary(
        &options.download_directory.display().to_string(),
        &options.naming_convention.to_string(),
        &database_path.display().to_string(),
    );

    // Open the cache
    let store: Arc<dyn FavoriteStore> = Arc::new(SqliteFavoriteStore::open(&database_path).await?);

    if reset {
        if store.reset_all().await? {
            print_info("Marked every cached favorite pending again");
        } else {
            print_info("Nothing to reset");
        }
    }

    let summary = store.summary().await?;
    let oldest = store.oldest().await?;
    let latest = store.latest().await?;
    print_cache_summary(&summary, oldest, latest);

    // Initialize API client
    print_info("Connecting to the favorites API...");
    let api = TwitterApi::new(
        config.account.access_token.clone(),
        &config.account.user_agent,
        config.account.api_base.clone(),
    )?
    .with_progress(options.show_downloads);

    let account = api.verify_credentials().await?;
    print_info(&format!("Logged in as: {} (@{})", account.name, account.screen_name));

    let scraper = config
        .options
        .scrape_links
        .then(|| HtmlScraper::new(api.http_client()));

    let ctx = SyncContext {
        feed: &api,
        store: store.as_ref(),
        fetcher: &api,
        scraper: scraper.as_ref().map(|s| s as &dyn EmbeddedMediaScraper),
        options: &options,
        shutdown: install_signal_handler()?,
    };

    let mut stats = RunStats::default();
    let result = download_favorites(&ctx, &mut stats).await;

    // Flush even when the run failed so completed work is durable.
    let flushed = store.flush().await;

    print_run_stats(&stats, result.as_ref().ok().copied());

    let outcome = result?;
    flushed?;

    if outcome == SyncOutcome::Interrupted {
        return Err(Error::Interrupted);
    }

    if stats.has_failures() {
        print_warning(&format!(
            "{} post(s) still pending; they will be retried next run",
            stats.incomplete
        ));
    } else {
        print_success("All favorites up to date");
    }

    Ok(())
}

/// Ask for the download directory on first run.
fn prompt_download_directory() -> Result<PathBuf> {
    let default = Config::default_download_directory();
    let term = Term::stdout();

    if !term.is_term() {
        print_info(&format!(
            "No download directory configured, using {}",
            default.display()
        ));
        return Ok(default);
    }

    term.write_line(&format!(
        "Select folder to save to [{}]:",
        default.display()
    ))?;
    let answer = term.read_line()?;
    let answer = answer.trim();

    Ok(if answer.is_empty() {
        default
    } else {
        PathBuf::from(answer)
    })
}

/// Save the chosen download directory without writing CLI overrides to disk.
fn persist_download_directory(config_path: &Path, directory: &Path) -> Result<()> {
    let mut on_disk = if config_path.exists() {
        Config::load(config_path)?
    } else {
        Config::default()
    };
    on_disk.options.download_directory = Some(directory.to_path_buf());
    on_disk.save(config_path)?;

    print_info(&format!(
        "Saved download directory to {}",
        config_path.display()
    ));
    Ok(())
}
