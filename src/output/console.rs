//! Console output utilities.

use console::{style, Term};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = format!(
        r#"
╔═══════════════════════════════════════════════════════╗
║     Favorites Downloader {:<29}║
║     Mirrors media from the posts you favorited        ║
╚═══════════════════════════════════════════════════════╝
"#,
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(download_dir: &str, naming: &str, database: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Directory: {}", download_dir);
    println!("  Naming:    {}", naming);
    println!("  Cache:     {}", database);
    println!();
}

/// Whether to hold the window open before exiting.
///
/// Only an interactive terminal is paused, so scheduled and piped runs never
/// block.
pub fn should_pause(no_pause: bool, interactive: bool) -> bool {
    interactive && !no_pause
}

/// Wait for ENTER before exiting when stdout is a terminal.
///
/// Returns whether the prompt was shown.
pub fn pause_before_exit(no_pause: bool) -> std::io::Result<bool> {
    let term = Term::stdout();
    if !should_pause(no_pause, term.is_term()) {
        return Ok(false);
    }

    term.write_line("Press ENTER to exit...")?;
    term.read_line()?;
    Ok(true)
}
