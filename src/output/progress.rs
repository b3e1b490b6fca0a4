//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

const DOWNLOAD_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";

/// Create a progress bar for a single large download.
pub fn create_download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(DOWNLOAD_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        assert!(ProgressStyle::default_bar().template(DOWNLOAD_TEMPLATE).is_ok());
        assert_eq!(create_download_bar(42).length(), Some(42));
    }
}
