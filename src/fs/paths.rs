//! Destination directory layout.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::NamingConvention;
use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Date folder format (`yyyyMMdd`).
const DATE_FOLDER_FORMAT: &str = "%Y%m%d";

/// Compute the subdirectory a post's media is written to.
///
/// Pure: nothing is created on disk. Fails only when the screen name cannot
/// be turned into a safe path component.
pub fn subdirectory(
    base: &Path,
    convention: NamingConvention,
    created_at: &DateTime<Utc>,
    screen_name: &str,
) -> Result<PathBuf> {
    let date = || created_at.format(DATE_FOLDER_FORMAT).to_string();

    let path = match convention {
        NamingConvention::Flat => base.to_path_buf(),
        NamingConvention::Date => base.join(date()),
        NamingConvention::ScreenName => base.join(sanitize_path_component(screen_name)?),
        NamingConvention::DateScreenName => base
            .join(date())
            .join(sanitize_path_component(screen_name)?),
        NamingConvention::ScreenNameDate => base
            .join(sanitize_path_component(screen_name)?)
            .join(date()),
    };

    Ok(path)
}
