//! Directory naming conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How downloaded files are grouped under the download directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingConvention {
    /// Everything directly in the download directory (default).
    #[default]
    Flat,
    /// One folder per posting date (`yyyyMMdd`).
    Date,
    /// One folder per author screen name.
    ScreenName,
    /// Date folder, then author folder.
    #[serde(rename = "Date_ScreenName")]
    DateScreenName,
    /// Author folder, then date folder.
    #[serde(rename = "ScreenName_Date")]
    ScreenNameDate,
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingConvention::Flat => write!(f, "Flat"),
            NamingConvention::Date => write!(f, "Date"),
            NamingConvention::ScreenName => write!(f, "ScreenName"),
            NamingConvention::DateScreenName => write!(f, "Date_ScreenName"),
            NamingConvention::ScreenNameDate => write!(f, "ScreenName_Date"),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "flat" | "none" => Ok(NamingConvention::Flat),
            "date" => Ok(NamingConvention::Date),
            "screenname" | "screen_name" => Ok(NamingConvention::ScreenName),
            "date_screenname" => Ok(NamingConvention::DateScreenName),
            "screenname_date" => Ok(NamingConvention::ScreenNameDate),
            _ => Err(format!("Unknown naming convention: {}", s)),
        }
    }
}
