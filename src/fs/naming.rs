//! Filename and path component sanitization.

use crate::error::{Error, Result};

/// Characters that are never valid in a file name on common filesystems.
const RESERVED: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Validate a media filename, replacing reserved characters.
///
/// Separators and `..` are rejected outright: a filename taken from a remote
/// URI must never move the file out of its directory.
pub fn sanitize_filename(name: &str) -> Result<String> {
    reject_unsafe(name)?;

    if name.contains(['/', '\\']) {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    replace_reserved(name, false)
}

/// Sanitize a single directory name such as a screen name.
///
/// Unlike [`sanitize_filename`], separators are replaced rather than rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    reject_unsafe(name)?;
    replace_reserved(name, true)
}

fn reject_unsafe(name: &str) -> Result<()> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name.replace('\0', "\\0")
        )));
    }

    Ok(())
}

fn replace_reserved(name: &str, replace_separators: bool) -> Result<String> {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' if replace_separators => '_',
            c if RESERVED.contains(&c) || c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Name cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_filenames() {
        assert_eq!(sanitize_filename("AAA.jpg").unwrap(), "AAA.jpg");
        assert_eq!(sanitize_filename("AAA.jpg:orig").unwrap(), "AAA.jpg_orig");
        assert_eq!(sanitize_filename("clip?.mp4").unwrap(), "clip_.mp4");
    }

    #[test]
    fn test_filename_rejects_escapes() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("dir/file.jpg").is_err());
        assert!(sanitize_filename("dir\\file.jpg").is_err());
        assert!(sanitize_filename("file\0.jpg").is_err());
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("  ").is_err());
        assert!(sanitize_path_component("").is_err());
    }

    #[test]
    fn test_screen_names() {
        assert_eq!(sanitize_path_component("alice_01").unwrap(), "alice_01");
        assert_eq!(sanitize_path_component("a/b\\c").unwrap(), "a_b_c");
        assert!(sanitize_path_component("../evil").is_err());
    }
}
