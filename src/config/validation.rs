//! Configuration validation logic.

use crate::api::MAX_PAGE_SIZE;
use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_token(&config.account.access_token)?;
    validate_user_agent(&config.account.user_agent)?;
    validate_paging(config.options.page_size, config.options.max_pages)?;
    validate_rate_limit(
        config.options.rate_limit_cooldown_secs,
        config.options.max_rate_limit_wait_secs,
    )?;
    validate_concurrency("post_concurrency", config.options.post_concurrency)?;
    validate_concurrency("media_concurrency", config.options.media_concurrency)?;

    Ok(())
}

/// Validate the bearer token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(Error::MissingConfig("access_token".to_string()));
    }

    if token.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token must not contain whitespace".to_string(),
        });
    }

    // Check for placeholder values
    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Please provide your actual token."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    Ok(())
}

/// Validate page size and page cap.
pub fn validate_paging(page_size: u32, max_pages: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(Error::ConfigValidation {
            field: "page_size".to_string(),
            message: format!(
                "Page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, page_size
            ),
        });
    }

    if max_pages == 0 {
        return Err(Error::ConfigValidation {
            field: "max_pages".to_string(),
            message: "At least one page must be allowed".to_string(),
        });
    }

    Ok(())
}

/// Validate rate-limit backoff.
///
/// The cap counts whole cooldowns, so a zero cooldown would never reach it,
/// and a cap below one cooldown would never retry.
pub fn validate_rate_limit(cooldown_secs: u64, max_wait_secs: u64) -> Result<()> {
    if cooldown_secs == 0 {
        return Err(Error::ConfigValidation {
            field: "rate_limit_cooldown_secs".to_string(),
            message: "Cooldown must be at least 1 second".to_string(),
        });
    }

    if max_wait_secs < cooldown_secs {
        return Err(Error::ConfigValidation {
            field: "max_rate_limit_wait_secs".to_string(),
            message: format!(
                "Maximum rate-limit wait ({}s) must allow at least one cooldown ({}s)",
                max_wait_secs, cooldown_secs
            ),
        });
    }

    Ok(())
}

/// Validate a worker pool size.
pub fn validate_concurrency(field: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Concurrency must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.account.access_token = "AAAAAAAAAAAAAAAAAAAAAMLheAAAAAAA0%2BuSeid".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let mut config = valid_config();
        config.account.access_token = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_placeholder_token() {
        assert!(validate_token("REPLACEME").is_err());
        assert!(validate_token("abc def").is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_paging(1, 1).is_ok());
        assert!(validate_paging(200, 50).is_ok());
        assert!(validate_paging(0, 50).is_err());
        assert!(validate_paging(201, 50).is_err());
        assert!(validate_paging(200, 0).is_err());
    }

    #[test]
    fn test_zero_cooldown_rejected() {
        let mut config = valid_config();
        config.options.rate_limit_cooldown_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { ref field, .. }) if field == "rate_limit_cooldown_secs"
        ));
    }

    #[test]
    fn test_wait_cap_must_cover_one_cooldown() {
        let mut config = valid_config();
        config.options.rate_limit_cooldown_secs = 600;
        config.options.max_rate_limit_wait_secs = 599;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { ref field, .. }) if field == "max_rate_limit_wait_secs"
        ));

        assert!(validate_rate_limit(600, 600).is_ok());
        assert!(validate_rate_limit(1, 3600).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = valid_config();
        config.options.media_concurrency = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { ref field, .. }) if field == "media_concurrency"
        ));
    }
}
