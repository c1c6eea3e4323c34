use crate::config::types::{Config, ExtractConfig, HttpConfig, TapConfig};
use crate::extract::Selection;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound for the redirect policy
const MAX_REDIRECT_LIMIT: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_tap_config(&config.tap)?;
    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates source and storage settings
fn validate_tap_config(config: &TapConfig) -> Result<(), ConfigError> {
    if config.source_name.is_empty() {
        return Err(ConfigError::Validation(
            "source_name cannot be empty".to_string(),
        ));
    }

    if !config
        .source_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "source_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.source_name
        )));
    }

    let url = Url::parse(&config.site_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site_url '{}': {}", config.site_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "site_url '{}' must use http or https",
            config.site_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "site_url '{}' has no host",
            config.site_url
        )));
    }

    if config.output_folder.is_empty() {
        return Err(ConfigError::Validation(
            "output_folder cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    Ok(())
}

/// Validates extraction settings
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    for tag in &config.exclude_tags {
        validate_tag_name(tag)?;
    }

    if config.file_extension.is_empty() || config.file_extension.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "file_extension must be non-empty and written without a leading dot, got '{}'",
            config.file_extension
        )));
    }

    match &config.selection {
        Selection::Any | Selection::Text => {}
        Selection::Tag { name } => validate_tag_name(name)?,
        Selection::Attributes { attrs } => {
            if attrs.is_empty() {
                return Err(ConfigError::Validation(
                    "attributes selection needs at least one attribute".to_string(),
                ));
            }
            if attrs.keys().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::Validation(
                    "attribute names cannot be empty".to_string(),
                ));
            }
        }
        Selection::Css { selector } => {
            Selector::parse(selector).map_err(|e| {
                ConfigError::Validation(format!("Invalid CSS selector '{}': {}", selector, e))
            })?;
        }
    }

    Ok(())
}

/// Validates an HTML tag name
fn validate_tag_name(tag: &str) -> Result<(), ConfigError> {
    if tag.is_empty() {
        return Err(ConfigError::Validation(
            "tag names cannot be empty".to_string(),
        ));
    }

    if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "Tag '{}' contains invalid characters",
            tag
        )));
    }

    Ok(())
}
