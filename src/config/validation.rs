use crate::config::types::{Config, OutputConfig, RequestConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_request_config(&config.request)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl entry point
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use http or https",
            config.start_url
        )));
    }

    Ok(())
}

/// Validates request settings
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in &config.cookies {
        validate_cookie(name, value)?;
    }

    Ok(())
}

/// Validates one cookie pair so the joined `Cookie` header stays well formed
fn validate_cookie(name: &str, value: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "cookie names cannot be empty".to_string(),
        ));
    }

    if name
        .chars()
        .any(|c| c == ';' || c == '=' || c.is_whitespace())
    {
        return Err(ConfigError::Validation(format!(
            "cookie name '{}' contains invalid characters",
            name
        )));
    }

    if value.contains(';') {
        return Err(ConfigError::Validation(format!(
            "cookie value for '{}' cannot contain ';'",
            name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.collection_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "collection-path cannot be empty".to_string(),
        ));
    }

    if config.image_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "image-dir cannot be empty".to_string(),
        ));
    }

    if config.site_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "site-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
