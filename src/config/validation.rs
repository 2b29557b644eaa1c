use crate::config::types::{
    Config, CrawlerConfig, FilterConfig, OutputConfig, TargetEntry, UserAgentConfig,
};
use crate::url::normalize_root;
use crate::ConfigError;
use url::Url;

/// Lowest delay accepted between two requests to the remote server (milliseconds)
const MIN_REQUEST_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_filter_config(&config.filter)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_delay < MIN_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request_delay must be >= {}ms, got {}ms",
            MIN_REQUEST_DELAY_MS, config.request_delay
        )));
    }

    if config.rate_limit_cooldown < config.request_delay {
        return Err(ConfigError::Validation(format!(
            "rate_limit_cooldown ({}ms) must not be shorter than request_delay ({}ms)",
            config.rate_limit_cooldown, config.request_delay
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.flush_every == 0 {
        return Err(ConfigError::Validation(
            "flush_every must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, path) in [
        ("movies_path", &config.movies_path),
        ("series_path", &config.series_path),
        ("episodes_path", &config.episodes_path),
    ] {
        if path.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.series_path == config.episodes_path
        || config.movies_path == config.series_path
        || config.movies_path == config.episodes_path
    {
        return Err(ConfigError::Validation(
            "catalog paths must be distinct".to_string(),
        ));
    }

    Ok(())
}

/// Validates the optional listing size bounds
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for bound in [config.min_size_gb, config.max_size_gb].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            return Err(ConfigError::Validation(format!(
                "size bounds must be non-negative, got {}",
                bound
            )));
        }
    }

    if let (Some(min), Some(max)) = (config.min_size_gb, config.max_size_gb) {
        if min >= max {
            return Err(ConfigError::Validation(format!(
                "min_size_gb ({}) must be below max_size_gb ({})",
                min, max
            )));
        }
    }

    Ok(())
}

/// Validates crawl targets
fn validate_targets(targets: &[TargetEntry]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] is required".to_string(),
        ));
    }

    for target in targets {
        normalize_root(&target.root).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid target root '{}': {}", target.root, e))
        })?;

        if matches!(&target.label, Some(label) if label.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "label for target '{}' cannot be blank",
                target.root
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
