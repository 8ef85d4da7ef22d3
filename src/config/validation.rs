use crate::config::types::{Config, FetchConfig, OutputConfig, SourceDescriptor};
use crate::sources::expected_parser;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates HTTP settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 120, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the source table
fn validate_sources(sources: &[SourceDescriptor]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for source in sources {
        if source.name.is_empty() {
            return Err(ConfigError::Validation(
                "source name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "source '{}' is listed more than once",
                source.name
            )));
        }

        validate_source(source)?;
    }

    Ok(())
}

fn validate_source(source: &SourceDescriptor) -> Result<(), ConfigError> {
    let url = Url::parse(&source.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid URL for source '{}': {}", source.name, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL for source '{}' must use http or https",
            source.name
        )));
    }

    if source.site.is_empty() || source.site.contains('/') {
        return Err(ConfigError::Validation(format!(
            "site for source '{}' must be a bare host, got '{}'",
            source.name, source.site
        )));
    }

    match expected_parser(&source.name) {
        None => {
            return Err(ConfigError::Validation(format!(
                "no adapter is registered for source '{}'",
                source.name
            )));
        }
        Some(parser) if parser != source.parser => {
            return Err(ConfigError::Validation(format!(
                "source '{}' is parsed as {}, not {}",
                source.name, parser, source.parser
            )));
        }
        Some(_) => {}
    }

    validate_color(&source.color)
}

/// Checks for `#` followed by six hex digits
fn validate_color(color: &str) -> Result<(), ConfigError> {
    let valid = color
        .strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);

    if !valid {
        return Err(ConfigError::Validation(format!(
            "Invalid color '{}', expected #rrggbb",
            color
        )));
    }

    Ok(())
}
