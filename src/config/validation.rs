use crate::config::types::{
    BackendConfig, Config, FetcherConfig, FrontierConfig, LoggingConfig, SeedsConfig,
};
use crate::{ConfigError, ConfigResult};

/// Log levels accepted in `[logging] level`
pub const LOG_LEVELS: &[&str] = &["error", "warning", "warn", "info", "debug", "trace"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_frontier_config(&config.frontier)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_backend_config(&config.backends)?;
    validate_seeds_config(&config.seeds)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates scheduler limits
fn validate_frontier_config(config: &FrontierConfig) -> ConfigResult<()> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_concurrency < 1 || config.max_concurrency > 1024 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 1024, got {}",
            config.max_concurrency
        )));
    }

    if config.max_pool_size < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pool_size must be >= 1, got {}",
            config.max_pool_size
        )));
    }

    if config.publish_queue_size < 1 {
        return Err(ConfigError::Validation(format!(
            "publish_queue_size must be >= 1, got {}",
            config.publish_queue_size
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Engine names are resolved against the registry when backends are opened; here we
/// only reject values that can never name an engine.
fn validate_backend_config(config: &BackendConfig) -> ConfigResult<()> {
    if config.storage_engine.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage_engine cannot be empty".to_string(),
        ));
    }

    if config.seen_cache_engine.trim().is_empty() {
        return Err(ConfigError::Validation(
            "seen_cache_engine cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_seeds_config(config: &SeedsConfig) -> ConfigResult<()> {
    if config.file.is_empty() {
        return Err(ConfigError::Validation(
            "seeds file path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> ConfigResult<()> {
    let level = config.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "log level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            config.level
        )));
    }
    Ok(())
}
