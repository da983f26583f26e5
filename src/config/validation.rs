use crate::config::types::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};
use crate::url::parse_seed;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(crawler: &CrawlerConfig) -> Result<(), ConfigError> {
    if crawler.max_concurrent_tasks == Some(0) {
        return Err(ConfigError::Validation(
            "max-concurrent-tasks must be greater than 0 (omit it for no limit)".to_string(),
        ));
    }

    if crawler.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request-timeout must be greater than 0".to_string(),
        ));
    }

    if crawler.connect_timeout == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(user_agent: &UserAgentConfig) -> Result<(), ConfigError> {
    if user_agent.crawler_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if user_agent.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &user_agent.contact_url {
        url::Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("contact-url '{}': {}", contact, e)))?;
    }

    Ok(())
}

fn validate_input_config(input: &InputConfig) -> Result<(), ConfigError> {
    let has_path = input
        .seeds_path
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());

    if !has_path && input.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "no seeds: set input.seeds-path or input.seeds".to_string(),
        ));
    }

    for seed in &input.seeds {
        parse_seed(seed.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", seed, e)))?;
    }

    Ok(())
}

fn validate_output_config(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.records_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    if output.log_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    if output.download_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
