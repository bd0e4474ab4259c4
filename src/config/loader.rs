//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BlackoutConfig;
use crate::domain::{BlackoutError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BlackoutConfig
/// 4. Applies environment variable overrides (BLACKOUT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<BlackoutConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BlackoutError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BlackoutError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BlackoutConfig = toml::from_str(&contents)
        .map_err(|e| BlackoutError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BlackoutError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BlackoutError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BlackoutError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the BLACKOUT_* prefix
///
/// Variables follow the pattern BLACKOUT_<SECTION>_<KEY>, for example
/// BLACKOUT_CLASSIFIER_ENDPOINT or BLACKOUT_APPLICATION_LOG_LEVEL.
fn apply_env_overrides(config: &mut BlackoutConfig) {
    if let Ok(val) = std::env::var("BLACKOUT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("BLACKOUT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Some(ref mut classifier) = config.classifier {
        if let Ok(val) = std::env::var("BLACKOUT_CLASSIFIER_ENDPOINT") {
            classifier.endpoint = val;
        }
        if let Ok(val) = std::env::var("BLACKOUT_CLASSIFIER_API_KEY") {
            classifier.api_key = Some(super::secret_string(val));
        }
        if let Ok(val) = std::env::var("BLACKOUT_CLASSIFIER_TIMEOUT_SECONDS") {
            if let Ok(seconds) = val.parse() {
                classifier.timeout_seconds = seconds;
            }
        }
        if let Ok(val) = std::env::var("BLACKOUT_CLASSIFIER_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                classifier.retry.max_attempts = attempts;
            }
        }
        if let Ok(val) = std::env::var("BLACKOUT_CLASSIFIER_FALLBACK_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                classifier.retry.fallback_attempts = attempts;
            }
        }
    }

    if let Ok(val) = std::env::var("BLACKOUT_DETECTION_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(val);
    }
    if let Ok(val) = std::env::var("BLACKOUT_DETECTION_CONFIDENCE_THRESHOLD") {
        if let Ok(threshold) = val.parse() {
            config.detection.confidence_threshold = threshold;
        }
    }
    if let Ok(val) = std::env::var("BLACKOUT_DETECTION_OVERLAP_RATIO") {
        if let Ok(ratio) = val.parse() {
            config.detection.overlap_ratio = ratio;
        }
    }

    if let Ok(val) = std::env::var("BLACKOUT_LOGGING_FILE_ENABLED") {
        config.logging.file_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BLACKOUT_LOGGING_FILE_PATH") {
        config.logging.file_path = val;
    }
}
