//! Configuration schema types
//!
//! Defines the structure of the `blackout.toml` configuration file. Every
//! section carries serde defaults so a minimal file (or none at all, for
//! deterministic-only runs) is enough to start.

use crate::config::SecretString;
use crate::core::MatchingConfig;
use serde::{Deserialize, Serialize};

/// Main Blackout configuration
///
/// This is the root structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlackoutConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Semantic classifier connection; absent means deterministic-only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierConfig>,

    /// Deterministic detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Alignment and phrase-matching tuning
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BlackoutConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        if let Some(ref classifier) = self.classifier {
            classifier.validate()?;
        }
        self.detection.validate()?;
        self.matching.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Report detections without producing redaction output
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Semantic classifier connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Classifier endpoint URL
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// API key sent as a bearer token; zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Bounded wait for one classifier call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry behavior for rate-limited calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("classifier.endpoint must not be empty".to_string());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "classifier.endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("classifier.timeout_seconds must be greater than 0".to_string());
        }
        self.retry.validate()
    }
}

/// Retry configuration for classifier calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts for the primary phrase call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Total attempts for the legacy entity fallback call
    #[serde(default = "default_fallback_attempts")]
    pub fallback_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff multiplier applied to each subsequent delay
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            fallback_attempts: default_fallback_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.fallback_attempts == 0 {
            return Err("classifier.retry attempts must be at least 1".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "classifier.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        Ok(())
    }
}

/// Deterministic detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Path to a TOML pattern library; built-in patterns when absent
    #[serde(default)]
    pub pattern_library: Option<String>,

    /// Entities below this confidence are dropped after merging
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Fraction of the smaller entity's area two detections must share
    /// before the lower-confidence one is discarded as a duplicate
    #[serde(default = "default_overlap_ratio")]
    pub overlap_ratio: f32,

    /// Category labels that must stay visible in the output
    #[serde(default)]
    pub required_categories: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            pattern_library: None,
            confidence_threshold: default_confidence_threshold(),
            overlap_ratio: default_overlap_ratio(),
            required_categories: Vec::new(),
        }
    }
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "detection.confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.overlap_ratio) || self.overlap_ratio == 0.0 {
            return Err(format!(
                "detection.overlap_ratio must be within (0, 1], got {}",
                self.overlap_ratio
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON log files in addition to console output
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for daily-rotated log files
    #[serde(default = "default_log_path")]
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            file_path: default_log_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_classifier_endpoint() -> String {
    "http://localhost:8080/v1/classify".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_fallback_attempts() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

fn default_confidence_threshold() -> f32 {
    0.5
}

fn default_overlap_ratio() -> f32 {
    0.5
}

fn default_log_path() -> String {
    "logs".to_string()
}
