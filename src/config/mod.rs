//! Configuration management for Blackout.
//!
//! TOML-based configuration loading, parsing, and validation, with
//! environment variable substitution (`${VAR_NAME}`) inside the file and
//! `BLACKOUT_*` overrides applied on top.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [classifier]
//! endpoint = "https://classifier.internal/v1/classify"
//! api_key = "${BLACKOUT_CLASSIFIER_API_KEY}"
//! timeout_seconds = 30
//!
//! [classifier.retry]
//! max_attempts = 3
//! fallback_attempts = 2
//!
//! [detection]
//! confidence_threshold = 0.5
//! required_categories = ["name"]
//!
//! [matching]
//! padding_px = 2.0
//! ```
//!
//! Every section is optional; an empty file yields a valid
//! deterministic-only configuration.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BlackoutConfig, ClassifierConfig, DetectionConfig, LoggingConfig,
    RetryConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
