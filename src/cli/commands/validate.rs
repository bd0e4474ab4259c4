//! Validate config command implementation
//!
//! Implements the `validate-config` command for checking the Blackout
//! configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);

        match config.classifier {
            Some(ref classifier) => {
                println!("  Classifier Endpoint: {}", classifier.endpoint);
                println!(
                    "  Classifier API Key: {}",
                    if classifier.api_key.is_some() {
                        "set"
                    } else {
                        "not set"
                    }
                );
                println!("  Classifier Timeout: {}s", classifier.timeout_seconds);
                println!(
                    "  Retry Attempts: {} primary / {} fallback",
                    classifier.retry.max_attempts, classifier.retry.fallback_attempts
                );
            }
            None => println!("  Classifier: not configured (deterministic-only)"),
        }

        println!(
            "  Pattern Library: {}",
            config
                .detection
                .pattern_library
                .as_deref()
                .unwrap_or("built-in")
        );
        println!(
            "  Confidence Threshold: {}",
            config.detection.confidence_threshold
        );
        println!(
            "  Required Categories: {:?}",
            config.detection.required_categories
        );
        println!();
        Ok(0)
    }
}
