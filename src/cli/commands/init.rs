//! Init command implementation
//!
//! Implements the `init` command for generating a sample configuration
//! file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "blackout.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Blackout configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set BLACKOUT_CLASSIFIER_API_KEY in the environment or a .env file");
                println!("  3. Validate configuration: blackout validate-config");
                println!("  4. Run a detection: blackout redact --input ocr.json --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration with comments
    fn sample_config() -> &'static str {
        r#"# Blackout Configuration File
# PII redaction-region engine for scanned documents

[application]
log_level = "info"          # trace | debug | info | warn | error
dry_run = false             # true: report detections without writing output

# Semantic classifier service. Remove this section to run
# deterministic-only detection.
[classifier]
endpoint = "http://localhost:8080/v1/classify"
api_key = "${BLACKOUT_CLASSIFIER_API_KEY}"
timeout_seconds = 30

[classifier.retry]
max_attempts = 3            # primary phrase call, including the first try
fallback_attempts = 2       # legacy entity call
initial_delay_ms = 500
backoff_multiplier = 1.5

[detection]
# pattern_library = "patterns/pii_patterns.toml"   # built-in when omitted
confidence_threshold = 0.5
overlap_ratio = 0.5         # fraction of the smaller area treated as duplicate
required_categories = []    # labels kept visible, e.g. ["name"]

[matching]
padding_px = 2.0            # padding around redaction zones
row_tolerance_px = 5.0      # vertical bucket for row grouping
merge_gap_px = 2.0          # max gap between folded zones
partial_match_ratio = 0.5   # min fraction for partial span alignment
phrase_match_ratio = 0.6    # min fraction for partial phrase matches

[logging]
file_enabled = false
file_path = "logs"
"#
    }
}
