//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Blackout using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Blackout - PII redaction-region engine for scanned documents
#[derive(Parser, Debug)]
#[command(name = "blackout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "blackout.toml", env = "BLACKOUT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BLACKOUT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect PII in an OCR document and emit redaction regions
    Redact(commands::redact::RedactArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
