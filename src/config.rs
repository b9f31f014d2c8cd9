//! Configuration for lookout
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

/// Lookout - fleet monitoring backend for node hosts
#[derive(Parser, Debug, Clone)]
#[command(name = "lookout")]
#[command(about = "Discovers node hosts and aggregates per-instance snapshots")]
pub struct Args {
    /// Host URLs to register at startup (same as typing them into the console)
    #[arg(value_name = "HOST_URL")]
    pub hosts: Vec<String>,

    /// Access token for hosts on the local/custom profile
    #[arg(long, env = "ACCESS_TOKEN", default_value = "")]
    pub access_token: String,

    /// Per-request HTTP timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Liveness sampling interval in milliseconds
    #[arg(long, env = "SAMPLE_INTERVAL_MS", default_value = "1000")]
    pub sample_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.sample_interval_ms == 0 {
            return Err("SAMPLE_INTERVAL_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}
