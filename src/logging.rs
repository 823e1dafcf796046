//! Tracing subscriber setup for the `dh` binary.
//!
//! Logs go to stderr so rendered search output on stdout stays clean.
//! `RUST_LOG`, when set, replaces the verbosity-derived filter entirely.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the repeat count of `-v` to a level: none → warn, 1 → info, 2+ → debug.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

pub fn init(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose).as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}
