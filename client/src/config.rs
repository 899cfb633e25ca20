use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the wallet/provider
    pub url: String,
    /// Deployed `EventContract` address
    pub contract_address: String,
    /// Optional bearer token for hosted endpoints
    pub access_token: Option<String>,
    /// Acting account; defaults to the provider's first account
    pub account: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub receipt_max_attempts: u32,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    120
}

pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let s = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file '{}'", path.as_ref().display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("failed to parse TOML config")
}

/// Default config lookup for the `ticketing` binary: the working directory
/// first, then the crate directory when started through cargo.
pub fn read_config_from_toml() -> Result<Config> {
    let mut candidates = vec![PathBuf::from("config").join("config.toml")];
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        candidates.push(PathBuf::from(manifest_dir).join("config").join("config.toml"));
    }
    match candidates.iter().find(|path| path.is_file()) {
        Some(path) => read_config(path),
        None => bail!(
            "no ledger config found (looked at {}); pass --config-file",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
