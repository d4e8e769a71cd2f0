use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AutofillError, Result};
use crate::fill::clock::Timings;
use crate::fill::speed::AnimationSpeed;
use crate::slow::http::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_CONFIG_PATH: &str = "field-autofill.yaml";
pub const RESOLVER_ENDPOINT_ENV: &str = "AUTOFILL_RESOLVER_ENDPOINT";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "field-autofill",
    version,
    about = "Classify form fields and fill them from a stored preference profile"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: field-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Slow-pass resolver endpoint; the slow pass is off unless one is set
    #[arg(long, global = true)]
    pub resolver_endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the field descriptors of a page snapshot as JSON
    Scan {
        /// Page snapshot JSON file
        #[arg(long)]
        page: PathBuf,
    },

    /// Print `referenceId  category  label` for every field
    Classify {
        #[arg(long)]
        page: PathBuf,
    },

    /// Fill a page snapshot from a user's stored preferences
    Fill {
        #[arg(long)]
        page: PathBuf,

        /// User whose profile is used
        #[arg(long)]
        user: String,

        /// Pause between writes: none, fast or slow
        #[arg(long)]
        speed: Option<AnimationSpeed>,

        /// Write the filled snapshot here
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Profile directory (default from config, then ./profiles)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Save the values currently in a page snapshot into a user's profile
    Save {
        #[arg(long)]
        page: PathBuf,

        #[arg(long)]
        user: String,

        #[arg(long)]
        store: Option<PathBuf>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `field-autofill.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default)]
    pub speed: AnimationSpeed,

    #[serde(default = "default_quiet_ms")]
    pub page_ready_quiet_ms: u64,

    #[serde(default = "default_max_ms")]
    pub page_ready_max_ms: u64,

    #[serde(default = "default_dropdown_ms")]
    pub dropdown_timeout_ms: u64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::None,
            page_ready_quiet_ms: default_quiet_ms(),
            page_ready_max_ms: default_max_ms(),
            dropdown_timeout_ms: default_dropdown_ms(),
        }
    }
}

impl FillConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            page_quiet_ms: self.page_ready_quiet_ms,
            page_cap_ms: self.page_ready_max_ms,
            dropdown_observe_ms: self.dropdown_timeout_ms,
            ..Timings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// JSONL trace file; no trace when unset.
    pub path: Option<PathBuf>,
}

// Serde default helpers
fn default_quiet_ms() -> u64 { 500 }
fn default_max_ms() -> u64 { 5000 }
fn default_dropdown_ms() -> u64 { 700 }
fn default_store_dir() -> PathBuf { PathBuf::from("profiles") }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

// ============================================================================
// Config File Loading
// ============================================================================

pub fn parse_config(content: &str) -> Result<AppConfig> {
    serde_yaml::from_str(content).map_err(|e| AutofillError::Config(e.to_string()))
}

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed; a malformed file is reported.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Setting resolution: CLI > config > env > default
// ============================================================================

/// Slow-pass endpoint, or `None` when no layer names one.
pub fn resolve_endpoint(cli: Option<&str>, config: &AppConfig, env: Option<&str>) -> Option<String> {
    cli.or(config.resolver.endpoint.as_deref())
        .or(env)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

pub fn resolve_store_dir(cli: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    cli.unwrap_or_else(|| config.store.dir.clone())
}

pub fn resolve_speed(cli: Option<AnimationSpeed>, config: &AppConfig) -> AnimationSpeed {
    cli.unwrap_or(config.fill.speed)
}
