//! Configuration for citeground.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CITEGROUND_SCHEME, CITEGROUND_ANCHOR_WINDOW,
//!    CITEGROUND_MAX_INPUT_BYTES)
//! 2. Config file (.citeground/config.yaml in the current directory or a
//!    parent, else <user config dir>/citeground/config.yaml)
//! 3. Defaults (per-transcript indexing, 80 byte anchor window)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::citations::{ValidateOptions, DEFAULT_ANCHOR_WINDOW};
use crate::domain::IndexingScheme;
use crate::safety::InputLimits;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".citeground";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub citations: Option<CitationsConfig>,
    #[serde(default)]
    pub limits: Option<InputLimits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CitationsConfig {
    /// Block addressing for multi-transcript runs
    pub scheme: Option<IndexingScheme>,
    /// Context bytes captured around grounded quotations
    pub anchor_window: Option<usize>,
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub scheme: Option<String>,
    pub anchor_window: Option<String>,
    pub max_input_bytes: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            scheme: std::env::var("CITEGROUND_SCHEME").ok(),
            anchor_window: std::env::var("CITEGROUND_ANCHOR_WINDOW").ok(),
            max_input_bytes: std::env::var("CITEGROUND_MAX_INPUT_BYTES").ok(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub scheme: IndexingScheme,
    pub anchor_window: usize,
    pub limits: InputLimits,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            scheme: IndexingScheme::default(),
            anchor_window: DEFAULT_ANCHOR_WINDOW,
            limits: InputLimits::default(),
        }
    }
}

impl ResolvedConfig {
    /// Options for `validate_citations`
    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            scheme: self.scheme,
            anchor_window: self.anchor_window,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Project config first, then the per-user one
fn find_config_file() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file_from(&cwd))
        .or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("citeground").join(CONFIG_FILE))
                .filter(|path| path.exists())
        })
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file values and environment overrides over the defaults
fn resolve(
    config_file: Option<PathBuf>,
    file: Option<ConfigFile>,
    env: &EnvOverrides,
) -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig {
        config_file,
        ..Default::default()
    };

    if let Some(file) = file {
        let citations = file.citations.unwrap_or_default();
        if let Some(scheme) = citations.scheme {
            config.scheme = scheme;
        }
        if let Some(window) = citations.anchor_window {
            config.anchor_window = window;
        }
        if let Some(limits) = file.limits {
            config.limits = limits;
        }
    }

    if let Some(ref scheme) = env.scheme {
        config.scheme = scheme
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid CITEGROUND_SCHEME")?;
    }
    if let Some(ref window) = env.anchor_window {
        config.anchor_window = window
            .trim()
            .parse()
            .with_context(|| format!("Invalid CITEGROUND_ANCHOR_WINDOW: {}", window))?;
    }
    if let Some(ref max) = env.max_input_bytes {
        config.limits.max_input_bytes = max
            .trim()
            .parse()
            .with_context(|| format!("Invalid CITEGROUND_MAX_INPUT_BYTES: {}", max))?;
    }

    Ok(config)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();
    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    resolve(config_file, file, &EnvOverrides::from_env())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
