//! Runtime settings.
//!
//! Resolution order: built-in defaults, then `~/.riverbear/config.toml`,
//! then `RIVERBEAR_*` environment variables. CLI flags are applied last by
//! the binary. Catch odds and fish timing are fixed and not configurable.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::constants::DEFAULT_WEB_PORT;
use super::error::{GameError, Result};
use crate::fishing::types::Difficulty;
use crate::utils::persistence;

pub const DEFAULT_LOG_FILTER: &str = "riverbear=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Difficulty selected when the game opens
    pub difficulty: Difficulty,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Port for `serve` (web feature)
    pub web_port: u16,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            web_port: DEFAULT_WEB_PORT,
            seed: None,
        }
    }
}

/// On-disk shape of config.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    difficulty: Option<Difficulty>,
    log_filter: Option<String>,
    web_port: Option<u16>,
    seed: Option<u64>,
}

/// Loads settings from ~/.riverbear/config.toml and the process environment.
pub fn load_settings() -> Result<Settings> {
    let path = persistence::config_file()?;
    load_settings_from(&path, |key| std::env::var(key).ok())
}

/// Loads settings from an explicit file path and environment lookup.
///
/// A missing file is not an error; a malformed one is.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .map_err(|e| GameError::Config(format!("{}: {}", path.display(), e)))?;
        if let Some(d) = file_cfg.difficulty {
            settings.difficulty = d;
        }
        if let Some(f) = file_cfg.log_filter {
            settings.log_filter = f;
        }
        if let Some(p) = file_cfg.web_port {
            settings.web_port = p;
        }
        if file_cfg.seed.is_some() {
            settings.seed = file_cfg.seed;
        }
    }

    if let Some(v) = env("RIVERBEAR_DIFFICULTY") {
        settings.difficulty = v.parse()?;
    }
    if let Some(v) = env("RIVERBEAR_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = env("RIVERBEAR_PORT") {
        settings.web_port = v
            .parse()
            .map_err(|_| GameError::Config(format!("RIVERBEAR_PORT is not a port: {}", v)))?;
    }
    if let Some(v) = env("RIVERBEAR_SEED") {
        let seed = v
            .parse()
            .map_err(|_| GameError::Config(format!("RIVERBEAR_SEED is not a u64: {}", v)))?;
        settings.seed = Some(seed);
    }

    Ok(settings)
}
