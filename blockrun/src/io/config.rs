//! Session configuration loaded from `blockrun.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;

/// Conventional config filename, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "blockrun.toml";

/// Session configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory to discover block manifests under.
    pub root_dir: PathBuf,

    /// Ordered glob patterns resolved against `root_dir`; a leading `!`
    /// marks an exclusion. Defaults exclude hidden units and `_`-prefixed
    /// internal-use units.
    pub source: Vec<String>,

    /// Database bootstrap strategy: a built-in provider name, unless an
    /// embedding caller supplies a factory instead.
    pub provider: String,

    /// Optional seed data for the built-in memory provider.
    pub seed: Option<PathBuf>,

    /// Rows per page when rendering query results.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./blocks"),
            source: vec![
                "**/*.toml".to_string(),
                "!**/_*".to_string(),
                "!**/.*".to_string(),
            ],
            provider: "memory".to_string(),
            seed: None,
            page_size: 5,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(anyhow!("root_dir must be non-empty"));
        }
        if self.source.is_empty() {
            return Err(anyhow!("source must list at least one pattern"));
        }
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be > 0"));
        }
        Ok(())
    }
}

/// Resolve and load the session config.
///
/// An explicit path that does not exist is fatal ([`EngineError::ConfigPathInvalid`]);
/// a missing default path is a warning and built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(EngineError::ConfigPathInvalid(path.to_path_buf()).into());
            }
            read_config(path)
        }
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_config(path)
            } else {
                warn!(
                    path = DEFAULT_CONFIG_FILE,
                    "config file not found, using default config"
                );
                let cfg = Config::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
