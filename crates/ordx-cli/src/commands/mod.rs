//! Subcommands of the `ordx` binary.

pub mod batch;
pub mod config;
pub mod links;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use ordx_core::OrdxConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ordx")
        .join("config.json")
}

/// Load configuration from `--config`, else the default file when present,
/// else defaults. Environment overrides apply last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OrdxConfig> {
    let config = match config_path {
        Some(path) => OrdxConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                OrdxConfig::from_file(&path)?
            } else {
                OrdxConfig::default()
            }
        }
    };

    Ok(config.with_env_overrides())
}
