use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Config file consulted by [`PluginConfig::load`].
pub const DEFAULT_CONFIG_PATH: &str = "plugin_data/equipsave/config.toml";

/// Plugin settings, read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Plugin data directory.
    pub data_root: PathBuf,
    /// Record directory name below `data_root`.
    pub inventory_dir: String,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Parse every stored record on enable and log the result.
    pub validate_on_enable: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("plugin_data/equipsave"),
            inventory_dir: equipsave_persist::DEFAULT_INVENTORY_DIR.to_string(),
            log_filter: "info".to_string(),
            validate_on_enable: true,
        }
    }
}

impl PluginConfig {
    /// Load from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PluginConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PluginConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Plugin config not found at {}. Using defaults", path.display());
                PluginConfig::default()
            }
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                PluginConfig::default()
            }
        }
    }

    /// Write as pretty TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Directory holding the per-player records.
    pub fn inventory_path(&self) -> PathBuf {
        self.data_root.join(&self.inventory_dir)
    }
}
