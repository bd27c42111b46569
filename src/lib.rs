#![warn(missing_docs)]
//! Plugin bootstrap: configuration, logging and lifecycle wiring.
//!
//! The host calls [`EquipSavePlugin::on_enable`] once, forwards join and
//! quit events while enabled, and calls [`EquipSavePlugin::on_disable`] with
//! the players still online when it shuts down.

/// Plugin configuration file.
pub mod config;

use anyhow::{Context, Result};
use equipsave_core::{PlayerHandle, Registries};
use equipsave_persist::InventoryStore;
use equipsave_server::{EquipmentService, JoinOutcome, QuitOutcome, ShutdownReport};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

pub use config::PluginConfig;

/// Install the global fmt subscriber. `RUST_LOG` wins over `fallback_filter`.
///
/// Returns false when another subscriber was already installed; that one is
/// kept.
pub fn init_logging(fallback_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Equipment persistence plugin.
pub struct EquipSavePlugin {
    config: PluginConfig,
    registries: Option<Arc<Registries>>,
    service: Option<EquipmentService>,
}

impl EquipSavePlugin {
    /// Plugin using the built-in vanilla registries.
    pub fn new(config: PluginConfig) -> Self {
        Self {
            config,
            registries: None,
            service: None,
        }
    }

    /// Plugin decoding items against host-provided registries.
    pub fn with_registries(config: PluginConfig, registries: Arc<Registries>) -> Self {
        Self {
            config,
            registries: Some(registries),
            service: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// True between enable and disable.
    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    /// Prepare the record directory and start handling events.
    pub fn on_enable(&mut self) -> Result<()> {
        let store = InventoryStore::with_dir_name(&self.config.data_root, &self.config.inventory_dir);
        store.ensure_dir().with_context(|| {
            format!("Failed to create record directory {}", store.dir().display())
        })?;

        if self.config.validate_on_enable {
            let report = store.validate_all();
            if report.is_clean() {
                info!(
                    files = report.files,
                    skipped = report.skipped,
                    "Stored equipment records are valid"
                );
            } else {
                warn!(
                    files = report.files,
                    parsed = report.parsed,
                    errors = report.errors.len(),
                    "Some stored equipment records are malformed and will not be restored"
                );
            }
        }

        let registries = self.registries.get_or_insert_with(Registries::vanilla).clone();
        info!(
            dir = %store.dir().display(),
            items = registries.items.len(),
            enchantments = registries.enchantments.len(),
            "Equipment persistence enabled"
        );
        self.service = Some(EquipmentService::new(store, registries));
        Ok(())
    }

    /// Save everyone still online and stop handling events.
    ///
    /// Returns `None` when the plugin was never enabled.
    pub fn on_disable<'a, I>(&mut self, players: I) -> Option<ShutdownReport>
    where
        I: IntoIterator<Item = &'a dyn PlayerHandle>,
    {
        let service = self.service.take()?;
        let report = service.on_shutdown(players);
        info!("Equipment persistence disabled");
        Some(report)
    }

    /// Forward a join. `None` before enable.
    pub fn on_player_join(&self, player: &mut dyn PlayerHandle) -> Option<JoinOutcome> {
        let Some(service) = &self.service else {
            debug!(player = player.name(), "Join ignored, plugin not enabled");
            return None;
        };
        Some(service.on_player_join(player))
    }

    /// Forward a quit. `None` before enable.
    pub fn on_player_quit(&self, player: &dyn PlayerHandle) -> Option<QuitOutcome> {
        let Some(service) = &self.service else {
            debug!(player = player.name(), "Quit ignored, plugin not enabled");
            return None;
        };
        Some(service.on_player_quit(player))
    }
}
