//! Equipment service driven by player connection events.
//!
//! Events arrive one at a time from the host. Every failure is contained to
//! the player it concerns: it is logged and reported in the returned outcome,
//! never propagated to the host.

use equipsave_core::{PlayerHandle, Registries};
use equipsave_persist::{
    InventoryRecord, InventoryStore, ItemCodec, RecordError, RestoreSummary, StoreError,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Why a lifecycle step failed for one player.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Reading or writing the record file failed, or the file is malformed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The record could not be built from, or applied to, the player.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl LifecycleError {
    /// True when the stored record exists but cannot be parsed or applied.
    pub fn is_malformed(&self) -> bool {
        match self {
            LifecycleError::Store(err) => err.is_malformed(),
            LifecycleError::Record(_) => true,
        }
    }
}

/// Result of handling a join.
#[derive(Debug)]
pub enum JoinOutcome {
    /// A record was found and applied.
    Restored(RestoreSummary),
    /// No record exists; the player was left untouched.
    NoRecord,
    /// The record could not be read or applied; the player was left untouched.
    Failed(LifecycleError),
}

/// Result of handling a quit.
#[derive(Debug)]
pub enum QuitOutcome {
    /// The record was written to this path.
    Saved(PathBuf),
    /// Nothing was written.
    Failed(LifecycleError),
}

/// Result of the shutdown sweep.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Players whose record was written.
    pub saved: usize,
    /// Players whose save failed, with the reason.
    pub failed: Vec<(String, LifecycleError)>,
}

impl ShutdownReport {
    /// True when every player was saved.
    pub fn all_saved(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Restores and persists player equipment.
pub struct EquipmentService {
    store: InventoryStore,
    codec: ItemCodec,
}

impl EquipmentService {
    /// Build a service over `store`, decoding items against `registries`.
    pub fn new(store: InventoryStore, registries: Arc<Registries>) -> Self {
        Self {
            store,
            codec: ItemCodec::new(registries),
        }
    }

    /// Backing store.
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Load the player's record and apply it. Without a record the player
    /// keeps whatever the host gave them.
    #[instrument(skip_all, fields(player = player.name()))]
    pub fn on_player_join(&self, player: &mut dyn PlayerHandle) -> JoinOutcome {
        match self.restore(player) {
            Ok(Some(summary)) => {
                info!(
                    items = summary.items,
                    armor = summary.armor,
                    "Restored equipment"
                );
                JoinOutcome::Restored(summary)
            }
            Ok(None) => {
                debug!("No saved equipment");
                JoinOutcome::NoRecord
            }
            Err(err) => {
                error!("Failed to restore equipment: {err}");
                JoinOutcome::Failed(err)
            }
        }
    }

    /// Capture the player's equipment and write it.
    #[instrument(skip_all, fields(player = player.name()))]
    pub fn on_player_quit(&self, player: &dyn PlayerHandle) -> QuitOutcome {
        match self.save(player) {
            Ok(path) => {
                info!("Saved equipment to {}", path.display());
                QuitOutcome::Saved(path)
            }
            Err(err) => {
                error!("Failed to save equipment: {err}");
                QuitOutcome::Failed(err)
            }
        }
    }

    /// Save every connected player. One failure does not stop the sweep.
    #[instrument(skip_all)]
    pub fn on_shutdown<'a, I>(&self, players: I) -> ShutdownReport
    where
        I: IntoIterator<Item = &'a dyn PlayerHandle>,
    {
        let mut report = ShutdownReport::default();
        for player in players {
            match self.save(player) {
                Ok(_) => report.saved += 1,
                Err(err) => {
                    warn!(player = player.name(), "Failed to save equipment: {err}");
                    report.failed.push((player.name().to_string(), err));
                }
            }
        }
        info!(
            saved = report.saved,
            failed = report.failed.len(),
            "Shutdown save complete"
        );
        report
    }

    fn restore(
        &self,
        player: &mut dyn PlayerHandle,
    ) -> Result<Option<RestoreSummary>, LifecycleError> {
        let Some(record) = self.store.load(player.name())? else {
            return Ok(None);
        };
        let summary = record.restore(player, &self.codec)?;
        Ok(Some(summary))
    }

    fn save(&self, player: &dyn PlayerHandle) -> Result<PathBuf, LifecycleError> {
        let record = InventoryRecord::capture(player, &self.codec)?;
        Ok(self.store.save(&record)?)
    }
}
