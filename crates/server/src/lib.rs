#![warn(missing_docs)]
//! Connection lifecycle hooks: restore on join, save on quit and shutdown.

pub mod lifecycle;

pub use lifecycle::{EquipmentService, JoinOutcome, LifecycleError, QuitOutcome, ShutdownReport};
