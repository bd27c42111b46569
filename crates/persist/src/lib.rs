#![warn(missing_docs)]
//! Durable equipment records.
//!
//! Items are encoded one stack at a time as base64 NBT ([`ItemCodec`]),
//! collected per slot into an [`InventoryRecord`], and written as one YAML
//! document per player by the [`InventoryStore`].

mod codec;
mod error;
mod record;
mod store;

pub use codec::{ItemCodec, MAX_ITEM_BYTES, MAX_TREE_DEPTH};
pub use error::{CodecError, RecordError, Section, StoreError};
pub use record::{InventoryRecord, RestoreSummary, RECORD_VERSION};
pub use store::{
    sanitize_name, InventoryStore, ValidationReport, DEFAULT_INVENTORY_DIR, RECORD_EXTENSION,
};
