//! Error taxonomy for item encoding, record handling and storage.

use equipsave_core::RegistryKey;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to encode or decode a single item stack.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not standard padded base64.
    #[error("item blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes are not a tag tree of the expected shape.
    #[error("item blob is not a valid tag tree: {0}")]
    Nbt(#[from] nbt::Error),

    /// The blob is bigger than any single item can be.
    #[error("item blob is {len} bytes, limit is {max}")]
    TooLarge {
        /// Size of the offending blob.
        len: usize,
        /// Accepted maximum.
        max: usize,
    },

    /// Compounds or lists nest deeper than any item needs.
    #[error("item tag tree nests deeper than {max} levels")]
    TooDeep {
        /// Accepted maximum depth.
        max: usize,
    },

    /// The tag stream is truncated or structurally invalid.
    #[error("item tag tree is malformed: {reason}")]
    BadTree {
        /// What the scan tripped over.
        reason: &'static str,
    },

    /// The stored id does not parse as a registry key.
    #[error("item id `{id}` is not a valid registry key")]
    InvalidItemId {
        /// Id as stored.
        id: String,
    },

    /// The item type is not in the registry.
    #[error("unknown item `{0}`")]
    UnknownItem(RegistryKey),

    /// An enchantment id is not in the registry.
    #[error("unknown enchantment `{id}` on `{item}`")]
    UnknownEnchantment {
        /// Item carrying the enchantment.
        item: RegistryKey,
        /// Enchantment id as stored.
        id: String,
    },

    /// Count is zero, negative, or above the item's stack limit.
    #[error("stack of `{item}` has count {count}, expected 1..={max}")]
    InvalidCount {
        /// Item type of the stack.
        item: RegistryKey,
        /// Offending count.
        count: i16,
        /// Stack limit for the item.
        max: u8,
    },

    /// Enchantment level outside `1..=255`.
    #[error("enchantment `{id}` on `{item}` has level {level}, expected 1..=255")]
    InvalidLevel {
        /// Item carrying the enchantment.
        item: RegistryKey,
        /// Enchantment id as stored.
        id: String,
        /// Offending level.
        level: i16,
    },
}

/// Inventory section of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Main inventory.
    Items,
    /// Armor inventory.
    Armor,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Items => f.write_str("items"),
            Section::Armor => f.write_str("armor"),
        }
    }
}

/// A record that cannot be restored as-is.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The document does not parse.
    #[error("record is not a valid document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The `version` field is not the current format version.
    #[error("unsupported record version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the document.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// A slot key does not exist in the target inventory.
    #[error("{section} slot {slot} is outside an inventory of {size} slots")]
    SlotOutOfRange {
        /// Section holding the entry.
        section: Section,
        /// Offending slot.
        slot: usize,
        /// Size of the target inventory.
        size: usize,
    },

    /// One entry failed to encode or decode.
    #[error("{section} slot {slot}: {source}")]
    Item {
        /// Section holding the entry.
        section: Section,
        /// Slot of the entry.
        slot: usize,
        /// Underlying item failure.
        #[source]
        source: CodecError,
    },
}

/// Failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Directory creation, read, write or rename failed.
    #[error("i/o failure on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid record.
    #[error("malformed record {path}: {source}")]
    Malformed {
        /// Record file.
        path: PathBuf,
        /// Why it was rejected.
        #[source]
        source: RecordError,
    },

    /// The record could not be rendered.
    #[error("failed to encode record for {player}: {source}")]
    Encode {
        /// Player the record belongs to.
        player: String,
        /// Why rendering failed.
        #[source]
        source: RecordError,
    },
}

impl StoreError {
    /// True for files that exist but cannot be parsed or validated.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::Malformed { .. })
    }
}
