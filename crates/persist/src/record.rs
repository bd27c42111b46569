//! Per-player inventory record: capture from a live player, restore onto one.

use crate::codec::ItemCodec;
use crate::error::{CodecError, RecordError, Section};
use chrono::{DateTime, Utc};
use equipsave_core::{InventoryView, ItemStack, PlayerHandle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Current on-disk format version.
pub const RECORD_VERSION: u32 = 1;

/// Durable equipment snapshot for one player.
///
/// Each section maps a slot index to a base64 item blob. Empty slots are not
/// stored; restore treats a missing slot as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Format version, see [`RECORD_VERSION`].
    pub version: u32,
    /// Display name of the player the record was captured from.
    pub player: String,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Main inventory, keyed by slot.
    #[serde(default)]
    pub items: BTreeMap<usize, String>,
    /// Armor inventory, keyed by slot.
    #[serde(default)]
    pub armor: BTreeMap<usize, String>,
}

/// What a restore placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Stacks placed in the main inventory.
    pub items: usize,
    /// Stacks placed in the armor inventory.
    pub armor: usize,
}

impl InventoryRecord {
    /// Empty record for `player`.
    pub fn empty(player: impl Into<String>) -> Self {
        Self {
            version: RECORD_VERSION,
            player: player.into(),
            saved_at: Utc::now(),
            items: BTreeMap::new(),
            armor: BTreeMap::new(),
        }
    }

    /// Snapshot both inventories of `player`.
    ///
    /// Armor is walked first, then the main inventory, each in slot order.
    /// Empty slots and zero-count stacks are skipped.
    pub fn capture(player: &dyn PlayerHandle, codec: &ItemCodec) -> Result<Self, RecordError> {
        let mut record = Self::empty(player.name());
        record.armor = encode_section(player.armor(), Section::Armor, codec)?;
        record.items = encode_section(player.inventory(), Section::Items, codec)?;
        debug!(
            player = %record.player,
            items = record.items.len(),
            armor = record.armor.len(),
            "captured inventory record"
        );
        Ok(record)
    }

    /// Restore this record onto `player`.
    ///
    /// Every entry is decoded and range-checked before anything is touched;
    /// on error the player's inventories are left as they were. On success
    /// both inventories are cleared and each stack is placed at its recorded
    /// slot.
    pub fn restore(
        &self,
        player: &mut dyn PlayerHandle,
        codec: &ItemCodec,
    ) -> Result<RestoreSummary, RecordError> {
        self.check_version()?;
        let armor = decode_section(&self.armor, Section::Armor, player.armor().size(), codec)?;
        let items = decode_section(
            &self.items,
            Section::Items,
            player.inventory().size(),
            codec,
        )?;

        player.armor_mut().clear();
        player.inventory_mut().clear();

        let summary = RestoreSummary {
            items: items.len(),
            armor: armor.len(),
        };
        scatter(player.armor_mut(), armor);
        scatter(player.inventory_mut(), items);
        Ok(summary)
    }

    /// Render as a YAML document.
    pub fn to_yaml(&self) -> Result<String, RecordError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a YAML document and check its version.
    pub fn from_yaml(text: &str) -> Result<Self, RecordError> {
        let record: Self = serde_yaml::from_str(text)?;
        record.check_version()?;
        Ok(record)
    }

    /// True when neither section holds anything.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.armor.is_empty()
    }

    fn check_version(&self) -> Result<(), RecordError> {
        if self.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: self.version,
                expected: RECORD_VERSION,
            });
        }
        Ok(())
    }
}

fn encode_section(
    inventory: &dyn InventoryView,
    section: Section,
    codec: &ItemCodec,
) -> Result<BTreeMap<usize, String>, RecordError> {
    inventory
        .occupied()
        .into_iter()
        .filter(|(_, stack)| stack.count > 0)
        .map(|(slot, stack)| {
            let blob = codec.encode(&stack).map_err(|source| item_error(section, slot, source))?;
            Ok((slot, blob))
        })
        .collect()
}

fn decode_section(
    entries: &BTreeMap<usize, String>,
    section: Section,
    size: usize,
    codec: &ItemCodec,
) -> Result<Vec<(usize, ItemStack)>, RecordError> {
    entries
        .iter()
        .map(|(&slot, blob)| {
            if slot >= size {
                return Err(RecordError::SlotOutOfRange {
                    section,
                    slot,
                    size,
                });
            }
            let stack = codec.decode(blob).map_err(|source| item_error(section, slot, source))?;
            Ok((slot, stack))
        })
        .collect()
}

fn scatter(inventory: &mut dyn InventoryView, stacks: Vec<(usize, ItemStack)>) {
    for (slot, stack) in stacks {
        // Range was checked during decode.
        inventory.set(slot, Some(stack));
    }
}

fn item_error(section: Section, slot: usize, source: CodecError) -> RecordError {
    RecordError::Item {
        section,
        slot,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equipsave_core::{ArmorSlot, Registries, RegistryKey};
    use equipsave_testkit::{enchanted_sword, iron_helmet, stack_of, TestPlayer};

    fn codec() -> ItemCodec {
        ItemCodec::new(Registries::vanilla())
    }

    #[test]
    fn capture_skips_empty_slots() {
        let codec = codec();
        let mut player = TestPlayer::new("Alex");
        player.main.set(4, Some(stack_of("cobblestone", 32)));
        player.main.set(9, Some(stack_of("bread", 0)));
        player
            .armor_inv
            .set(ArmorSlot::Helmet.index(), Some(iron_helmet()));

        let record = InventoryRecord::capture(&player, &codec).unwrap();
        assert_eq!(record.player, "Alex");
        assert_eq!(record.items.keys().copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(record.armor.keys().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn restore_places_by_slot_not_by_order() {
        let codec = codec();
        let sword = enchanted_sword();
        let helmet = iron_helmet();

        // Build the record by hand with insertion order reversed.
        let mut record = InventoryRecord::empty("Alex");
        record.items.insert(27, codec.encode(&sword).unwrap());
        record.items.insert(0, codec.encode(&stack_of("torch", 16)).unwrap());
        record.armor.insert(2, codec.encode(&helmet).unwrap());

        let mut player = TestPlayer::new("Alex");
        player.main.set(5, Some(stack_of("dirt", 3)));
        let summary = record.restore(&mut player, &codec).unwrap();

        assert_eq!(summary, RestoreSummary { items: 2, armor: 1 });
        assert_eq!(player.main.get(27), Some(sword));
        assert_eq!(player.main.get(0).map(|s| s.count), Some(16));
        assert_eq!(player.armor_inv.get(2), Some(helmet));
        // Stale content is gone.
        assert!(player.main.get(5).is_none());
    }

    #[test]
    fn out_of_range_slot_leaves_player_untouched() {
        let codec = codec();
        let mut record = InventoryRecord::empty("Alex");
        record.armor.insert(4, codec.encode(&iron_helmet()).unwrap());

        let mut player = TestPlayer::new("Alex");
        player.main.set(1, Some(stack_of("apple", 5)));

        let err = record.restore(&mut player, &codec).unwrap_err();
        assert!(matches!(
            err,
            RecordError::SlotOutOfRange {
                section: Section::Armor,
                slot: 4,
                size: 4
            }
        ));
        assert_eq!(player.main.get(1).map(|s| s.count), Some(5));
    }

    #[test]
    fn corrupt_entry_leaves_player_untouched() {
        let codec = codec();
        let mut record = InventoryRecord::empty("Alex");
        record.items.insert(0, codec.encode(&stack_of("stone", 1)).unwrap());
        record.items.insert(1, "@@@".to_string());

        let mut player = TestPlayer::new("Alex");
        player.armor_inv.set(0, Some(iron_helmet()));

        let err = record.restore(&mut player, &codec).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Item {
                section: Section::Items,
                slot: 1,
                ..
            }
        ));
        assert_eq!(player.armor_inv.get(0), Some(iron_helmet()));
        assert!(player.main.is_empty());
    }

    #[test]
    fn hostile_nesting_fails_the_restore() {
        use base64::Engine as _;

        let codec = codec();
        let mut bytes = vec![0x0a, 0, 0];
        for _ in 0..5_000 {
            bytes.extend_from_slice(&[0x0a, 0, 1, b'x']);
        }
        let mut record = InventoryRecord::empty("Alex");
        record.items.insert(
            3,
            base64::engine::general_purpose::STANDARD.encode(&bytes),
        );

        let mut player = TestPlayer::new("Alex");
        player.main.set(0, Some(stack_of("apple", 2)));
        let err = record.restore(&mut player, &codec).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Item {
                slot: 3,
                source: CodecError::TooDeep { .. },
                ..
            }
        ));
        assert_eq!(player.main.get(0).map(|s| s.count), Some(2));
    }

    #[test]
    fn yaml_document_roundtrips() {
        let codec = codec();
        let mut player = TestPlayer::new("Steve");
        player.main.set(27, Some(enchanted_sword()));
        player.armor_inv.set(3, Some(stack_of("diamond_boots", 1)));

        let record = InventoryRecord::capture(&player, &codec).unwrap();
        let yaml = record.to_yaml().unwrap();
        assert!(yaml.contains("player: Steve"));
        assert!(yaml.contains("version: 1"));

        let parsed = InventoryRecord::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn rejects_other_versions() {
        let mut record = InventoryRecord::empty("Steve");
        record.version = 7;
        let yaml = record.to_yaml().unwrap();
        assert!(matches!(
            InventoryRecord::from_yaml(&yaml),
            Err(RecordError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn empty_record_clears_inventories() {
        let codec = codec();
        let record = InventoryRecord::empty("Steve");
        assert!(record.is_empty());

        let mut player = TestPlayer::new("Steve");
        player.main.set(0, Some(ItemStack::new(RegistryKey::vanilla("stick"), 2)));
        player.armor_inv.set(1, Some(stack_of("leather_chestplate", 1)));

        let summary = record.restore(&mut player, &codec).unwrap();
        assert_eq!(summary, RestoreSummary::default());
        assert!(player.main.is_empty());
        assert!(player.armor_inv.is_empty());
    }
}
