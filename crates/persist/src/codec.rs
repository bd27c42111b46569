//! Item codec: item stack <-> base64-encoded NBT blob.
//!
//! Each stack is mapped onto its canonical tag tree
//!
//! ```text
//! { id: String, Count: Byte, Damage: Short,
//!   tag?: { ench?: [{ id: String, lvl: Short }],
//!           display?: { Name?: String, Lore?: [String] } } }
//! ```
//!
//! serialized as binary NBT and then base64-encoded (standard alphabet,
//! padded) so it can sit in a text document. Encoding never consults the
//! registries; decoding validates the tree against them.
//!
//! Blobs come from files on disk, so decoding first bounds their size and
//! walks the raw tag stream to reject nesting deeper than [`MAX_TREE_DEPTH`]
//! before any recursive deserialization runs.

use crate::error::CodecError;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use equipsave_core::{Enchantment, ItemStack, Registries, RegistryKey, MAX_STACK_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Largest accepted item, in bytes of binary NBT.
pub const MAX_ITEM_BYTES: usize = 32 * 1024;

/// Deepest accepted compound/list nesting. Item trees use four levels.
pub const MAX_TREE_DEPTH: usize = 16;

const MAX_BLOB_LEN: usize = (MAX_ITEM_BYTES + 2) / 3 * 4;

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ItemStackNbt {
    id: String,
    #[serde(rename = "Count")]
    count: i8,
    #[serde(rename = "Damage", default)]
    damage: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<ItemTagNbt>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct ItemTagNbt {
    #[serde(rename = "ench", default, skip_serializing_if = "Vec::is_empty")]
    enchantments: Vec<EnchantmentNbt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<DisplayNbt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EnchantmentNbt {
    id: String,
    lvl: i16,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct DisplayNbt {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Lore", default, skip_serializing_if = "Vec::is_empty")]
    lore: Vec<String>,
}

impl ItemStackNbt {
    fn from_stack(stack: &ItemStack) -> Result<Self, CodecError> {
        let count = i8::try_from(stack.count).map_err(|_| CodecError::InvalidCount {
            item: stack.item.clone(),
            count: i16::from(stack.count),
            max: MAX_STACK_SIZE,
        })?;

        let enchantments: Vec<EnchantmentNbt> = stack
            .enchantments
            .iter()
            .map(|enchantment| EnchantmentNbt {
                id: enchantment.enchantment_type.key().to_string(),
                lvl: i16::from(enchantment.level),
            })
            .collect();

        let display = if stack.custom_name.is_some() || !stack.lore.is_empty() {
            Some(DisplayNbt {
                name: stack.custom_name.clone(),
                lore: stack.lore.clone(),
            })
        } else {
            None
        };

        let tag = if enchantments.is_empty() && display.is_none() {
            None
        } else {
            Some(ItemTagNbt {
                enchantments,
                display,
            })
        };

        Ok(Self {
            id: stack.item.to_string(),
            count,
            // Stored as the two's-complement short so every u16 survives.
            damage: stack.damage as i16,
            tag,
        })
    }
}

/// Converts item stacks to and from their durable text form.
#[derive(Debug, Clone)]
pub struct ItemCodec {
    registries: Arc<Registries>,
}

impl ItemCodec {
    /// Create a codec that validates decoded items against `registries`.
    pub fn new(registries: Arc<Registries>) -> Self {
        Self { registries }
    }

    /// Tables used during decode.
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Encode a stack as base64 text.
    pub fn encode(&self, stack: &ItemStack) -> Result<String, CodecError> {
        let bytes = self.encode_nbt(stack)?;
        Ok(BASE64_ENGINE.encode(bytes))
    }

    /// Encode a stack as raw binary NBT.
    pub fn encode_nbt(&self, stack: &ItemStack) -> Result<Vec<u8>, CodecError> {
        let tree = ItemStackNbt::from_stack(stack)?;
        let mut bytes = Vec::new();
        nbt::to_writer(&mut bytes, &tree, None)?;
        Ok(bytes)
    }

    /// Decode base64 text produced by [`ItemCodec::encode`].
    pub fn decode(&self, blob: &str) -> Result<ItemStack, CodecError> {
        let blob = blob.trim();
        if blob.len() > MAX_BLOB_LEN {
            return Err(CodecError::TooLarge {
                len: blob.len(),
                max: MAX_BLOB_LEN,
            });
        }
        let bytes = BASE64_ENGINE.decode(blob)?;
        self.decode_nbt(&bytes)
    }

    /// Decode raw binary NBT.
    pub fn decode_nbt(&self, bytes: &[u8]) -> Result<ItemStack, CodecError> {
        check_tree_shape(bytes)?;
        let tree: ItemStackNbt = nbt::from_reader(bytes)?;
        self.stack_from_tree(tree)
    }

    fn stack_from_tree(&self, tree: ItemStackNbt) -> Result<ItemStack, CodecError> {
        let item = RegistryKey::parse(&tree.id)
            .map_err(|_| CodecError::InvalidItemId { id: tree.id.clone() })?;
        let definition = self
            .registries
            .items
            .get(&item)
            .ok_or_else(|| CodecError::UnknownItem(item.clone()))?;

        if tree.count < 1 || tree.count as u8 > definition.max_stack_size {
            return Err(CodecError::InvalidCount {
                item,
                count: i16::from(tree.count),
                max: definition.max_stack_size,
            });
        }

        let mut stack = ItemStack::new(item, tree.count as u8);
        stack.damage = tree.damage as u16;

        let Some(tag) = tree.tag else {
            return Ok(stack);
        };

        for entry in tag.enchantments {
            let enchantment_type = self
                .registries
                .enchantments
                .resolve(&entry.id)
                .ok_or_else(|| CodecError::UnknownEnchantment {
                    item: stack.item.clone(),
                    id: entry.id.clone(),
                })?;
            let level = u8::try_from(entry.lvl)
                .ok()
                .filter(|level| *level >= 1)
                .ok_or_else(|| CodecError::InvalidLevel {
                    item: stack.item.clone(),
                    id: entry.id.clone(),
                    level: entry.lvl,
                })?;
            // Stored levels are kept as-is, even above the vanilla maximum.
            stack.enchantments.push(Enchantment {
                enchantment_type,
                level,
            });
        }

        if let Some(display) = tag.display {
            stack.custom_name = display.name;
            stack.lore = display.lore;
        }

        Ok(stack)
    }
}

/// Bound the size and nesting of an untrusted tag stream without recursing
/// past [`MAX_TREE_DEPTH`].
fn check_tree_shape(bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.len() > MAX_ITEM_BYTES {
        return Err(CodecError::TooLarge {
            len: bytes.len(),
            max: MAX_ITEM_BYTES,
        });
    }
    let mut scan = TreeScan { bytes, pos: 0 };
    if scan.byte()? != TAG_COMPOUND {
        return Err(CodecError::BadTree {
            reason: "root tag is not a compound",
        });
    }
    scan.string()?;
    scan.payload(TAG_COMPOUND, 0)
}

struct TreeScan<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl TreeScan<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn skip(&mut self, len: usize) -> Result<(), CodecError> {
        if len > self.remaining() {
            return Err(CodecError::BadTree { reason: "truncated" });
        }
        self.pos += len;
        Ok(())
    }

    fn byte(&mut self) -> Result<u8, CodecError> {
        let value = *self
            .bytes
            .get(self.pos)
            .ok_or(CodecError::BadTree { reason: "truncated" })?;
        self.pos += 1;
        Ok(value)
    }

    fn string(&mut self) -> Result<(), CodecError> {
        let len = u16::from_be_bytes([self.byte()?, self.byte()?]);
        self.skip(usize::from(len))
    }

    fn length(&mut self) -> Result<usize, CodecError> {
        let raw = i32::from_be_bytes([self.byte()?, self.byte()?, self.byte()?, self.byte()?]);
        usize::try_from(raw).map_err(|_| CodecError::BadTree {
            reason: "negative length",
        })
    }

    fn array(&mut self, width: usize) -> Result<(), CodecError> {
        let len = self.length()?;
        let bytes = len
            .checked_mul(width)
            .ok_or(CodecError::BadTree { reason: "truncated" })?;
        self.skip(bytes)
    }

    fn payload(&mut self, tag: u8, depth: usize) -> Result<(), CodecError> {
        match tag {
            TAG_BYTE => self.skip(1),
            TAG_SHORT => self.skip(2),
            TAG_INT | TAG_FLOAT => self.skip(4),
            TAG_LONG | TAG_DOUBLE => self.skip(8),
            TAG_BYTE_ARRAY => self.array(1),
            TAG_INT_ARRAY => self.array(4),
            TAG_LONG_ARRAY => self.array(8),
            TAG_STRING => self.string(),
            TAG_LIST => {
                let depth = descend(depth)?;
                let element = self.byte()?;
                let len = self.length()?;
                if element == TAG_END {
                    return match len {
                        0 => Ok(()),
                        _ => Err(CodecError::BadTree {
                            reason: "non-empty list of end tags",
                        }),
                    };
                }
                // Every element takes at least one byte.
                if len > self.remaining() {
                    return Err(CodecError::BadTree { reason: "truncated" });
                }
                for _ in 0..len {
                    self.payload(element, depth)?;
                }
                Ok(())
            }
            TAG_COMPOUND => {
                let depth = descend(depth)?;
                loop {
                    let field = self.byte()?;
                    if field == TAG_END {
                        return Ok(());
                    }
                    self.string()?;
                    self.payload(field, depth)?;
                }
            }
            _ => Err(CodecError::BadTree {
                reason: "unknown tag type",
            }),
        }
    }
}

fn descend(depth: usize) -> Result<usize, CodecError> {
    let depth = depth + 1;
    if depth > MAX_TREE_DEPTH {
        return Err(CodecError::TooDeep {
            max: MAX_TREE_DEPTH,
        });
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use equipsave_core::EnchantmentType;

    fn codec() -> ItemCodec {
        ItemCodec::new(Registries::vanilla())
    }

    fn tree_blob(tree: &ItemStackNbt) -> String {
        let mut bytes = Vec::new();
        nbt::to_writer(&mut bytes, tree, None).unwrap();
        BASE64_ENGINE.encode(bytes)
    }

    fn plain_tree(id: &str, count: i8) -> ItemStackNbt {
        ItemStackNbt {
            id: id.to_string(),
            count,
            damage: 0,
            tag: None,
        }
    }

    fn nested_compounds(levels: usize) -> Vec<u8> {
        let mut bytes = vec![TAG_COMPOUND, 0, 0];
        for _ in 0..levels {
            bytes.extend_from_slice(&[TAG_COMPOUND, 0, 1, b'x']);
        }
        bytes
    }

    #[test]
    fn deep_nesting_is_rejected_before_deserializing() {
        let blob = BASE64_ENGINE.encode(nested_compounds(5_000));
        let err = codec().decode(&blob).unwrap_err();
        assert!(matches!(err, CodecError::TooDeep { max: MAX_TREE_DEPTH }), "{err}");

        // Just past the limit, with every compound closed.
        let mut bytes = nested_compounds(MAX_TREE_DEPTH);
        bytes.extend(std::iter::repeat(TAG_END).take(MAX_TREE_DEPTH + 1));
        let err = codec().decode_nbt(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::TooDeep { .. }), "{err}");
    }

    #[test]
    fn deep_lists_are_rejected() {
        let mut bytes = vec![TAG_COMPOUND, 0, 0, TAG_LIST, 0, 1, b'l'];
        for _ in 0..1_000 {
            bytes.extend_from_slice(&[TAG_LIST, 0, 0, 0, 1]);
        }
        let err = codec().decode_nbt(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::TooDeep { .. }), "{err}");
    }

    #[test]
    fn oversized_blobs_are_rejected() {
        let blob = BASE64_ENGINE.encode(vec![0u8; MAX_ITEM_BYTES + 1]);
        let err = codec().decode(&blob).unwrap_err();
        assert!(matches!(err, CodecError::TooLarge { .. }), "{err}");

        let err = codec().decode_nbt(&vec![0u8; MAX_ITEM_BYTES + 1]).unwrap_err();
        assert!(matches!(err, CodecError::TooLarge { max: MAX_ITEM_BYTES, .. }), "{err}");
    }

    #[test]
    fn structurally_broken_trees_are_rejected() {
        let codec = codec();
        let bytes = codec.encode_nbt(&ItemStack::new(RegistryKey::vanilla("stone"), 3)).unwrap();
        let err = codec.decode_nbt(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, CodecError::BadTree { reason: "truncated" }), "{err}");

        // A list claiming a billion end tags.
        let bytes = [TAG_COMPOUND, 0, 0, TAG_LIST, 0, 1, b'l', TAG_END, 0x3b, 0x9a, 0xca, 0x00, TAG_END];
        assert!(matches!(codec.decode_nbt(&bytes), Err(CodecError::BadTree { .. })));

        // Negative byte array length.
        let bytes = [TAG_COMPOUND, 0, 0, TAG_BYTE_ARRAY, 0, 1, b'a', 0xff, 0xff, 0xff, 0xff, TAG_END];
        assert!(matches!(codec.decode_nbt(&bytes), Err(CodecError::BadTree { .. })));

        // Root must be a compound.
        assert!(matches!(codec.decode_nbt(&[TAG_STRING, 0, 0, 0, 0]), Err(CodecError::BadTree { .. })));
    }

    #[test]
    fn enchanted_named_item_roundtrips() {
        let codec = codec();
        let mut sword = ItemStack::new(RegistryKey::vanilla("diamond_sword"), 1).with_enchantments([
            Enchantment::new(EnchantmentType::Sharpness, 5),
            Enchantment::new(EnchantmentType::Unbreaking, 3),
            Enchantment::new(EnchantmentType::Looting, 2),
        ]);
        sword.damage = 417;
        sword.custom_name = Some("Excalibur".to_string());
        sword.lore = vec!["Pulled from a stone".to_string(), "Twice".to_string()];

        let blob = codec.encode(&sword).unwrap();
        let decoded = codec.decode(&blob).unwrap();
        assert_eq!(decoded, sword);
    }

    #[test]
    fn plain_stack_has_no_tag() {
        let codec = codec();
        let stone = ItemStack::new(RegistryKey::vanilla("stone"), 64);
        let bytes = codec.encode_nbt(&stone).unwrap();
        let tree: ItemStackNbt = nbt::from_reader(&bytes[..]).unwrap();
        assert_eq!(tree, plain_tree("minecraft:stone", 64));
        assert_eq!(codec.decode_nbt(&bytes).unwrap(), stone);
    }

    #[test]
    fn full_damage_range_survives() {
        let codec = codec();
        let mut boots = ItemStack::new(RegistryKey::vanilla("netherite_boots"), 1);
        boots.damage = u16::MAX;
        let decoded = codec.decode(&codec.encode(&boots).unwrap()).unwrap();
        assert_eq!(decoded.damage, u16::MAX);
    }

    #[test]
    fn levels_above_vanilla_maximum_are_kept() {
        let codec = codec();
        let mut pick = ItemStack::new(RegistryKey::vanilla("iron_pickaxe"), 1);
        pick.enchantments.push(Enchantment {
            enchantment_type: EnchantmentType::Efficiency,
            level: 10,
        });
        let decoded = codec.decode(&codec.encode(&pick).unwrap()).unwrap();
        assert_eq!(decoded.enchantment_level(EnchantmentType::Efficiency), 10);
    }

    #[test]
    fn rejects_text_that_is_not_base64() {
        let err = codec().decode("this is *not* base64!").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)), "{err}");
    }

    #[test]
    fn rejects_bytes_that_are_not_nbt() {
        let blob = BASE64_ENGINE.encode(b"definitely not a tag tree");
        let err = codec().decode(&blob).unwrap_err();
        assert!(matches!(err, CodecError::BadTree { .. }), "{err}");

        // Well-formed tree, wrong schema.
        let bytes = [TAG_COMPOUND, 0, 0, TAG_BYTE, 0, 1, b'x', 7, TAG_END];
        let err = codec().decode_nbt(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::Nbt(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_item() {
        let err = codec()
            .decode(&tree_blob(&plain_tree("minecraft:mystery_box", 1)))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownItem(_)), "{err}");

        let err = codec()
            .decode(&tree_blob(&plain_tree("Diamond Sword", 1)))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidItemId { .. }), "{err}");
    }

    #[test]
    fn rejects_counts_outside_stack_rules() {
        for count in [0, -3] {
            let err = codec()
                .decode(&tree_blob(&plain_tree("minecraft:stone", count)))
                .unwrap_err();
            assert!(matches!(err, CodecError::InvalidCount { .. }), "{err}");
        }
        let err = codec()
            .decode(&tree_blob(&plain_tree("minecraft:diamond_sword", 2)))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidCount { max: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_enchantment_and_bad_levels() {
        let mut tree = plain_tree("minecraft:diamond_sword", 1);
        tree.tag = Some(ItemTagNbt {
            enchantments: vec![EnchantmentNbt {
                id: "othermod:vampirism".to_string(),
                lvl: 1,
            }],
            display: None,
        });
        let err = codec().decode(&tree_blob(&tree)).unwrap_err();
        assert!(matches!(err, CodecError::UnknownEnchantment { .. }), "{err}");

        tree.tag = Some(ItemTagNbt {
            enchantments: vec![EnchantmentNbt {
                id: "minecraft:sharpness".to_string(),
                lvl: 0,
            }],
            display: None,
        });
        let err = codec().decode(&tree_blob(&tree)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidLevel { level: 0, .. }), "{err}");
    }

    #[test]
    fn restricted_registry_rejects_foreign_enchantments() {
        let registries = Arc::new(Registries::new(
            equipsave_core::ItemRegistry::vanilla(),
            equipsave_core::EnchantmentRegistry::from_types([EnchantmentType::Unbreaking]),
        ));
        let codec = ItemCodec::new(registries);
        let sword = ItemStack::new(RegistryKey::vanilla("golden_sword"), 1)
            .with_enchantments([Enchantment::new(EnchantmentType::Sharpness, 1)]);

        let blob = codec.encode(&sword).unwrap();
        assert!(matches!(
            codec.decode(&blob),
            Err(CodecError::UnknownEnchantment { .. })
        ));
    }
}
