//! Item system - item definitions, the item registry, and item stacks

use crate::enchantment::{Enchantment, EnchantmentType};
use crate::inventory::ArmorSlot;
use crate::registry::RegistryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum stack size for most items.
pub const DEFAULT_STACK_SIZE: u8 = 64;

/// Largest stack size any item may declare. Counts are stored as a signed byte.
pub const MAX_STACK_SIZE: u8 = i8::MAX as u8;

/// Tool types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Pickaxe - mines stone, ores
    Pickaxe,
    /// Axe - chops wood
    Axe,
    /// Shovel - digs dirt, sand, gravel
    Shovel,
    /// Sword - combat weapon
    Sword,
    /// Hoe - tills farmland
    Hoe,
    /// Bow - ranged weapon
    Bow,
}

impl ToolType {
    fn suffix(self) -> &'static str {
        match self {
            ToolType::Pickaxe => "pickaxe",
            ToolType::Axe => "axe",
            ToolType::Shovel => "shovel",
            ToolType::Sword => "sword",
            ToolType::Hoe => "hoe",
            ToolType::Bow => "bow",
        }
    }
}

/// Broad category of an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A tool or weapon
    Tool(ToolType),
    /// A wearable armor piece for the given slot
    Armor(ArmorSlot),
    /// A placeable block
    Block,
    /// Food item
    Food,
    /// Anything else
    Misc,
}

/// Registry entry describing one item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefinition {
    /// Stable identifier.
    pub key: RegistryKey,
    /// Category.
    pub kind: ItemKind,
    /// Maximum number of items per slot.
    pub max_stack_size: u8,
}

impl ItemDefinition {
    /// Define an item, deriving the stack size from its kind.
    pub fn new(key: RegistryKey, kind: ItemKind) -> Self {
        let max_stack_size = match kind {
            ItemKind::Tool(_) | ItemKind::Armor(_) => 1,
            _ => DEFAULT_STACK_SIZE,
        };
        Self {
            key,
            kind,
            max_stack_size,
        }
    }

    /// Override the stack size, clamped into `1..=MAX_STACK_SIZE`.
    pub fn with_max_stack_size(mut self, max_stack_size: u8) -> Self {
        self.max_stack_size = max_stack_size.clamp(1, MAX_STACK_SIZE);
        self
    }

    /// Tools and weapons.
    pub fn is_tool(&self) -> bool {
        matches!(self.kind, ItemKind::Tool(_))
    }
}

const TOOL_MATERIALS: [&str; 6] = ["wooden", "stone", "iron", "golden", "diamond", "netherite"];
const ARMOR_MATERIALS: [&str; 6] = [
    "leather",
    "chainmail",
    "iron",
    "golden",
    "diamond",
    "netherite",
];
const BLOCKS: [&str; 12] = [
    "stone",
    "cobblestone",
    "dirt",
    "grass_block",
    "sand",
    "gravel",
    "oak_log",
    "oak_planks",
    "glass",
    "torch",
    "crafting_table",
    "furnace",
];
const FOODS: [&str; 6] = [
    "apple",
    "bread",
    "cooked_beef",
    "cooked_porkchop",
    "golden_apple",
    "carrot",
];
const MISC: [&str; 10] = [
    "stick",
    "coal",
    "iron_ingot",
    "gold_ingot",
    "diamond",
    "emerald",
    "arrow",
    "string",
    "book",
    "enchanted_book",
];
const SMALL_STACKS: [&str; 4] = ["ender_pearl", "snowball", "egg", "bucket"];

/// Immutable name -> item definition table.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    by_key: BTreeMap<RegistryKey, ItemDefinition>,
}

impl ItemRegistry {
    /// Build a registry from explicit definitions. Later duplicates win.
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let by_key = definitions
            .into_iter()
            .map(|def| (def.key.clone(), def))
            .collect();
        Self { by_key }
    }

    /// The built-in vanilla item set.
    pub fn vanilla() -> Self {
        let mut defs = Vec::new();

        for material in TOOL_MATERIALS {
            for tool in [
                ToolType::Pickaxe,
                ToolType::Axe,
                ToolType::Shovel,
                ToolType::Sword,
                ToolType::Hoe,
            ] {
                let key = RegistryKey::vanilla(&format!("{material}_{}", tool.suffix()));
                defs.push(ItemDefinition::new(key, ItemKind::Tool(tool)));
            }
        }
        defs.push(ItemDefinition::new(
            RegistryKey::vanilla("bow"),
            ItemKind::Tool(ToolType::Bow),
        ));

        for material in ARMOR_MATERIALS {
            for slot in ArmorSlot::ALL {
                let key = RegistryKey::vanilla(&format!("{material}_{}", slot.piece_name()));
                defs.push(ItemDefinition::new(key, ItemKind::Armor(slot)));
            }
        }
        defs.push(ItemDefinition::new(
            RegistryKey::vanilla("turtle_helmet"),
            ItemKind::Armor(ArmorSlot::Helmet),
        ));

        defs.extend(
            BLOCKS
                .iter()
                .map(|name| ItemDefinition::new(RegistryKey::vanilla(name), ItemKind::Block)),
        );
        defs.extend(
            FOODS
                .iter()
                .map(|name| ItemDefinition::new(RegistryKey::vanilla(name), ItemKind::Food)),
        );
        defs.extend(
            MISC.iter()
                .map(|name| ItemDefinition::new(RegistryKey::vanilla(name), ItemKind::Misc)),
        );
        defs.extend(SMALL_STACKS.iter().map(|name| {
            ItemDefinition::new(RegistryKey::vanilla(name), ItemKind::Misc).with_max_stack_size(16)
        }));

        Self::new(defs)
    }

    /// Look up an item by key.
    pub fn get(&self, key: &RegistryKey) -> Option<&ItemDefinition> {
        self.by_key.get(key)
    }

    /// Resolve a free-form name (`diamond_sword`, `minecraft:diamond_sword`).
    pub fn resolve(&self, name: &str) -> Option<&ItemDefinition> {
        let key = RegistryKey::parse(&name.trim().to_ascii_lowercase()).ok()?;
        self.get(&key)
    }

    /// All definitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.by_key.values()
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true when no items are registered.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// An item stack in an inventory slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier
    pub item: RegistryKey,
    /// Quantity in stack
    pub count: u8,
    /// Accumulated damage for damageable items (0 = pristine)
    pub damage: u16,
    /// Enchantments applied to this item, in application order
    pub enchantments: Vec<Enchantment>,
    /// Name given on an anvil, if any
    pub custom_name: Option<String>,
    /// Extra tooltip lines
    pub lore: Vec<String>,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item: RegistryKey, count: u8) -> Self {
        Self {
            item,
            count,
            damage: 0,
            enchantments: Vec::new(),
            custom_name: None,
            lore: Vec::new(),
        }
    }

    /// Builder-style helper that adds each enchantment in turn.
    pub fn with_enchantments(mut self, enchantments: impl IntoIterator<Item = Enchantment>) -> Self {
        for enchantment in enchantments {
            self.add_enchantment(enchantment);
        }
        self
    }

    /// Add an enchantment to this item
    /// Returns true if the enchantment was added successfully
    pub fn add_enchantment(&mut self, enchantment: Enchantment) -> bool {
        // Check compatibility with existing enchantments
        if self
            .enchantments
            .iter()
            .any(|existing| !existing.enchantment_type.is_compatible_with(&enchantment.enchantment_type))
        {
            return false;
        }

        // Same type already present: keep the higher level
        if let Some(existing) = self
            .enchantments
            .iter_mut()
            .find(|existing| existing.enchantment_type == enchantment.enchantment_type)
        {
            existing.level = existing.level.max(enchantment.level);
            return true;
        }

        self.enchantments.push(enchantment);
        true
    }

    /// Check if this item has a specific enchantment type
    pub fn has_enchantment(&self, enchant_type: EnchantmentType) -> bool {
        self.enchantments
            .iter()
            .any(|e| e.enchantment_type == enchant_type)
    }

    /// Get the level of a specific enchantment, or 0 if not present
    pub fn enchantment_level(&self, enchant_type: EnchantmentType) -> u8 {
        self.enchantments
            .iter()
            .find(|e| e.enchantment_type == enchant_type)
            .map(|e| e.level)
            .unwrap_or(0)
    }

    /// Compare enchantment sets ignoring order.
    pub fn same_enchantments(&self, other: &ItemStack) -> bool {
        let mut ours = self.enchantments.clone();
        let mut theirs = other.enchantments.clone();
        ours.sort();
        theirs.sort();
        ours == theirs
    }

    /// Equality on identity, count, damage, name, lore and the enchantment set.
    pub fn matches(&self, other: &ItemStack) -> bool {
        self.item == other.item
            && self.count == other.count
            && self.damage == other.damage
            && self.custom_name == other.custom_name
            && self.lore == other.lore
            && self.same_enchantments(other)
    }
}
