//! Slotted inventories.
//!
//! [`InventoryView`] is the capability surface the persistence layer reads
//! from and writes into; host runtimes implement it over their own containers.
//! [`SlotInventory`] is the in-memory implementation.

use crate::item::ItemStack;
use serde::{Deserialize, Serialize};

/// Number of slots in the main player inventory (hotbar included).
pub const MAIN_INVENTORY_SIZE: usize = 36;

/// Number of slots in the armor inventory.
pub const ARMOR_INVENTORY_SIZE: usize = 4;

/// Armor slot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    /// Head
    Helmet,
    /// Chest
    Chestplate,
    /// Legs
    Leggings,
    /// Feet
    Boots,
}

impl ArmorSlot {
    /// Slots in index order.
    pub const ALL: [ArmorSlot; ARMOR_INVENTORY_SIZE] = [
        ArmorSlot::Helmet,
        ArmorSlot::Chestplate,
        ArmorSlot::Leggings,
        ArmorSlot::Boots,
    ];

    /// Index of this slot in the armor inventory.
    pub fn index(self) -> usize {
        match self {
            ArmorSlot::Helmet => 0,
            ArmorSlot::Chestplate => 1,
            ArmorSlot::Leggings => 2,
            ArmorSlot::Boots => 3,
        }
    }

    /// Inverse of [`ArmorSlot::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Item name suffix for pieces worn in this slot.
    pub fn piece_name(self) -> &'static str {
        match self {
            ArmorSlot::Helmet => "helmet",
            ArmorSlot::Chestplate => "chestplate",
            ArmorSlot::Leggings => "leggings",
            ArmorSlot::Boots => "boots",
        }
    }
}

/// Read/write access to a fixed-size, slot-indexed inventory.
pub trait InventoryView {
    /// Fixed slot count.
    fn size(&self) -> usize;

    /// Item in `slot`, or `None` when empty or out of range.
    fn get(&self, slot: usize) -> Option<ItemStack>;

    /// Replace the contents of `slot`. Returns false when out of range.
    fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool;

    /// Empty every slot.
    fn clear(&mut self);

    /// Non-empty slots in index order.
    fn occupied(&self) -> Vec<(usize, ItemStack)> {
        (0..self.size())
            .filter_map(|slot| self.get(slot).map(|stack| (slot, stack)))
            .collect()
    }
}

/// Player or container inventory with a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInventory {
    slots: Vec<Option<ItemStack>>,
}

impl SlotInventory {
    /// Create an empty inventory with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Empty main player inventory.
    pub fn main() -> Self {
        Self::new(MAIN_INVENTORY_SIZE)
    }

    /// Empty armor inventory.
    pub fn armor() -> Self {
        Self::new(ARMOR_INVENTORY_SIZE)
    }

    /// Borrow the stack in `slot`.
    pub fn slot(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|entry| entry.as_ref())
    }

    /// Remove and return the stack in `slot`.
    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(|entry| entry.take())
    }

    /// Place a stack in the first empty slot, returning the slot used.
    pub fn push(&mut self, stack: ItemStack) -> Option<usize> {
        let slot = self.slots.iter().position(|entry| entry.is_none())?;
        self.slots[slot] = Some(stack);
        Some(slot)
    }

    /// Count empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Check if inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }
}

impl Default for SlotInventory {
    fn default() -> Self {
        Self::main()
    }
}

impl InventoryView for SlotInventory {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, slot: usize) -> Option<ItemStack> {
        self.slot(slot).cloned()
    }

    fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = stack;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|entry| *entry = None);
    }
}
