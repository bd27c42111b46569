#![warn(missing_docs)]
//! Shared test surfaces: an in-memory player, item fixtures and proptest
//! strategies.

mod strategies;

use anyhow::{Context, Result};
use equipsave_core::{
    Enchantment, EnchantmentType, InventoryView, ItemStack, PlayerHandle, RegistryKey,
    SlotInventory,
};
use tempfile::TempDir;

pub use strategies::*;

/// In-memory player with a standard main and armor inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlayer {
    /// Display name.
    pub name: String,
    /// 36-slot main inventory.
    pub main: SlotInventory,
    /// 4-slot armor inventory.
    pub armor_inv: SlotInventory,
}

impl TestPlayer {
    /// Player with empty inventories.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main: SlotInventory::main(),
            armor_inv: SlotInventory::armor(),
        }
    }

    /// Player wearing a helmet with a sword in the first hotbar slot and
    /// some blocks further in.
    pub fn equipped(name: impl Into<String>) -> Self {
        let mut player = Self::new(name);
        player.main.set(0, Some(enchanted_sword()));
        player.main.set(27, Some(stack_of("cobblestone", 48)));
        player.armor_inv.set(0, Some(iron_helmet()));
        player
    }
}

impl PlayerHandle for TestPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn inventory(&self) -> &dyn InventoryView {
        &self.main
    }

    fn inventory_mut(&mut self) -> &mut dyn InventoryView {
        &mut self.main
    }

    fn armor(&self) -> &dyn InventoryView {
        &self.armor_inv
    }

    fn armor_mut(&mut self) -> &mut dyn InventoryView {
        &mut self.armor_inv
    }
}

/// Plain stack of a vanilla item.
pub fn stack_of(path: &str, count: u8) -> ItemStack {
    ItemStack::new(RegistryKey::vanilla(path), count)
}

/// Named, damaged diamond sword with three enchantments.
pub fn enchanted_sword() -> ItemStack {
    let mut sword = stack_of("diamond_sword", 1).with_enchantments([
        Enchantment::new(EnchantmentType::Sharpness, 5),
        Enchantment::new(EnchantmentType::Unbreaking, 3),
        Enchantment::new(EnchantmentType::FireAspect, 2),
    ]);
    sword.damage = 120;
    sword.custom_name = Some("Cleaver".to_string());
    sword.lore = vec!["Forged at spawn".to_string()];
    sword
}

/// Iron helmet with Protection II.
pub fn iron_helmet() -> ItemStack {
    stack_of("iron_helmet", 1)
        .with_enchantments([Enchantment::new(EnchantmentType::Protection, 2)])
}

/// Scratch data root removed when dropped.
pub fn temp_data_root() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("equipsave-")
        .tempdir()
        .context("Failed to create scratch data root")
}
