#![warn(missing_docs)]
//! Core item, enchantment and inventory types shared across the workspace.

pub mod enchantment;
pub mod inventory;
pub mod item;
pub mod player;
pub mod registry;

// Re-export commonly used types
pub use enchantment::{Enchantment, EnchantmentRegistry, EnchantmentType};
pub use inventory::{
    ArmorSlot, InventoryView, SlotInventory, ARMOR_INVENTORY_SIZE, MAIN_INVENTORY_SIZE,
};
pub use item::{
    ItemDefinition, ItemKind, ItemRegistry, ItemStack, ToolType, DEFAULT_STACK_SIZE,
    MAX_STACK_SIZE,
};
pub use player::PlayerHandle;
pub use registry::{Registries, RegistryKey, RegistryKeyError, DEFAULT_NAMESPACE};
