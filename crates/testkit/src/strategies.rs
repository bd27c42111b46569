//! Proptest strategies over the vanilla registries.

use equipsave_core::{
    Enchantment, EnchantmentType, ItemDefinition, ItemRegistry, ItemStack, ARMOR_INVENTORY_SIZE,
    MAIN_INVENTORY_SIZE,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Any registered vanilla item definition.
pub fn arb_item_definition() -> impl Strategy<Value = ItemDefinition> {
    let defs: Vec<ItemDefinition> = ItemRegistry::vanilla().iter().cloned().collect();
    prop::sample::select(defs)
}

/// A single enchantment with a level inside its vanilla range.
pub fn arb_enchantment() -> impl Strategy<Value = Enchantment> {
    prop::sample::select(EnchantmentType::ALL.to_vec()).prop_flat_map(|ty| {
        (1..=ty.max_level()).prop_map(move |level| Enchantment::new(ty, level))
    })
}

/// A valid stack: registered type, count in `1..=max_stack_size`, any damage,
/// a compatible enchantment set, optional name and lore.
pub fn arb_item_stack() -> impl Strategy<Value = ItemStack> {
    arb_item_definition().prop_flat_map(|def| {
        (
            1..=def.max_stack_size,
            any::<u16>(),
            prop::collection::vec(arb_enchantment(), 0..4),
            prop::option::of("[A-Za-z0-9 ]{1,16}"),
            prop::collection::vec("[A-Za-z0-9 .,!]{0,24}", 0..3),
        )
            .prop_map(move |(count, damage, enchantments, custom_name, lore)| {
                let mut stack = ItemStack::new(def.key.clone(), count).with_enchantments(enchantments);
                stack.damage = damage;
                stack.custom_name = custom_name;
                stack.lore = lore;
                stack
            })
    })
}

/// Sparse main inventory contents keyed by slot.
pub fn arb_main_slots() -> impl Strategy<Value = BTreeMap<usize, ItemStack>> {
    prop::collection::btree_map(0..MAIN_INVENTORY_SIZE, arb_item_stack(), 0..12)
}

/// Sparse armor contents keyed by slot.
pub fn arb_armor_slots() -> impl Strategy<Value = BTreeMap<usize, ItemStack>> {
    prop::collection::btree_map(0..ARMOR_INVENTORY_SIZE, arb_item_stack(), 0..=ARMOR_INVENTORY_SIZE)
}
