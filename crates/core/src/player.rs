//! Host player surface.

use crate::inventory::InventoryView;

/// What the persistence layer needs from a connected player.
///
/// Host runtimes implement this over their own player objects; the
/// inventories are borrowed one at a time.
pub trait PlayerHandle {
    /// Display name, used as the record identity.
    fn name(&self) -> &str;

    /// Main inventory (hotbar included).
    fn inventory(&self) -> &dyn InventoryView;

    /// Mutable main inventory.
    fn inventory_mut(&mut self) -> &mut dyn InventoryView;

    /// Armor inventory (exactly four slots).
    fn armor(&self) -> &dyn InventoryView;

    /// Mutable armor inventory.
    fn armor_mut(&mut self) -> &mut dyn InventoryView;
}
