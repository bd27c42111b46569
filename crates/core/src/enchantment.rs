//! Enchantment types, their level caps and exclusivity, and the enchantment table.

use crate::registry::RegistryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Types of enchantments that can be applied to items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnchantmentType {
    // Tool enchantments
    /// Increases mining speed
    Efficiency,
    /// Allows silk touch harvesting of blocks
    SilkTouch,
    /// Increases block drop amounts
    Fortune,

    // Weapon enchantments
    /// Increases attack damage
    Sharpness,
    /// Extra damage against undead mobs
    Smite,
    /// Extra damage against arthropods
    BaneOfArthropods,
    /// Increases knockback
    Knockback,
    /// Sets targets on fire
    FireAspect,
    /// Increases mob loot drops
    Looting,
    /// Increases bow/arrow damage
    Power,
    /// Increases bow/arrow knockback
    Punch,
    /// Bow/arrow sets targets on fire
    Flame,
    /// Allows firing without consuming arrows
    Infinity,

    // Armor enchantments
    /// Reduces damage from all sources
    Protection,
    /// Reduces fire damage
    FireProtection,
    /// Reduces explosion damage
    BlastProtection,
    /// Reduces projectile damage
    ProjectileProtection,
    /// Reduces fall damage (boots)
    FeatherFalling,
    /// Extends underwater breathing (helmet)
    Respiration,
    /// Removes underwater mining speed penalty (helmet).
    AquaAffinity,
    /// Increases underwater movement speed (boots).
    DepthStrider,
    /// Damages attackers
    Thorns,

    // Universal enchantments
    /// Reduces durability loss
    Unbreaking,
    /// Repairs item using XP
    Mending,
}

impl EnchantmentType {
    /// Every enchantment type, in declaration order.
    pub const ALL: [EnchantmentType; 24] = [
        EnchantmentType::Efficiency,
        EnchantmentType::SilkTouch,
        EnchantmentType::Fortune,
        EnchantmentType::Sharpness,
        EnchantmentType::Smite,
        EnchantmentType::BaneOfArthropods,
        EnchantmentType::Knockback,
        EnchantmentType::FireAspect,
        EnchantmentType::Looting,
        EnchantmentType::Power,
        EnchantmentType::Punch,
        EnchantmentType::Flame,
        EnchantmentType::Infinity,
        EnchantmentType::Protection,
        EnchantmentType::FireProtection,
        EnchantmentType::BlastProtection,
        EnchantmentType::ProjectileProtection,
        EnchantmentType::FeatherFalling,
        EnchantmentType::Respiration,
        EnchantmentType::AquaAffinity,
        EnchantmentType::DepthStrider,
        EnchantmentType::Thorns,
        EnchantmentType::Unbreaking,
        EnchantmentType::Mending,
    ];

    /// Path of this enchantment's registry key (`minecraft:<path>`).
    pub fn key_path(&self) -> &'static str {
        match self {
            EnchantmentType::Efficiency => "efficiency",
            EnchantmentType::SilkTouch => "silk_touch",
            EnchantmentType::Fortune => "fortune",
            EnchantmentType::Sharpness => "sharpness",
            EnchantmentType::Smite => "smite",
            EnchantmentType::BaneOfArthropods => "bane_of_arthropods",
            EnchantmentType::Knockback => "knockback",
            EnchantmentType::FireAspect => "fire_aspect",
            EnchantmentType::Looting => "looting",
            EnchantmentType::Power => "power",
            EnchantmentType::Punch => "punch",
            EnchantmentType::Flame => "flame",
            EnchantmentType::Infinity => "infinity",
            EnchantmentType::Protection => "protection",
            EnchantmentType::FireProtection => "fire_protection",
            EnchantmentType::BlastProtection => "blast_protection",
            EnchantmentType::ProjectileProtection => "projectile_protection",
            EnchantmentType::FeatherFalling => "feather_falling",
            EnchantmentType::Respiration => "respiration",
            EnchantmentType::AquaAffinity => "aqua_affinity",
            EnchantmentType::DepthStrider => "depth_strider",
            EnchantmentType::Thorns => "thorns",
            EnchantmentType::Unbreaking => "unbreaking",
            EnchantmentType::Mending => "mending",
        }
    }

    /// Full registry key for this enchantment.
    pub fn key(&self) -> RegistryKey {
        RegistryKey::vanilla(self.key_path())
    }

    /// Get the maximum level for this enchantment
    pub fn max_level(&self) -> u8 {
        match self {
            EnchantmentType::Efficiency => 5,
            EnchantmentType::SilkTouch => 1,
            EnchantmentType::Fortune => 3,
            EnchantmentType::Sharpness => 5,
            EnchantmentType::Smite => 5,
            EnchantmentType::BaneOfArthropods => 5,
            EnchantmentType::Knockback => 2,
            EnchantmentType::FireAspect => 2,
            EnchantmentType::Looting => 3,
            EnchantmentType::Power => 5,
            EnchantmentType::Punch => 2,
            EnchantmentType::Flame => 1,
            EnchantmentType::Infinity => 1,
            EnchantmentType::Protection => 4,
            EnchantmentType::FireProtection => 4,
            EnchantmentType::BlastProtection => 4,
            EnchantmentType::ProjectileProtection => 4,
            EnchantmentType::FeatherFalling => 4,
            EnchantmentType::Respiration => 3,
            EnchantmentType::AquaAffinity => 1,
            EnchantmentType::DepthStrider => 3,
            EnchantmentType::Thorns => 3,
            EnchantmentType::Unbreaking => 3,
            EnchantmentType::Mending => 1,
        }
    }

    /// Check if this enchantment is compatible with another
    /// (some enchantments are mutually exclusive)
    pub fn is_compatible_with(&self, other: &EnchantmentType) -> bool {
        if self == other {
            return true;
        }

        let exclusive_groups: [&[EnchantmentType]; 4] = [
            &[EnchantmentType::SilkTouch, EnchantmentType::Fortune],
            &[
                EnchantmentType::Sharpness,
                EnchantmentType::Smite,
                EnchantmentType::BaneOfArthropods,
            ],
            &[
                EnchantmentType::Protection,
                EnchantmentType::FireProtection,
                EnchantmentType::BlastProtection,
                EnchantmentType::ProjectileProtection,
            ],
            &[EnchantmentType::Infinity, EnchantmentType::Mending],
        ];

        !exclusive_groups
            .iter()
            .any(|group| group.contains(self) && group.contains(other))
    }
}

/// An enchantment with a specific level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    /// The type of enchantment
    pub enchantment_type: EnchantmentType,
    /// The level of the enchantment (1 to max_level)
    pub level: u8,
}

impl Enchantment {
    /// Create a new enchantment, clamping the level into `1..=max_level`.
    pub fn new(enchantment_type: EnchantmentType, level: u8) -> Self {
        let level = level.clamp(1, enchantment_type.max_level());
        Self {
            enchantment_type,
            level,
        }
    }
}

/// Immutable name -> enchantment type table.
///
/// Lookups are case-insensitive and accept either a bare path
/// (`sharpness`) or a namespaced key (`minecraft:sharpness`).
#[derive(Debug, Clone, Default)]
pub struct EnchantmentRegistry {
    by_key: BTreeMap<RegistryKey, EnchantmentType>,
}

impl EnchantmentRegistry {
    /// Table containing every built-in enchantment.
    pub fn vanilla() -> Self {
        Self::from_types(EnchantmentType::ALL)
    }

    /// Table containing only the given enchantments.
    pub fn from_types(types: impl IntoIterator<Item = EnchantmentType>) -> Self {
        let by_key = types.into_iter().map(|ty| (ty.key(), ty)).collect();
        Self { by_key }
    }

    /// Look up an enchantment by key.
    pub fn get(&self, key: &RegistryKey) -> Option<EnchantmentType> {
        self.by_key.get(key).copied()
    }

    /// Resolve a free-form name (case-normalized) to an enchantment type.
    pub fn resolve(&self, name: &str) -> Option<EnchantmentType> {
        let normalized = name.trim().to_ascii_lowercase().replace(' ', "_");
        let key = RegistryKey::parse(&normalized).ok()?;
        self.get(&key)
    }

    /// Number of registered enchantments.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true when no enchantments are registered.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_level() {
        assert_eq!(EnchantmentType::Efficiency.max_level(), 5);
        assert_eq!(EnchantmentType::SilkTouch.max_level(), 1);
        assert_eq!(EnchantmentType::Unbreaking.max_level(), 3);
        assert_eq!(EnchantmentType::AquaAffinity.max_level(), 1);
        assert_eq!(EnchantmentType::Thorns.max_level(), 3);
    }

    #[test]
    fn test_incompatible_enchantments() {
        assert!(!EnchantmentType::SilkTouch.is_compatible_with(&EnchantmentType::Fortune));
        assert!(!EnchantmentType::Fortune.is_compatible_with(&EnchantmentType::SilkTouch));
        assert!(!EnchantmentType::Protection.is_compatible_with(&EnchantmentType::FireProtection));
        assert!(!EnchantmentType::Sharpness.is_compatible_with(&EnchantmentType::Smite));
        assert!(!EnchantmentType::Infinity.is_compatible_with(&EnchantmentType::Mending));
    }

    #[test]
    fn test_compatible_enchantments() {
        assert!(EnchantmentType::Efficiency.is_compatible_with(&EnchantmentType::Unbreaking));
        assert!(EnchantmentType::Sharpness.is_compatible_with(&EnchantmentType::Knockback));
        assert!(EnchantmentType::Protection.is_compatible_with(&EnchantmentType::Protection));
    }

    #[test]
    fn test_enchantment_level_clamping() {
        let ench = Enchantment::new(EnchantmentType::SilkTouch, 10);
        assert_eq!(ench.level, 1);

        let ench = Enchantment::new(EnchantmentType::Efficiency, 3);
        assert_eq!(ench.level, 3);

        let ench = Enchantment::new(EnchantmentType::Efficiency, 0);
        assert_eq!(ench.level, 1);
    }

    #[test]
    fn all_keys_are_distinct() {
        let registry = EnchantmentRegistry::vanilla();
        assert_eq!(registry.len(), EnchantmentType::ALL.len());
    }

    #[test]
    fn resolve_is_case_normalized() {
        let registry = EnchantmentRegistry::vanilla();
        assert_eq!(registry.resolve("Sharpness"), Some(EnchantmentType::Sharpness));
        assert_eq!(
            registry.resolve("minecraft:FEATHER_FALLING"),
            Some(EnchantmentType::FeatherFalling)
        );
        assert_eq!(registry.resolve("Silk Touch"), Some(EnchantmentType::SilkTouch));
        assert_eq!(registry.resolve("no_enchantments"), None);
        assert_eq!(registry.resolve("othermod:sharpness"), None);
    }
}
