use equipsave::{init_logging, EquipSavePlugin, PluginConfig};
use equipsave_core::{EnchantmentRegistry, EnchantmentType, InventoryView, ItemRegistry, PlayerHandle, Registries};
use equipsave_server::{JoinOutcome, QuitOutcome};
use equipsave_testkit::{enchanted_sword, iron_helmet, stack_of, temp_data_root, TestPlayer};
use std::sync::Arc;

fn config_at(root: &std::path::Path) -> PluginConfig {
    PluginConfig {
        data_root: root.to_path_buf(),
        ..PluginConfig::default()
    }
}

#[test]
fn enable_join_quit_disable() {
    init_logging("warn");
    let root = temp_data_root().expect("scratch dir");
    let mut plugin = EquipSavePlugin::new(config_at(root.path()));

    plugin.on_enable().expect("enable");
    assert!(plugin.is_enabled());
    assert!(root.path().join("Inventory").is_dir());

    let mut alex = TestPlayer::new("Alex");
    assert!(matches!(
        plugin.on_player_join(&mut alex),
        Some(JoinOutcome::NoRecord)
    ));
    alex.main.set(8, Some(enchanted_sword()));
    alex.armor_inv.set(0, Some(iron_helmet()));
    assert!(matches!(
        plugin.on_player_quit(&alex),
        Some(QuitOutcome::Saved(_))
    ));

    let mut steve = TestPlayer::new("Steve");
    steve.main.set(0, Some(stack_of("oak_planks", 64)));
    let online: [&dyn PlayerHandle; 1] = [&steve];
    let report = plugin.on_disable(online).expect("was enabled");
    assert_eq!(report.saved, 1);
    assert!(!plugin.is_enabled());

    // Restart: both players come back with their gear.
    let mut plugin = EquipSavePlugin::new(config_at(root.path()));
    plugin.on_enable().expect("re-enable");

    let mut alex_again = TestPlayer::new("Alex");
    plugin.on_player_join(&mut alex_again);
    assert_eq!(alex_again, alex);

    let mut steve_again = TestPlayer::new("Steve");
    plugin.on_player_join(&mut steve_again);
    assert_eq!(steve_again, steve);
}

#[test]
fn events_before_enable_are_ignored() {
    let root = temp_data_root().expect("scratch dir");
    let mut plugin = EquipSavePlugin::new(config_at(root.path()));

    let mut alex = TestPlayer::equipped("Alex");
    assert!(plugin.on_player_join(&mut alex).is_none());
    assert!(plugin.on_player_quit(&alex).is_none());
    assert!(plugin.on_disable(std::iter::empty()).is_none());
    assert!(!root.path().join("Inventory").exists());
}

#[test]
fn injected_registries_reject_unknown_enchantments() {
    let root = temp_data_root().expect("scratch dir");

    // Save with the full vanilla tables.
    let mut plugin = EquipSavePlugin::new(config_at(root.path()));
    plugin.on_enable().expect("enable");
    let player = TestPlayer::equipped("Alex");
    plugin.on_player_quit(&player);

    // Reload on a host that only knows Unbreaking.
    let registries = Arc::new(Registries::new(
        ItemRegistry::vanilla(),
        EnchantmentRegistry::from_types([EnchantmentType::Unbreaking]),
    ));
    let mut restricted = EquipSavePlugin::with_registries(config_at(root.path()), registries);
    restricted.on_enable().expect("enable");

    let mut alex = TestPlayer::new("Alex");
    alex.main.set(4, Some(stack_of("apple", 3)));
    let before = alex.clone();
    match restricted.on_player_join(&mut alex) {
        Some(JoinOutcome::Failed(err)) => assert!(err.is_malformed(), "{err}"),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(alex, before);
}
