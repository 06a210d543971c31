//! End-to-end scenarios: authored events through selection, choice, and save.

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use mz_core::{
    ChoiceEffects, Event, EventCatalog, GameState, Inventory, InventoryItem, PlayerStats, RoomEventData,
    RoomEventState, StatKind,
};
use mz_rules::{
    EMPTY_ROOM_EVENT_ID, EngineConfig, ErrorKind, RulesEngine, RulesError, process_choice_selection,
    resolve_effects,
};

fn start() -> GameState {
    GameState::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

/// Events as they arrive from authoring JSON.
fn catalog() -> EventCatalog {
    let events: Vec<Event> = serde_json::from_value(json!([
        {
            "id": "old_chest",
            "name": "Old Chest",
            "description": "A chest bound in rusted iron.",
            "image": "chest.png",
            "category": "item",
            "persistence": "oneTime",
            "choices": [
                {
                    "text": "Pry it open",
                    "requirements": {"items": ["crowbar"]},
                    "successEffects": {
                        "description": "Inside lies a bandage.",
                        "itemsGained": ["bandage"]
                    }
                },
                {
                    "text": "Leave it",
                    "successEffects": {"description": "You leave the chest alone."}
                }
            ]
        },
        {
            "id": "whispering_wall",
            "name": "Whispering Wall",
            "description": "Voices murmur from the stones.",
            "image": "wall.png",
            "category": "mystery",
            "persistence": "persistent",
            "choices": [
                {
                    "text": "Listen closely",
                    "requirements": {"stats": {"SANITY": {"operator": ">=", "value": 30}}},
                    "successConditions": {"probability": 0.9},
                    "successEffects": {
                        "description": "You learn a secret.",
                        "statChanges": {"SAN": 5},
                        "applyStatus": ["focused"]
                    },
                    "failureEffects": {
                        "description": "The voices claw at your mind.",
                        "statChanges": {"SAN": -15},
                        "applyStatus": ["curse"]
                    }
                }
            ]
        },
        {
            "id": "rare_find",
            "name": "Glinting Coin",
            "description": "Something shines in the dust.",
            "image": "coin.png",
            "category": "item",
            "persistence": "oneTime",
            "choices": [
                {
                    "text": "Pick it up",
                    "successConditions": {"probability": 0.1},
                    "successEffects": {"description": "A gold coin.", "itemsGained": ["gold_coin"]},
                    "failureEffects": {"description": "Just a pebble."}
                }
            ]
        }
    ]))
    .unwrap();
    events.into_iter().collect()
}

#[test]
fn heal_with_clamp() {
    let state = start().with_stats(PlayerStats::new(50, 60, 70, 80));
    let effects: ChoiceEffects = serde_json::from_value(json!({
        "description": "A surge of strange energy.",
        "statChanges": {"HP": 200, "SAN": -200}
    }))
    .unwrap();

    let r = resolve_effects(&effects, &state, &EngineConfig::default());

    assert_eq!(r.state.stats.hp(), 100);
    assert_eq!(r.state.stats.san(), 0);
    assert_eq!(r.state.stats.fit(), 70);
    assert_eq!(r.state.stats.hunger(), 80);
    assert_eq!(r.applied.stat_changes[&StatKind::Hp].actual, 50);
    assert_eq!(r.applied.stat_changes[&StatKind::San].actual, -60);
    assert_eq!(r.applied.stat_changes[&StatKind::San].requested, -200);
    assert!(r.applied.warnings.iter().any(|w| w == "HP clamped to maximum (100)"));
    assert!(r.applied.warnings.iter().any(|w| w == "SAN clamped to minimum (0)"));
}

#[test]
fn full_inventory_rejects_new_item() {
    let inventory = ["rope", "torch", "ration", "key", "map"]
        .into_iter()
        .fold(Inventory::new(), |inv, id| inv.add_item(InventoryItem::new(id, id)).unwrap());
    let state = start().with_inventory(inventory);
    let effects = ChoiceEffects::new("You find something.").gain("extra_item");

    let r = resolve_effects(&effects, &state, &EngineConfig::default());

    assert_eq!(r.state.inventory.len(), 5);
    assert!(!r.state.inventory.has_item("extra_item"));
    assert!(r.applied.items_gained.is_empty());
    assert!(
        r.applied
            .warnings
            .contains(&"Inventory full - could not add extra_item".to_string())
    );
}

#[test]
fn one_time_event_leaves_the_room() {
    let catalog = catalog();
    let chest = catalog.get("old_chest").unwrap();
    let room = RoomEventData::new("cellar").add_event("old_chest", false);
    let mut rng = StdRng::seed_from_u64(1);

    let outcome =
        process_choice_selection(chest, 1, &start(), &room, &EngineConfig::default(), &mut rng).unwrap();

    let ledger = &outcome.room_event_data;
    assert!(!ledger.available_event_ids().contains(&"old_chest".to_string()));
    assert!(ledger.consumed_event_ids().contains(&"old_chest".to_string()));
    assert!(!ledger.has_available_events());
}

#[test]
fn persistent_event_remains_available() {
    let catalog = catalog();
    let wall = catalog.get("whispering_wall").unwrap();
    let room = RoomEventData::new("hall").add_event("whispering_wall", false);
    let mut rng = StdRng::seed_from_u64(1);

    let outcome =
        process_choice_selection(wall, 0, &start(), &room, &EngineConfig::default(), &mut rng).unwrap();

    assert_eq!(outcome.room_event_data.state_of("whispering_wall"), RoomEventState::Available);
    let status = if outcome.success { "focused" } else { "curse" };
    assert!(outcome.game_state.status_effects.contains(status));
}

#[test]
fn probability_success_distribution() {
    let catalog = catalog();
    let likely = catalog.get("whispering_wall").unwrap();
    let unlikely = catalog.get("rare_find").unwrap();
    let room = RoomEventData::new("r");
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(42);

    let mut count = |event: &Event| {
        (0..100)
            .filter(|_| {
                process_choice_selection(event, 0, &start(), &room, &config, &mut rng)
                    .unwrap()
                    .success
            })
            .count()
    };
    let high = count(likely);
    let low = count(unlikely);
    assert!(high > 70, "p=0.9 succeeded {high} times");
    assert!(low < 30, "p=0.1 succeeded {low} times");
}

#[test]
fn room_lifecycle_round_trip() {
    let added = RoomEventData::new("room").add_event("old_chest", false);
    let restored = added.consume_event("old_chest").restore_event("old_chest");

    assert!(restored.is_available("old_chest"));
    assert!(!restored.is_consumed("old_chest"));
    assert_eq!(restored.available_event_ids(), added.available_event_ids());
}

#[test]
fn missing_item_blocks_choice() {
    let catalog = catalog();
    let chest = catalog.get("old_chest").unwrap();
    let room = RoomEventData::new("cellar").add_event("old_chest", false);
    let mut rng = StdRng::seed_from_u64(1);

    let err = process_choice_selection(chest, 0, &start(), &room, &EngineConfig::default(), &mut rng)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    match err {
        RulesError::RequirementsNotMet { reasons, .. } => {
            assert_eq!(reasons, vec!["Missing required item: crowbar".to_string()]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn held_item_unlocks_choice() {
    let catalog = catalog();
    let chest = catalog.get("old_chest").unwrap();
    let room = RoomEventData::new("cellar").add_event("old_chest", false);
    let state = start().with_inventory(
        Inventory::new()
            .add_item(InventoryItem::new("crowbar", "Crowbar"))
            .unwrap(),
    );
    let mut rng = StdRng::seed_from_u64(1);

    let outcome =
        process_choice_selection(chest, 0, &state, &room, &EngineConfig::default(), &mut rng).unwrap();

    assert!(outcome.game_state.inventory.has_item("bandage"));
    assert!(outcome.game_state.inventory.has_item("crowbar"));
    assert_eq!(outcome.effects_applied.items_gained, vec!["bandage".to_string()]);
}

#[test]
fn out_of_range_choice_is_invalid_argument() {
    let catalog = catalog();
    let wall = catalog.get("whispering_wall").unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let err = process_choice_selection(
        wall,
        5,
        &start(),
        &RoomEventData::new("hall"),
        &EngineConfig::default(),
        &mut rng,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn room_naming_unknown_event_is_inconsistent() {
    let mut engine = RulesEngine::default();
    let room = RoomEventData::new("attic").add_event("vanished", false);

    let err = engine.select_event(&room, &catalog()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DataInconsistency);
}

#[test]
fn exhausted_room_offers_rest() {
    let catalog = catalog();
    let mut engine = RulesEngine::default();
    let state = engine.new_game(Utc::now()).with_stats(PlayerStats::new(50, 50, 50, 50));
    let room = RoomEventData::new("cellar")
        .add_event("old_chest", false)
        .consume_event("old_chest");

    let event = engine.select_event(&room, &catalog).unwrap();
    assert_eq!(event.id, EMPTY_ROOM_EVENT_ID);

    let outcome = engine.process_choice(&event, 0, &state, &room).unwrap();
    assert_eq!(outcome.game_state.stats.hp(), 55);
    assert_eq!(outcome.game_state.stats.san(), 55);
    assert_eq!(outcome.game_state.stats.hunger(), 45);
    assert_eq!(outcome.room_event_data, room);
}

#[test]
fn trap_room_refuses_other_events() {
    let room = RoomEventData::new("pit").assign_event("spike_trap", true).unwrap();

    let err = room.assign_event("old_chest", false).unwrap_err();

    assert_eq!(RulesError::from(err).kind(), ErrorKind::PreconditionFailed);
    assert!(room.has_trap_event());
    assert!(!room.is_available_for_events());
}

#[test]
fn item_use_and_status_ticks() {
    let engine = RulesEngine::default();
    let state = start()
        .with_stats(PlayerStats::new(40, 80, 70, 80))
        .with_inventory(
            Inventory::new()
                .add_item(InventoryItem::new("bandage", "Bandage").with_quantity(2))
                .unwrap(),
        );
    let poisoned = resolve_effects(
        &ChoiceEffects::new("A needle pricks you.").with_status("poison"),
        &state,
        engine.config(),
    )
    .state;

    let used = engine.use_item(&poisoned, "bandage").unwrap();
    assert_eq!(used.state.stats.hp(), 55);
    assert_eq!(used.state.inventory.quantity_of("bandage"), 1);
    assert!(used.state.status_effects.contains("poison"));

    let (mut ticked, mut expired) = engine.process_turn(&used.state);
    while expired.is_empty() {
        (ticked, expired) = engine.process_turn(&ticked);
    }
    assert_eq!(expired, vec!["poison".to_string()]);
    assert!(ticked.status_effects.is_empty());
}

#[test]
fn state_survives_a_map_round_trip() {
    let catalog = catalog();
    let wall = catalog.get("whispering_wall").unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = process_choice_selection(
        wall,
        0,
        &start(),
        &RoomEventData::new("hall").add_event("whispering_wall", false),
        &EngineConfig::default(),
        &mut rng,
    )
    .unwrap();

    let map = outcome.game_state.to_map().unwrap();
    let restored = GameState::from_map(map).unwrap();

    assert_eq!(restored.stats, outcome.game_state.stats);
    assert_eq!(restored.status_effects, outcome.game_state.status_effects);
    assert_eq!(restored.turn_count, outcome.game_state.turn_count);
}

#[test]
fn larger_inventory_game_reloads() {
    let engine = RulesEngine::new(EngineConfig::default().with_inventory_slots(8));
    let base = engine.new_game(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let gains = (0..6).fold(ChoiceEffects::new("A hoard of trinkets."), |fx, n| {
        fx.gain(format!("trinket_{n}"))
    });
    let state = resolve_effects(&gains, &base, engine.config()).state;
    assert_eq!(state.inventory.len(), 6);

    let map = state.to_map().unwrap();
    assert_eq!(map["maxInventorySlots"], 8);
    let restored = GameState::from_map(map).unwrap();

    assert_eq!(restored.inventory.len(), 6);
    assert_eq!(restored.inventory.max_slots(), 8);
    assert_eq!(restored, state);
}
