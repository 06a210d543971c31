//! A seeded rules session.
//!
//! `RulesEngine` owns the configuration and the random source so callers do
//! not thread an RNG through every call. Two engines built from the same
//! config replay the same rolls and selections.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use mz_core::{Event, EventCatalog, GameState, RoomEventData};

use crate::config::EngineConfig;
use crate::error::RulesResult;
use crate::pipeline::{ChoiceOutcome, available_choices, process_choice_selection};
use crate::requirements::RequirementCheck;
use crate::resolver::{Resolution, use_item};
use crate::selector::select_room_event;

/// Configured rules engine with its own seeded RNG.
pub struct RulesEngine {
    config: EngineConfig,
    rng: StdRng,
}

impl RulesEngine {
    /// Create an engine seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh game state using the configured inventory size.
    pub fn new_game(&self, start_time: DateTime<Utc>) -> GameState {
        self.config.new_game(start_time)
    }

    /// Pick the event the player meets on entering `room`.
    pub fn select_event(&mut self, room: &RoomEventData, catalog: &EventCatalog) -> RulesResult<Event> {
        select_room_event(room, catalog, self.config.selection, &mut self.rng)
    }

    /// Run the choice pipeline for `choice_index` on `event`.
    pub fn process_choice(
        &mut self,
        event: &Event,
        choice_index: usize,
        state: &GameState,
        room: &RoomEventData,
    ) -> RulesResult<ChoiceOutcome> {
        process_choice_selection(event, choice_index, state, room, &self.config, &mut self.rng)
    }

    /// Requirement checks for every choice on `event`.
    pub fn available_choices(&self, event: &Event, state: &GameState) -> RulesResult<Vec<RequirementCheck>> {
        available_choices(event, state)
    }

    /// Use an item from the inventory.
    pub fn use_item(&self, state: &GameState, item_id: &str) -> RulesResult<Resolution> {
        use_item(state, item_id, &self.config)
    }

    /// Advance statuses by one turn, returning the new state and expired ids.
    pub fn process_turn(&self, state: &GameState) -> (GameState, Vec<String>) {
        state.process_turn()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_core::{Choice, ChoiceEffects, CompareOp, Condition, Persistence, StatKind};

    fn coin_flip() -> Event {
        Event::new(
            "shrine",
            "Shrine",
            "A flickering candle on a stone altar.",
            "mystery",
            Persistence::Persistent,
            vec![
                Choice::new("Pray", ChoiceEffects::new("Warmth fills you.").with_stat(StatKind::San, 10))
                    .with_success_conditions(Condition::Probability(0.5))
                    .with_failure(ChoiceEffects::new("Silence.").with_stat(StatKind::San, -10)),
                Choice::new("Leave", ChoiceEffects::new("You move on."))
                    .with_requirements(Condition::stat(StatKind::Hp, CompareOp::Gt, 0)),
            ],
        )
    }

    fn rolls(seed: u64) -> Vec<bool> {
        let mut engine = RulesEngine::new(EngineConfig::default().with_seed(seed));
        let state = engine.new_game(Utc::now());
        let room = RoomEventData::new("r").add_event("shrine", false);
        (0..16)
            .map(|_| engine.process_choice(&coin_flip(), 0, &state, &room).unwrap().success)
            .collect()
    }

    #[test]
    fn same_seed_same_rolls() {
        assert_eq!(rolls(5), rolls(5));
    }

    #[test]
    fn rolls_are_mixed() {
        let outcomes = rolls(42);
        assert!(outcomes.iter().any(|s| *s));
        assert!(outcomes.iter().any(|s| !*s));
    }

    #[test]
    fn new_game_uses_configured_slots() {
        let engine = RulesEngine::new(EngineConfig::default().with_inventory_slots(8));
        assert_eq!(engine.new_game(Utc::now()).inventory.max_slots(), 8);
    }

    #[test]
    fn select_event_draws_from_catalog() {
        let mut engine = RulesEngine::default();
        let catalog: EventCatalog = [coin_flip()].into_iter().collect();
        let room = RoomEventData::new("r").add_event("shrine", false);
        assert_eq!(engine.select_event(&room, &catalog).unwrap().id, "shrine");
    }

    #[test]
    fn available_choices_checks_all() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Utc::now());
        let checks = engine.available_choices(&coin_flip(), &state).unwrap();
        assert!(checks.iter().all(|c| c.available));
    }
}
