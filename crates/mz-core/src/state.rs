//! Aggregate player state passed through the rules engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::event::Event;
use crate::inventory::{DEFAULT_MAX_SLOTS, Inventory, InventoryItem};
use crate::stats::PlayerStats;
use crate::status::StatusEffects;

/// Everything the rules engine reads and writes about the player.
///
/// Treated as a value: engine operations take `&GameState` and return a new
/// one. `start_time` is bookkeeping only and never feeds a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StateRecord", into = "StateRecord")]
pub struct GameState {
    /// The four bounded stats.
    pub stats: PlayerStats,
    /// Active status effects.
    pub status_effects: StatusEffects,
    /// Held items.
    pub inventory: Inventory,
    /// Id of the event being shown, for UI hand-off.
    pub current_event_id: Option<String>,
    /// The event being shown. Transient; never persisted.
    pub current_event: Option<Event>,
    /// Turns elapsed. Only ever increases.
    pub turn_count: u32,
    /// When the run began.
    pub start_time: DateTime<Utc>,
}

fn default_slots() -> usize {
    DEFAULT_MAX_SLOTS
}

/// Save-layer shape. The slot count travels next to the item list so a
/// state built with a larger inventory loads back intact.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord {
    stats: PlayerStats,
    #[serde(default)]
    status_effects: StatusEffects,
    #[serde(default)]
    inventory: Vec<InventoryItem>,
    #[serde(default = "default_slots")]
    max_inventory_slots: usize,
    #[serde(default)]
    current_event_id: Option<String>,
    #[serde(default)]
    turn_count: u32,
    start_time: DateTime<Utc>,
}

impl TryFrom<StateRecord> for GameState {
    type Error = CoreError;

    fn try_from(record: StateRecord) -> CoreResult<Self> {
        Ok(Self {
            stats: record.stats,
            status_effects: record.status_effects,
            inventory: Inventory::from_items(record.inventory, record.max_inventory_slots)?,
            current_event_id: record.current_event_id,
            current_event: None,
            turn_count: record.turn_count,
            start_time: record.start_time,
        })
    }
}

impl From<GameState> for StateRecord {
    fn from(state: GameState) -> Self {
        Self {
            stats: state.stats,
            status_effects: state.status_effects,
            max_inventory_slots: state.inventory.max_slots(),
            inventory: state.inventory.into(),
            current_event_id: state.current_event_id,
            turn_count: state.turn_count,
            start_time: state.start_time,
        }
    }
}

impl GameState {
    /// Fresh state with default stats, no effects, and an empty inventory.
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            stats: PlayerStats::default(),
            status_effects: StatusEffects::new(),
            inventory: Inventory::new(),
            current_event_id: None,
            current_event: None,
            turn_count: 0,
            start_time,
        }
    }

    /// Fresh state stamped with the current wall-clock time.
    pub fn started_now() -> Self {
        Self::new(Utc::now())
    }

    /// Replace the stats.
    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.stats = stats;
        self
    }

    /// Replace the inventory.
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Replace the status effects.
    pub fn with_status_effects(mut self, status_effects: StatusEffects) -> Self {
        self.status_effects = status_effects;
        self
    }

    /// Hand an event to the UI.
    pub fn with_current_event(mut self, event: Event) -> Self {
        self.current_event_id = Some(event.id.clone());
        self.current_event = Some(event);
        self
    }

    /// Clear the UI hand-off fields.
    pub fn without_current_event(mut self) -> Self {
        self.current_event_id = None;
        self.current_event = None;
        self
    }

    /// The run is over once the player dies or loses their mind.
    pub fn is_game_over(&self) -> bool {
        !self.stats.is_alive() || !self.stats.is_sane()
    }

    /// Advance one turn: bump the counter and tick status durations.
    ///
    /// Returns the new state and the ids of effects that expired.
    pub fn process_turn(&self) -> (Self, Vec<String>) {
        let (status_effects, expired) = self.status_effects.tick();
        let next = Self {
            status_effects,
            turn_count: self.turn_count.saturating_add(1),
            ..self.clone()
        };
        (next, expired)
    }

    /// Plain-data form consumed by the save layer.
    pub fn to_map(&self) -> CoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild from the save layer's plain data.
    pub fn from_map(value: serde_json::Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
