//! Core types for the maze adventure: player state, events, and room ledgers.
//!
//! Everything here is a value type. Operations that "change" state return a
//! new value and leave the receiver untouched, so a [`GameState`] or
//! [`RoomEventData`] can be reused freely across retries and sessions.

pub mod catalog;
pub mod condition;
pub mod error;
pub mod event;
pub mod inventory;
pub mod room;
pub mod state;
pub mod stats;
pub mod status;

pub use catalog::EventCatalog;
pub use condition::{CompareOp, Condition};
pub use error::{CoreError, CoreResult};
pub use event::{Choice, ChoiceEffects, Event, Persistence, parse_stat_changes};
pub use inventory::{Inventory, InventoryItem};
pub use room::{RoomEventData, RoomEventState};
pub use state::GameState;
pub use stats::{ClampBound, PlayerStats, StatChange, StatKind};
pub use status::{StatusEffect, StatusEffects, StatusKind};
