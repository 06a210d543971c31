//! Rules engine for the maze adventure.
//!
//! Checks whether a choice may be taken, rolls its success conditions,
//! resolves the chosen effects against the player's state, consumes one-time
//! events from their room, and selects the next event a player meets.

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod requirements;
pub mod resolver;
pub mod selector;
pub mod success;

pub use config::{EngineConfig, ItemTable, SelectionMode, StatusTable};
pub use engine::RulesEngine;
pub use error::{ErrorKind, RulesError, RulesResult};
pub use pipeline::{ChoiceOutcome, available_choices, process_choice_selection};
pub use requirements::{RequirementCheck, UnmetStat, check_requirements};
pub use resolver::{EffectsApplied, Resolution, resolve_effects, use_item};
pub use selector::{EMPTY_ROOM_EVENT_ID, empty_room_event, select_event, select_room_event};
pub use success::evaluate_success;
