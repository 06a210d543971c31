//! The choice pipeline: validate, check, roll, resolve, consume.

use mz_core::{Event, GameState, RoomEventData};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{RulesError, RulesResult};
use crate::requirements::{RequirementCheck, check_requirements};
use crate::resolver::{EffectsApplied, resolve_effects};
use crate::success::evaluate_success;

/// Everything a caller needs after a choice is processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOutcome {
    /// State after the effects were applied.
    pub game_state: GameState,
    /// Room tracking after consumption, if any.
    pub room_event_data: RoomEventData,
    /// Narrative text of the effects that ran.
    pub description: String,
    /// Whether the success conditions held.
    pub success: bool,
    /// What the resolution actually did.
    pub effects_applied: EffectsApplied,
    /// Text of the chosen choice.
    pub choice_text: String,
}

/// Process the player's choice on an event.
///
/// Fails without touching the inputs when the event is invalid, the index is
/// out of range or the choice's requirements do not hold. Otherwise the
/// success roll picks the payload (failure effects fall back to the success
/// effects when the choice declares none), the payload resolves, and a
/// one-time event is consumed from the room.
pub fn process_choice_selection<R: Rng + ?Sized>(
    event: &Event,
    choice_index: usize,
    state: &GameState,
    room: &RoomEventData,
    config: &EngineConfig,
    rng: &mut R,
) -> RulesResult<ChoiceOutcome> {
    event.validate()?;
    let choice = event
        .choices
        .get(choice_index)
        .ok_or_else(|| RulesError::ChoiceOutOfRange {
            event: event.id.clone(),
            index: choice_index,
            len: event.choices.len(),
        })?;

    let check = check_requirements(choice.requirements.as_ref(), state)?;
    if !check.available {
        debug!(event = %event.id, choice = %choice.text, reasons = ?check.reasons, "requirements not met");
        return Err(RulesError::RequirementsNotMet {
            choice: choice.text.clone(),
            reasons: check.reasons,
        });
    }

    let success = evaluate_success(choice.success_conditions.as_ref(), state, rng)?;
    let effects = if success {
        &choice.success_effects
    } else {
        choice.failure_effects.as_ref().unwrap_or(&choice.success_effects)
    };
    let resolution = resolve_effects(effects, state, config);

    let room_event_data = if event.is_one_time() {
        room.consume_event(&event.id)
    } else {
        room.clone()
    };

    debug!(
        event = %event.id,
        choice = choice_index,
        success,
        turn = resolution.state.turn_count,
        consumed = event.is_one_time(),
        "choice processed"
    );
    Ok(ChoiceOutcome {
        game_state: resolution.state,
        room_event_data,
        description: effects.description.clone(),
        success,
        effects_applied: resolution.applied,
        choice_text: choice.text.clone(),
    })
}

/// Requirement checks for every choice on an event, in choice order.
pub fn available_choices(event: &Event, state: &GameState) -> RulesResult<Vec<RequirementCheck>> {
    event
        .choices
        .iter()
        .map(|choice| check_requirements(choice.requirements.as_ref(), state))
        .collect()
}
