//! Event selection from a room's available events.

use mz_core::{Choice, ChoiceEffects, Event, EventCatalog, Persistence, RoomEventData, StatKind};
use rand::Rng;
use tracing::debug;

use crate::config::SelectionMode;
use crate::error::{RulesError, RulesResult};

/// Id of the built-in event used when a room has nothing available.
pub const EMPTY_ROOM_EVENT_ID: &str = "empty_room";

/// The built-in rest event for rooms with no available events.
pub fn empty_room_event() -> Event {
    Event::new(
        EMPTY_ROOM_EVENT_ID,
        "Empty Room",
        "The room is quiet. Nothing here demands your attention.",
        "rest",
        Persistence::Persistent,
        vec![Choice::new(
            "Take a break",
            ChoiceEffects::new("You rest for a moment and gather your thoughts.")
                .with_stat(StatKind::Hp, 5)
                .with_stat(StatKind::San, 5)
                .with_stat(StatKind::Hunger, -5),
        )],
    )
}

/// Pick one event among candidate ids.
///
/// Returns `Ok(None)` for an empty candidate list. Every candidate must be in
/// the catalog; a missing id is a data inconsistency, never skipped. A
/// single candidate is returned without drawing from the RNG.
pub fn select_event<'a, R: Rng + ?Sized>(
    candidates: &[String],
    catalog: &'a EventCatalog,
    mode: SelectionMode,
    rng: &mut R,
) -> RulesResult<Option<&'a Event>> {
    let events = candidates
        .iter()
        .map(|id| catalog.get(id).ok_or_else(|| RulesError::EventNotFound(id.clone())))
        .collect::<RulesResult<Vec<_>>>()?;

    let picked = match events.len() {
        0 => None,
        1 => Some(events[0]),
        n => {
            let index = match mode {
                SelectionMode::Uniform => rng.random_range(0..n),
                SelectionMode::Weighted => weighted_index(&events, rng),
            };
            Some(events[index])
        }
    };
    if let Some(event) = picked {
        debug!(event = %event.id, candidates = candidates.len(), ?mode, "event selected");
    }
    Ok(picked)
}

fn weighted_index<R: Rng + ?Sized>(events: &[&Event], rng: &mut R) -> usize {
    let total: u64 = events.iter().map(|e| u64::from(e.weight)).sum();
    if total == 0 {
        return rng.random_range(0..events.len());
    }
    let mut roll = rng.random_range(0..total);
    for (index, event) in events.iter().enumerate() {
        let weight = u64::from(event.weight);
        if roll < weight {
            return index;
        }
        roll -= weight;
    }
    events.len() - 1
}

/// Pick the event a player meets on entering a room, falling back to
/// [`empty_room_event`] when nothing is available.
pub fn select_room_event<R: Rng + ?Sized>(
    room: &RoomEventData,
    catalog: &EventCatalog,
    mode: SelectionMode,
    rng: &mut R,
) -> RulesResult<Event> {
    match select_event(room.available_event_ids(), catalog, mode, rng)? {
        Some(event) => Ok(event.clone()),
        None => {
            debug!(room = room.room_id(), "no events available, resting");
            Ok(empty_room_event())
        }
    }
}
