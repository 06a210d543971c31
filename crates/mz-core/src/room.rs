//! Per-room event ledger.
//!
//! Each event id tracked by a room is either available or consumed; ids the
//! room has never seen (or has forgotten) are absent:
//!
//! ```text
//! Absent --add--> Available --consume--> Consumed --restore--> Available
//!   ^                                                              |
//!   +------------------------ remove_completely -------------------+
//! ```
//!
//! Every operation returns a new ledger; prior values are never modified.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Where a single event id stands within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomEventState {
    /// Can be encountered.
    Available,
    /// Already resolved.
    Consumed,
    /// Not tracked by the room.
    Absent,
}

/// Which events a room holds and which have been used up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoomRecord", into = "RoomRecord")]
pub struct RoomEventData {
    room_id: String,
    available: Vec<String>,
    consumed: Vec<String>,
    has_trap_event: bool,
}

impl RoomEventData {
    /// An empty ledger for a room.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            available: Vec::new(),
            consumed: Vec::new(),
            has_trap_event: false,
        }
    }

    /// Start tracking an event as available.
    ///
    /// Ids already available or consumed are left where they are; use
    /// [`RoomEventData::restore_event`] to bring back a consumed one. The
    /// trap flag is sticky and only ever turns on.
    pub fn add_event(&self, event_id: &str, is_trap: bool) -> Self {
        let mut next = self.clone();
        next.has_trap_event |= is_trap;
        if !self.is_tracked(event_id) {
            next.available.push(event_id.to_string());
        }
        next
    }

    /// Like [`RoomEventData::add_event`] but refuses to put a non-trap event
    /// into a room a trap already occupies.
    pub fn assign_event(&self, event_id: &str, is_trap: bool) -> CoreResult<Self> {
        if !is_trap && !self.is_available_for_events() {
            return Err(CoreError::RoomOccupiedByTrap {
                room: self.room_id.clone(),
                event: event_id.to_string(),
            });
        }
        Ok(self.add_event(event_id, is_trap))
    }

    /// Move an event from available to consumed. No-op unless available.
    pub fn consume_event(&self, event_id: &str) -> Self {
        let mut next = self.clone();
        if remove_id(&mut next.available, event_id) && !next.consumed.iter().any(|id| id == event_id)
        {
            next.consumed.push(event_id.to_string());
        }
        next
    }

    /// Move an event from consumed back to available. No-op unless consumed.
    pub fn restore_event(&self, event_id: &str) -> Self {
        let mut next = self.clone();
        if remove_id(&mut next.consumed, event_id)
            && !next.available.iter().any(|id| id == event_id)
        {
            next.available.push(event_id.to_string());
        }
        next
    }

    /// Forget an event entirely.
    pub fn remove_event_completely(&self, event_id: &str) -> Self {
        let mut next = self.clone();
        remove_id(&mut next.available, event_id);
        remove_id(&mut next.consumed, event_id);
        next
    }

    /// Where an event id stands in this room.
    pub fn state_of(&self, event_id: &str) -> RoomEventState {
        if self.available.iter().any(|id| id == event_id) {
            RoomEventState::Available
        } else if self.consumed.iter().any(|id| id == event_id) {
            RoomEventState::Consumed
        } else {
            RoomEventState::Absent
        }
    }

    /// True if the event can currently be encountered here.
    pub fn is_available(&self, event_id: &str) -> bool {
        self.state_of(event_id) == RoomEventState::Available
    }

    /// True if the event has been consumed here.
    pub fn is_consumed(&self, event_id: &str) -> bool {
        self.state_of(event_id) == RoomEventState::Consumed
    }

    fn is_tracked(&self, event_id: &str) -> bool {
        self.state_of(event_id) != RoomEventState::Absent
    }

    /// A room holding a trap accepts no other events.
    pub fn is_available_for_events(&self) -> bool {
        !self.has_trap_event
    }

    /// Room identifier.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Available event ids in insertion order.
    pub fn available_event_ids(&self) -> &[String] {
        &self.available
    }

    /// Consumed event ids in consumption order.
    pub fn consumed_event_ids(&self) -> &[String] {
        &self.consumed
    }

    /// Whether a trap was ever added.
    pub fn has_trap_event(&self) -> bool {
        self.has_trap_event
    }

    /// Number of available events.
    pub fn event_count(&self) -> usize {
        self.available.len()
    }

    /// True if at least one event is available.
    pub fn has_available_events(&self) -> bool {
        !self.available.is_empty()
    }
}

fn remove_id(ids: &mut Vec<String>, event_id: &str) -> bool {
    let before = ids.len();
    ids.retain(|id| id != event_id);
    ids.len() < before
}

/// Save-layer shape. `eventCount` is written for readers but recomputed on load.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomRecord {
    room_id: String,
    #[serde(default)]
    available_event_ids: Vec<String>,
    #[serde(default)]
    consumed_event_ids: Vec<String>,
    #[serde(default)]
    has_trap_event: bool,
    #[serde(default)]
    event_count: usize,
}

impl From<RoomRecord> for RoomEventData {
    fn from(r: RoomRecord) -> Self {
        let mut available: Vec<String> = Vec::new();
        for id in r.available_event_ids {
            if !available.contains(&id) {
                available.push(id);
            }
        }
        let mut consumed: Vec<String> = Vec::new();
        for id in r.consumed_event_ids {
            if !available.contains(&id) && !consumed.contains(&id) {
                consumed.push(id);
            }
        }
        Self {
            room_id: r.room_id,
            available,
            consumed,
            has_trap_event: r.has_trap_event,
        }
    }
}

impl From<RoomEventData> for RoomRecord {
    fn from(room: RoomEventData) -> Self {
        Self {
            event_count: room.available.len(),
            room_id: room.room_id,
            available_event_ids: room.available,
            consumed_event_ids: room.consumed,
            has_trap_event: room.has_trap_event,
        }
    }
}
