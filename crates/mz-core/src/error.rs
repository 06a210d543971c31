//! Error types for the maze data model.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing or mutating game state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A stat name did not resolve to any known stat, even through aliases.
    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// One payload names the same stat under two spellings.
    #[error("stat {stat} given twice, as {first} and {second}")]
    DuplicateStat {
        /// The stat both names resolve to.
        stat: crate::stats::StatKind,
        /// The first spelling seen.
        first: String,
        /// The conflicting spelling.
        second: String,
    },

    /// A comparison operator is not one of `>`, `>=`, `==`, `<`, `<=`.
    #[error("unknown comparison operator: {0}")]
    UnknownOperator(String),

    /// A probability lies outside the closed interval [0, 1].
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// A persistence mode is not `oneTime` or `persistent`.
    #[error("unknown persistence mode: {0}")]
    UnknownPersistence(String),

    /// An event violates one of its structural invariants.
    #[error("invalid event \"{id}\": {reason}")]
    InvalidEvent {
        /// The offending event id (may be empty).
        id: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// The inventory has no free slot for a new item id.
    #[error("inventory full - could not add {0}")]
    InventoryFull(String),

    /// The inventory does not hold the requested item.
    #[error("item {0} not found in inventory")]
    ItemNotFound(String),

    /// An inventory item was given a zero quantity.
    #[error("item {0} must have a quantity of at least 1")]
    ZeroQuantity(String),

    /// A non-trap event was assigned to a room already occupied by a trap.
    #[error("room {room} is occupied by a trap; cannot assign {event}")]
    RoomOccupiedByTrap {
        /// The room identifier.
        room: String,
        /// The rejected event id.
        event: String,
    },

    /// Serialized state could not be converted back into a value.
    #[error("malformed state: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
