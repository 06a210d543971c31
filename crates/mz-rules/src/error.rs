//! Error types for the rules engine.

use mz_core::CoreError;

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Broad class of a fatal rules error, for callers that branch UI messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed something malformed: a bad index, operator, or
    /// condition structure.
    InvalidArgument,
    /// The input was well-formed but the game state does not allow it.
    PreconditionFailed,
    /// Two trusted sources disagree, e.g. a room names an event the catalog
    /// does not hold.
    DataInconsistency,
}

/// Errors that abort a rules operation.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The selected choice index does not exist on the event.
    #[error("choice index {index} out of range for event \"{event}\" ({len} choices)")]
    ChoiceOutOfRange {
        /// Event id.
        event: String,
        /// Requested index.
        index: usize,
        /// Number of choices on the event.
        len: usize,
    },

    /// A malformed argument or condition structure.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A choice was processed although its requirements do not hold.
    #[error("requirements not met for \"{choice}\": {}", .reasons.join("; "))]
    RequirementsNotMet {
        /// Choice text.
        choice: String,
        /// One human-readable reason per failed requirement.
        reasons: Vec<String>,
    },

    /// The player tried to use an item they do not hold.
    #[error("item {0} is not in the inventory")]
    ItemNotHeld(String),

    /// The item has no use effect.
    #[error("item {0} cannot be used")]
    ItemNotUsable(String),

    /// A room referenced an event id that the catalog does not contain.
    #[error("event not found in catalog: {0}")]
    EventNotFound(String),

    /// A configuration table could not be parsed.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An error from the data model.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RulesError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChoiceOutOfRange { .. } | Self::InvalidArgument(_) | Self::InvalidConfig(_) => {
                ErrorKind::InvalidArgument
            }
            Self::RequirementsNotMet { .. } | Self::ItemNotHeld(_) | Self::ItemNotUsable(_) => {
                ErrorKind::PreconditionFailed
            }
            Self::EventNotFound(_) => ErrorKind::DataInconsistency,
            Self::Core(err) => match err {
                CoreError::InvalidEvent { .. } | CoreError::Malformed(_) => {
                    ErrorKind::DataInconsistency
                }
                CoreError::InventoryFull(_)
                | CoreError::ItemNotFound(_)
                | CoreError::RoomOccupiedByTrap { .. } => ErrorKind::PreconditionFailed,
                CoreError::UnknownStat(_)
                | CoreError::DuplicateStat { .. }
                | CoreError::UnknownOperator(_)
                | CoreError::InvalidProbability(_)
                | CoreError::UnknownPersistence(_)
                | CoreError::ZeroQuantity(_) => ErrorKind::InvalidArgument,
            },
        }
    }
}
