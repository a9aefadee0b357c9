//! Error types for the room layer.

use std::fmt;

use cardroom_protocol::{CardId, PlayerId, RoomId};
use cardroom_zone::{StoreError, ZoneError};

/// Errors that can occur during room operations.
///
/// Every variant falls into one [`ErrorKind`], so callers can tell a
/// rejected move from an exhausted deck from a storage outage.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The room has no free seat.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already seated in a room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not seated in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The game in this room is already running.
    #[error("game in room {0} already started")]
    AlreadyStarted(RoomId),

    /// The game in this room is not running.
    #[error("game in room {0} has not started")]
    NotStarted(RoomId),

    #[error("room {room} needs {required} players to start, has {present}")]
    NotEnoughPlayers {
        room: RoomId,
        required: usize,
        present: usize,
    },

    /// Someone other than the current turn-holder tried to act.
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("card {card} is not in player {player}'s hand")]
    CardNotInHand { player: PlayerId, card: CardId },

    /// The requested room settings are unusable.
    #[error("invalid room settings: {0}")]
    InvalidSettings(String),

    /// Deck and discard pile are both empty.
    #[error("no card available in room {0}")]
    NoCardAvailable(RoomId),

    /// A card in play has no catalog definition.
    #[error("card {0} is missing from the catalog")]
    UnknownCard(CardId),

    /// The backing store failed; nothing from this operation was kept.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The zone model was violated.
    #[error("zone invariant violated: {0}")]
    Invariant(#[from] ZoneError),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

/// The failure classes of room operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The move was not allowed; no state changed.
    Precondition,
    /// No card could be drawn; no state changed.
    Exhausted,
    /// Storage rejected or failed the operation.
    Persistence,
    /// A programming defect corrupted game state.
    Invariant,
    /// The room actor is gone or overloaded.
    Unavailable,
}

impl GameError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound(_)
            | Self::RoomFull(_)
            | Self::AlreadyInRoom(..)
            | Self::NotInRoom(..)
            | Self::AlreadyStarted(_)
            | Self::NotStarted(_)
            | Self::NotEnoughPlayers { .. }
            | Self::NotYourTurn(_)
            | Self::CardNotInHand { .. }
            | Self::InvalidSettings(_) => ErrorKind::Precondition,
            Self::NoCardAvailable(_) => ErrorKind::Exhausted,
            Self::Store(StoreError::Corrupt(_)) => ErrorKind::Invariant,
            Self::Store(_) => ErrorKind::Persistence,
            Self::Invariant(_) | Self::UnknownCard(_) => ErrorKind::Invariant,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition => write!(f, "precondition"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Persistence => write!(f, "persistence"),
            Self::Invariant => write!(f, "invariant"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// A notification could not be handed to the transport.
///
/// Never rolls back the state change that produced the notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("observer registry lock poisoned")]
    Poisoned,

    #[error("delivery to room {0} failed: {1}")]
    Delivery(RoomId, String),
}
