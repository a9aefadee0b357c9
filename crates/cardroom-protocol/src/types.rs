//! Core identifier and notification types.
//!
//! Everything here is plain data: cheap to copy, serializable, and
//! printable. Rooms, players, cards and matches all get their own newtype
//! so the compiler catches mixed-up arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Stable across rooms: it is derived from the player's account, so the
/// same person keeps the same `PlayerId` from one game to the next.
///
/// `#[serde(transparent)]` serializes this as the bare `u64`, so
/// `PlayerId(42)` becomes `42` in JSON rather than `{ "0": 42 }`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one table of the card game).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// Identifies a card in the catalog.
///
/// A room holds exactly one instance of every catalog card, so the same
/// id names both the definition and the instance circulating in a room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// Identifies one zone assignment record (where a card currently sits).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssignmentId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z-{}", self.0)
    }
}

/// Identifies a match in the lightweight match tracker.
///
/// Unrelated to [`RoomId`]: tracked matches never touch room storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// The name of a broadcast event.
///
/// Observers subscribe to a room and receive every notification for it;
/// the name tells them what kind of transition happened. The serialized
/// form is the variant name itself (`"GameStarted"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// The deck was dealt and the turn sequence fixed.
    GameStarted,
    /// Any in-game change: a draw, a card played, a pass, a random event,
    /// an elimination.
    ReceiveGameUpdate,
    /// The game is over, either with a winner or as a draw.
    GameEnded,
}

impl EventName {
    /// Returns the wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameStarted => "GameStarted",
            Self::ReceiveGameUpdate => "ReceiveGameUpdate",
            Self::GameEnded => "GameEnded",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GameStarted" => Ok(Self::GameStarted),
            "ReceiveGameUpdate" => Ok(Self::ReceiveGameUpdate),
            "GameEnded" => Ok(Self::GameEnded),
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

/// A named event with a free-text payload, addressed to every observer
/// of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The room whose observers receive this event.
    pub room_id: RoomId,
    /// What happened.
    pub name: EventName,
    /// Human-readable description, e.g. `"Player P-3 drew a card."`.
    pub payload: String,
}

impl Notification {
    /// Creates a notification for `room_id`.
    pub fn new(
        room_id: RoomId,
        name: EventName,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            room_id,
            name,
            payload: payload.into(),
        }
    }

    /// Shorthand for a [`EventName::GameStarted`] notification.
    pub fn game_started(room_id: RoomId, payload: impl Into<String>) -> Self {
        Self::new(room_id, EventName::GameStarted, payload)
    }

    /// Shorthand for a [`EventName::ReceiveGameUpdate`] notification.
    pub fn update(room_id: RoomId, payload: impl Into<String>) -> Self {
        Self::new(room_id, EventName::ReceiveGameUpdate, payload)
    }

    /// Shorthand for a [`EventName::GameEnded`] notification.
    pub fn game_ended(room_id: RoomId, payload: impl Into<String>) -> Self {
        Self::new(room_id, EventName::GameEnded, payload)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.room_id, self.name, self.payload)
    }
}
