//! Error types for the zone and storage layer.

use cardroom_protocol::{AssignmentId, CardId, RoomId};

use crate::{Owner, Zone};

/// A violation of the zone model.
///
/// These are programming defects, not user errors: a card with two
/// assignments, or a hand owned by a room, corrupts every turn computed
/// afterwards. Callers should surface them loudly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// The card has more than one assignment.
    #[error("card {0} has more than one zone assignment")]
    Duplicate(CardId),

    /// An assignment id is used twice.
    #[error("assignment id {0} is used more than once")]
    DuplicateAssignment(AssignmentId),

    /// An expected card has no assignment at all.
    #[error("card {0} has no zone assignment")]
    Missing(CardId),

    /// A card that should not be in this room has an assignment.
    #[error("card {0} does not belong to this room")]
    Unexpected(CardId),

    /// The card was not in the zone the caller said it was.
    #[error("card {card} is in {actual}, expected {expected}")]
    WrongZone {
        card: CardId,
        expected: Zone,
        actual: Zone,
    },

    /// The zone cannot be held by this kind of owner (hands belong to
    /// players, deck and discard pile belong to rooms).
    #[error("zone {zone} cannot be owned by {owner}")]
    OwnerMismatch { zone: Zone, owner: Owner },

    /// A deck or discard pile assignment names another room.
    #[error("assignment for card {card} is owned by foreign room {room}")]
    ForeignRoom { card: CardId, room: RoomId },
}

/// Errors raised by a [`GameStore`](crate::GameStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A commit or delete named a room the store has never seen.
    #[error("room {0} is not stored")]
    UnknownRoom(RoomId),

    /// The room id is already taken.
    #[error("room {0} already exists")]
    RoomExists(RoomId),

    /// The store refused the transaction; nothing was written.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Stored zone data no longer satisfies the zone model.
    #[error("stored zones are corrupt: {0}")]
    Corrupt(#[from] ZoneError),

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}
