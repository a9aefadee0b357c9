//! Unified error type for Cardroom.

use cardroom_match::MatchError;
use cardroom_protocol::ProtocolError;
use cardroom_room::{ErrorKind, GameError, NotifyError};
use cardroom_zone::{StoreError, ZoneError};

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardroomError {
    /// An unknown event name or similar vocabulary error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A zone ledger rule was broken.
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A room operation failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A match tracker operation failed.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Observer registration failed.
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl CardroomError {
    /// Classifies this error the way room operations are classified.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Game(e) => e.kind(),
            Self::Store(StoreError::Corrupt(_)) | Self::Zone(_) => ErrorKind::Invariant,
            Self::Store(_) => ErrorKind::Persistence,
            Self::Protocol(_) | Self::Match(_) => ErrorKind::Precondition,
            Self::Notify(_) => ErrorKind::Unavailable,
        }
    }
}
