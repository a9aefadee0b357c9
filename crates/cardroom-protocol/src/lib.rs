//! Shared vocabulary for Cardroom.
//!
//! This crate defines the small set of types every other layer agrees on:
//!
//! - **Identifiers** ([`RoomId`], [`PlayerId`], [`CardId`], [`AssignmentId`],
//!   [`MatchId`]): newtype wrappers so a room can never be passed where a
//!   player is expected.
//! - **Notifications** ([`EventName`], [`Notification`]): the named events
//!   the engine asks the notifier to broadcast to a room's observers.
//! - **Errors** ([`ProtocolError`]): what can go wrong while parsing this
//!   vocabulary from text.
//!
//! # Architecture
//!
//! ```text
//! Zone model → Turn engine (room actor) → Notification → Broadcaster
//! ```
//!
//! The protocol layer knows nothing about rooms or cards. It only names
//! things.

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{
    AssignmentId, CardId, EventName, MatchId, Notification, PlayerId, RoomId,
};
