//! Lightweight match tracking for Cardroom.
//!
//! A [`MatchTracker`] keeps turn metadata for callers that want a turn
//! counter without the full room and zone model: who plays in which order,
//! whose turn it is, which round it is, and what each player already used
//! this round.
//!
//! Matches live in process memory only and have no link to rooms.
//!
//! ```text
//! create() ──→ get() ──→ modify a copy ──→ update()
//! ```

mod error;
mod state;
mod tracker;

pub use error::MatchError;
pub use state::{ActionUsage, MatchState};
pub use tracker::MatchTracker;
