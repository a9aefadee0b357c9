//! Error types for the match tracker.

use cardroom_protocol::{MatchId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// A match needs at least one player in its order.
    #[error("match {0} has no players")]
    EmptyOrder(MatchId),

    /// No match is tracked under this id.
    #[error("match {0} not found")]
    NotFound(MatchId),

    /// The player is not part of the match's player order.
    #[error("player {1} is not in match {0}")]
    UnknownPlayer(MatchId, PlayerId),
}
