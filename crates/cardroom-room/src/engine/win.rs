//! Win evaluator: eliminations and end-of-game detection.

use cardroom_protocol::{Notification, PlayerId};
use cardroom_zone::RoomSnapshot;
use serde::{Deserialize, Serialize};

use super::turn::remove_from_rotation;
use crate::GameError;

/// The result of a win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Two or more players remain.
    Ongoing,
    /// This check left exactly one player; the game is over.
    Winner(PlayerId),
    /// This check left nobody; the game is over.
    Draw,
    /// No game is running. Carries the winner of the last game, if any.
    Idle { last_winner: Option<PlayerId> },
}

impl Verdict {
    /// The winner this verdict reports, fresh or remembered.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Self::Winner(player) => Some(*player),
            Self::Idle { last_winner } => *last_winner,
            Self::Ongoing | Self::Draw => None,
        }
    }

    /// Returns `true` if this check ended the game.
    pub fn ended_game(&self) -> bool {
        matches!(self, Self::Winner(_) | Self::Draw)
    }
}

/// Eliminates every seated player at or below zero health, then decides
/// whether the game is over.
///
/// Eliminated players leave the room and the turn order together; their
/// hands go to the room's discard pile. Calling this again without any
/// change in between eliminates nobody and reports the same winner.
pub fn check_win_condition(
    snapshot: &mut RoomSnapshot,
    out: &mut Vec<Notification>,
) -> Result<Verdict, GameError> {
    let room_id = snapshot.room.id;
    if !snapshot.room.started {
        return Ok(Verdict::Idle {
            last_winner: snapshot.room.winner,
        });
    }

    let eliminated: Vec<PlayerId> = snapshot
        .seated()
        .filter(|p| p.health <= 0)
        .map(|p| p.id)
        .collect();
    for player in eliminated {
        remove_from_rotation(&mut snapshot.room, player);
        let discarded = snapshot.zones.surrender_hand(player)?;
        if let Some(record) = snapshot.player_mut(player) {
            record.room = None;
        }
        tracing::info!(%room_id, %player, discarded, "player eliminated");
        out.push(Notification::update(
            room_id,
            format!("Player {player} has been eliminated!"),
        ));
    }

    let verdict = match snapshot.room.players.as_slice() {
        [survivor] => {
            let survivor = *survivor;
            snapshot.room.started = false;
            snapshot.room.winner = Some(survivor);
            tracing::info!(%room_id, winner = %survivor, "game won");
            Verdict::Winner(survivor)
        }
        [] => {
            snapshot.room.started = false;
            snapshot.room.winner = None;
            snapshot.room.current_turn = None;
            tracing::info!(%room_id, "game ended in a draw");
            out.push(Notification::game_ended(room_id, "Game ends in a draw!"));
            Verdict::Draw
        }
        _ => Verdict::Ongoing,
    };
    Ok(verdict)
}
