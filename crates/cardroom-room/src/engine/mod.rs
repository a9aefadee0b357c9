//! The room state machine.
//!
//! Every function here works on a [`RoomSnapshot`] held in memory and
//! appends the notifications it wants sent to an outbox. Nothing in this
//! module persists or broadcasts; the room actor commits the snapshot and
//! dispatches the outbox afterwards, so the state machine can be tested
//! without a store or a transport.
//!
//! ```text
//! start_game ──→ [draw_card | use_card | pass_turn] ──→ conclude_action
//!                                                        ├─ apply_random_event
//!                                                        └─ check_win_condition
//!
//! resolve_random_event ──→ apply_random_event ──→ check_win_condition
//! ```

mod event;
mod turn;
mod win;

use cardroom_protocol::{Notification, RoomId};
use cardroom_zone::{CardCatalog, RoomSnapshot};
use rand::RngCore;

use crate::{GameConfig, GameError};

pub use event::{RandomEvent, apply_event, apply_random_event};
pub use turn::{
    CardPlay, PlayOutcome, advance_turn, draw_card, next_holder, pass_turn,
    remove_from_rotation, start_game, use_card,
};
pub use win::{Verdict, check_win_condition};

/// What the state machine needs besides the snapshot itself.
pub struct Rules<'a> {
    pub catalog: &'a dyn CardCatalog,
    pub config: &'a GameConfig,
    pub rng: &'a mut dyn RngCore,
}

/// Runs the end-of-action steps shared by draw, use and pass: one random
/// event, then a win check, then the win notice if someone just won.
pub fn conclude_action(
    snapshot: &mut RoomSnapshot,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Result<Verdict, GameError> {
    apply_random_event(snapshot, rules, out);
    let verdict = check_win_condition(snapshot, out)?;
    announce(&verdict, snapshot.room.id, out);
    Ok(verdict)
}

/// Rolls a random event outside the action flow, then runs the win check
/// so nobody is left seated at or below zero health.
pub fn resolve_random_event(
    snapshot: &mut RoomSnapshot,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Result<Option<RandomEvent>, GameError> {
    let event = apply_random_event(snapshot, rules, out);
    if event.is_some() {
        let verdict = check_win_condition(snapshot, out)?;
        announce(&verdict, snapshot.room.id, out);
    }
    Ok(event)
}

/// Queues the win notice for a freshly decided winner.
///
/// Draws announce themselves inside the win check; idle verdicts
/// announce nothing.
pub fn announce(verdict: &Verdict, room_id: RoomId, out: &mut Vec<Notification>) {
    if let Verdict::Winner(player) = verdict {
        out.push(Notification::game_ended(
            room_id,
            format!("Player {player} wins!"),
        ));
    }
}
