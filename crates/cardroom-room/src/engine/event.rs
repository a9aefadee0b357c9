//! Event engine: the random event that follows every player action.

use std::fmt;

use cardroom_protocol::Notification;
use cardroom_zone::RoomSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Rules;
use crate::GameConfig;

/// One of three equally likely outcomes rolled after each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomEvent {
    /// Every seated player takes the major event damage.
    DragonAttack,
    /// Every seated player takes the minor event damage.
    Earthquake,
    /// Nothing happens.
    Calm,
}

impl RandomEvent {
    pub const ALL: [Self; 3] = [Self::DragonAttack, Self::Earthquake, Self::Calm];

    /// Picks an event uniformly at random.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Health every seated player loses.
    pub fn damage(&self, config: &GameConfig) -> i32 {
        match self {
            Self::DragonAttack => config.major_event_damage,
            Self::Earthquake => config.minor_event_damage,
            Self::Calm => 0,
        }
    }

    fn describe(&self, config: &GameConfig) -> String {
        match self {
            Self::DragonAttack => format!(
                "A dragon attacks! All players lose {} HP.",
                config.major_event_damage
            ),
            Self::Earthquake => format!(
                "An earthquake strikes! All players lose {} HP.",
                config.minor_event_damage
            ),
            Self::Calm => "Nothing happens this turn.".to_string(),
        }
    }
}

impl fmt::Display for RandomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragonAttack => write!(f, "DragonAttack"),
            Self::Earthquake => write!(f, "Earthquake"),
            Self::Calm => write!(f, "Calm"),
        }
    }
}

/// Applies `event` to every seated player.
///
/// Does nothing and returns `false` unless the game is running. Runs even
/// with a single player left, which can eliminate that player.
pub fn apply_event(
    snapshot: &mut RoomSnapshot,
    event: RandomEvent,
    config: &GameConfig,
    out: &mut Vec<Notification>,
) -> bool {
    if !snapshot.room.started {
        return false;
    }
    let damage = event.damage(config);
    if damage != 0 {
        let seated = snapshot.room.players.clone();
        for player in seated {
            if let Some(record) = snapshot.player_mut(player) {
                record.health -= damage;
            }
        }
    }
    tracing::info!(room_id = %snapshot.room.id, %event, damage, "random event");
    out.push(Notification::update(snapshot.room.id, event.describe(config)));
    true
}

/// Rolls an event and applies it. Returns the event if one was applied.
pub fn apply_random_event(
    snapshot: &mut RoomSnapshot,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Option<RandomEvent> {
    if !snapshot.room.started {
        return None;
    }
    let event = RandomEvent::roll(&mut *rules.rng);
    apply_event(snapshot, event, rules.config, out).then_some(event)
}
