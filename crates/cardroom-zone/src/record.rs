//! Room and player records, and the snapshot the engine works on.

use cardroom_protocol::{PlayerId, RoomId};
use serde::{Deserialize, Serialize};

use crate::ZoneLedger;

/// The durable record of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub name: String,
    pub max_players: usize,
    /// Players currently in the room, in join order.
    pub players: Vec<PlayerId>,
    /// The turn rotation. Only ever holds ids from `players`.
    pub turn_order: Vec<PlayerId>,
    /// Whose action is valid next. Always an element of `turn_order`
    /// while the game is running.
    pub current_turn: Option<PlayerId>,
    pub started: bool,
    /// The survivor of the last finished game, if it had one.
    pub winner: Option<PlayerId>,
}

impl RoomRecord {
    /// Creates an empty, unstarted room.
    pub fn new(id: RoomId, name: impl Into<String>, max_players: usize) -> Self {
        Self {
            id,
            name: name.into(),
            max_players,
            players: Vec::new(),
            turn_order: Vec::new(),
            current_turn: None,
            started: false,
            winner: None,
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }
}

/// The durable record of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// Goes non-positive only until the next win check eliminates the
    /// player.
    pub health: i32,
    /// The room the player is seated in; `None` while unassigned.
    pub room: Option<RoomId>,
}

/// What a caller supplies when a player joins a room. Derived from the
/// player's account, which lives outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
    /// Starting health; the room's configured default applies when `None`.
    pub health: Option<i32>,
}

impl PlayerProfile {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            health: None,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }
}

/// Everything one room operation reads and writes: the room, the
/// players involved with it, and its zone ledger.
///
/// The engine mutates a snapshot in memory and hands it to
/// [`GameStore::commit`](crate::GameStore::commit) as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room: RoomRecord,
    /// Records of seated players, plus any player detached during this
    /// operation (their `room` is then `None`).
    pub players: Vec<PlayerRecord>,
    pub zones: ZoneLedger,
}

impl RoomSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerRecord> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Records of the players currently seated, in join order.
    pub fn seated(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.room
            .players
            .iter()
            .filter_map(|id| self.player(*id))
    }

    pub fn health_of(&self, id: PlayerId) -> Option<i32> {
        self.player(id).map(|p| p.health)
    }
}
