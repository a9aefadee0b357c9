//! Room actor: an isolated Tokio task that owns every write to one room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are processed one at a time, so the
//! read-decide-write-broadcast sequence of one operation can never
//! interleave with another operation on the same room.
//!
//! Every mutating command follows the same shape:
//!
//! ```text
//! load snapshot → engine mutates a copy → commit → dispatch notifications
//! ```
//!
//! If the engine rejects the command or the commit fails, the copy is
//! dropped and nothing is broadcast.

use std::sync::Arc;

use cardroom_protocol::{CardId, Notification, PlayerId, RoomId};
use cardroom_zone::{
    CardCatalog, CardDefinition, GameStore, PlayerProfile, PlayerRecord, RoomSnapshot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::engine::{self, CardPlay, RandomEvent, Rules};
use crate::notify::{self, Broadcaster};
use crate::{ErrorKind, GameConfig, GameError};

/// The collaborators a room actor works through.
#[derive(Clone)]
pub struct RoomServices {
    pub store: Arc<dyn GameStore>,
    pub catalog: Arc<dyn CardCatalog>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

impl RoomServices {
    pub fn new(
        store: Arc<dyn GameStore>,
        catalog: Arc<dyn CardCatalog>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            store,
            catalog,
            broadcaster,
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands sent to a room actor through its channel.
///
/// Each carries a `oneshot` reply channel: the caller sends the command
/// and waits for the result on that channel.
pub(crate) enum RoomCommand {
    Join {
        profile: PlayerProfile,
        reply: Reply<()>,
    },
    Start {
        reply: Reply<()>,
    },
    Draw {
        player: PlayerId,
        reply: Reply<CardDefinition>,
    },
    UseCard {
        player: PlayerId,
        card: CardId,
        reply: Reply<CardPlay>,
    },
    Pass {
        player: PlayerId,
        reply: Reply<()>,
    },
    ApplyEvent {
        reply: Reply<Option<RandomEvent>>,
    },
    CheckWin {
        reply: Reply<Option<PlayerId>>,
    },
    GetInfo {
        reply: Reply<RoomInfo>,
    },
    Shutdown,
}

/// A seated player as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub health: i32,
    /// Cards in hand, in ledger order.
    pub hand: Vec<CardId>,
}

/// A read-only view of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub name: String,
    pub max_players: usize,
    pub started: bool,
    /// Seated players, in join order.
    pub players: Vec<PlayerView>,
    pub turn_order: Vec<PlayerId>,
    pub current_turn: Option<PlayerId>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub winner: Option<PlayerId>,
}

impl RoomInfo {
    fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        let players = snapshot
            .seated()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                health: p.health,
                hand: snapshot.zones.hand(p.id).map(|a| a.card()).collect(),
            })
            .collect();
        Self {
            room_id: snapshot.room.id,
            name: snapshot.room.name.clone(),
            max_players: snapshot.room.max_players,
            started: snapshot.room.started,
            players,
            turn_order: snapshot.room.turn_order.clone(),
            current_turn: snapshot.room.current_turn,
            deck_size: snapshot.zones.deck_len(),
            discard_size: snapshot.zones.discard_len(),
            winner: snapshot.room.winner,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        !self.started && self.players.len() < self.max_players
    }
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: it only wraps an `mpsc::Sender`. The
/// `RoomManager` holds one of these per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique ID.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> RoomCommand,
    ) -> Result<T, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| GameError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| GameError::Unavailable(self.room_id))?
    }

    /// Seats a player in the room.
    pub async fn join(&self, profile: PlayerProfile) -> Result<(), GameError> {
        self.request(|reply| RoomCommand::Join { profile, reply }).await
    }

    /// Deals the game and fixes the turn order.
    pub async fn start_game(&self) -> Result<(), GameError> {
        self.request(|reply| RoomCommand::Start { reply }).await
    }

    /// Draws a card for the current turn-holder. Returns the card drawn.
    pub async fn draw_card(&self, player: PlayerId) -> Result<CardDefinition, GameError> {
        self.request(|reply| RoomCommand::Draw { player, reply }).await
    }

    /// Plays a card from the current turn-holder's hand.
    pub async fn use_card(
        &self,
        player: PlayerId,
        card: CardId,
    ) -> Result<CardPlay, GameError> {
        self.request(|reply| RoomCommand::UseCard { player, card, reply })
            .await
    }

    /// Passes the current turn-holder's turn.
    pub async fn pass_turn(&self, player: PlayerId) -> Result<(), GameError> {
        self.request(|reply| RoomCommand::Pass { player, reply }).await
    }

    /// Rolls and applies one random event outside the action flow.
    pub async fn apply_random_event(&self) -> Result<Option<RandomEvent>, GameError> {
        self.request(|reply| RoomCommand::ApplyEvent { reply }).await
    }

    /// Runs a win check outside the action flow. Returns the winner, if
    /// the game has one.
    pub async fn check_win_condition(&self) -> Result<Option<PlayerId>, GameError> {
        self.request(|reply| RoomCommand::CheckWin { reply }).await
    }

    /// Requests a read-only view of the room.
    pub async fn info(&self) -> Result<RoomInfo, GameError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), GameError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| GameError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    config: GameConfig,
    services: RoomServices,
    rng: StdRng,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { profile, reply } => {
                    let _ = reply.send(self.handle_join(profile));
                }
                RoomCommand::Start { reply } => {
                    let result = self.transact("start_game", engine::start_game);
                    let _ = reply.send(result);
                }
                RoomCommand::Draw { player, reply } => {
                    let result = self.transact("draw_card", |snapshot, rules, out| {
                        let card = engine::draw_card(snapshot, player, rules, out)?;
                        engine::conclude_action(snapshot, rules, out)?;
                        Ok(card)
                    });
                    let _ = reply.send(result);
                }
                RoomCommand::UseCard {
                    player,
                    card,
                    reply,
                } => {
                    let result = self.transact("use_card", |snapshot, rules, out| {
                        let play = engine::use_card(snapshot, player, card, rules, out)?;
                        engine::conclude_action(snapshot, rules, out)?;
                        Ok(play)
                    });
                    let _ = reply.send(result);
                }
                RoomCommand::Pass { player, reply } => {
                    let result = self.transact("pass_turn", |snapshot, rules, out| {
                        engine::pass_turn(snapshot, player, out)?;
                        engine::conclude_action(snapshot, rules, out)?;
                        Ok(())
                    });
                    let _ = reply.send(result);
                }
                RoomCommand::ApplyEvent { reply } => {
                    let result =
                        self.transact("apply_random_event", engine::resolve_random_event);
                    let _ = reply.send(result);
                }
                RoomCommand::CheckWin { reply } => {
                    let result = self.transact("check_win_condition", |snapshot, _rules, out| {
                        let verdict = engine::check_win_condition(snapshot, out)?;
                        engine::announce(&verdict, snapshot.room.id, out);
                        Ok(verdict.winner())
                    });
                    let _ = reply.send(result);
                }
                RoomCommand::GetInfo { reply } => {
                    let result = self.load().map(|s| RoomInfo::from_snapshot(&s));
                    let _ = reply.send(result);
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn load(&self) -> Result<RoomSnapshot, GameError> {
        self.services
            .store
            .load_room(self.room_id)?
            .ok_or(GameError::RoomNotFound(self.room_id))
    }

    /// Runs one engine operation against a fresh copy of the room, commits
    /// the copy, then dispatches the notifications it produced.
    fn transact<T>(
        &mut self,
        op: &'static str,
        apply: impl FnOnce(
            &mut RoomSnapshot,
            &mut Rules<'_>,
            &mut Vec<Notification>,
        ) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let result = self.stage_and_commit(apply);
        if let Err(e) = &result {
            self.log_failure(op, e);
        }
        result
    }

    fn stage_and_commit<T>(
        &mut self,
        apply: impl FnOnce(
            &mut RoomSnapshot,
            &mut Rules<'_>,
            &mut Vec<Notification>,
        ) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut snapshot = self.load()?;
        let mut outbox = Vec::new();
        let mut rules = Rules {
            catalog: self.services.catalog.as_ref(),
            config: &self.config,
            rng: &mut self.rng,
        };

        let value = apply(&mut snapshot, &mut rules, &mut outbox)?;
        snapshot.zones.check_integrity()?;
        self.services.store.commit(&snapshot)?;

        notify::dispatch(self.services.broadcaster.as_ref(), outbox);
        Ok(value)
    }

    fn log_failure(&self, op: &'static str, error: &GameError) {
        let room_id = self.room_id;
        match error.kind() {
            ErrorKind::Precondition | ErrorKind::Exhausted => {
                tracing::debug!(%room_id, op, %error, "operation rejected");
            }
            ErrorKind::Persistence => {
                tracing::error!(%room_id, op, %error, "commit failed, operation discarded");
            }
            ErrorKind::Invariant => {
                tracing::error!(%room_id, op, %error, "zone invariant violated");
            }
            ErrorKind::Unavailable => {
                tracing::warn!(%room_id, op, %error, "collaborator unavailable");
            }
        }
    }

    fn handle_join(&mut self, profile: PlayerProfile) -> Result<(), GameError> {
        let room_id = self.room_id;
        if let Some(existing) = self.services.store.load_player(profile.id)? {
            if let Some(other) = existing.room {
                if other != room_id {
                    let err = GameError::AlreadyInRoom(profile.id, other);
                    self.log_failure("join", &err);
                    return Err(err);
                }
            }
        }

        let player_id = profile.id;
        self.transact("join", move |snapshot, rules, _out| {
            let room = &mut snapshot.room;
            if room.started {
                return Err(GameError::AlreadyStarted(room_id));
            }
            if room.contains(player_id) {
                return Err(GameError::AlreadyInRoom(player_id, room_id));
            }
            if room.is_full() {
                return Err(GameError::RoomFull(room_id));
            }
            room.players.push(player_id);
            snapshot.players.retain(|p| p.id != player_id);
            snapshot.players.push(PlayerRecord {
                id: player_id,
                name: profile.name,
                health: profile.health.unwrap_or(rules.config.starting_health),
                room: Some(room_id),
            });
            Ok(())
        })?;

        tracing::info!(%room_id, %player_id, "player joined");
        Ok(())
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.channel_size` controls backpressure: if the channel fills up,
/// senders will wait (bounded channel).
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: GameConfig,
    services: RoomServices,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(room_id.0)),
        None => StdRng::from_os_rng(),
    };

    let actor = RoomActor {
        room_id,
        config,
        services,
        rng,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
