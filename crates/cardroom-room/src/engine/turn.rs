//! Turn engine: start, draw, play, pass, and the turn cursor.

use cardroom_protocol::{CardId, Notification, PlayerId};
use cardroom_zone::{
    CardCatalog, CardDefinition, CardKind, Owner, RoomRecord, RoomSnapshot, Zone,
    ZoneLedger,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::Rules;
use crate::GameError;

// ---------------------------------------------------------------------------
// Turn cursor
// ---------------------------------------------------------------------------

/// The player after `current` in `order`, wrapping at the end.
///
/// Returns `None` if `current` is not in `order`.
pub fn next_holder(order: &[PlayerId], current: PlayerId) -> Option<PlayerId> {
    let index = order.iter().position(|p| *p == current)?;
    Some(order[(index + 1) % order.len()])
}

/// Moves the turn to the next player, computed against the turn order as
/// it is right now.
pub fn advance_turn(room: &mut RoomRecord) -> Option<PlayerId> {
    let next = room
        .current_turn
        .and_then(|current| next_holder(&room.turn_order, current))
        .or_else(|| room.turn_order.first().copied());
    room.current_turn = next;
    next
}

/// Removes `player` from the room's players and turn order in one step.
///
/// If `player` held the turn, it passes to whoever now sits at the same
/// position of the shortened order (their successor), wrapping to the
/// front.
pub fn remove_from_rotation(room: &mut RoomRecord, player: PlayerId) {
    room.players.retain(|p| *p != player);
    let Some(index) = room.turn_order.iter().position(|p| *p == player) else {
        return;
    };
    room.turn_order.remove(index);
    if room.current_turn == Some(player) {
        room.current_turn = if room.turn_order.is_empty() {
            None
        } else {
            Some(room.turn_order[index % room.turn_order.len()])
        };
    }
}

fn ensure_turn(snapshot: &RoomSnapshot, player: PlayerId) -> Result<(), GameError> {
    let room = &snapshot.room;
    if !room.started {
        return Err(GameError::NotStarted(room.id));
    }
    if !room.contains(player) {
        return Err(GameError::NotInRoom(player, room.id));
    }
    if room.current_turn != Some(player) {
        return Err(GameError::NotYourTurn(player));
    }
    Ok(())
}

fn definition(catalog: &dyn CardCatalog, card: CardId) -> Result<CardDefinition, GameError> {
    catalog.card(card).ok_or(GameError::UnknownCard(card))
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

/// Deals a fresh game.
///
/// Shuffles one instance of every catalog card into the deck, lets each
/// player draw one card for turn order (highest value first, ties keep
/// join order), then deals `hand_size` cards per player in turn order
/// until the deck runs out. A player who could not draw an order card
/// goes after everyone who did.
pub fn start_game(
    snapshot: &mut RoomSnapshot,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Result<(), GameError> {
    let room_id = snapshot.room.id;
    if snapshot.room.started {
        return Err(GameError::AlreadyStarted(room_id));
    }
    let present = snapshot.room.players.len();
    if present < rules.config.min_players {
        return Err(GameError::NotEnoughPlayers {
            room: room_id,
            required: rules.config.min_players,
            present,
        });
    }

    let mut cards = rules.catalog.card_ids();
    cards.shuffle(&mut *rules.rng);
    let mut zones = ZoneLedger::stock_deck(room_id, cards.iter().copied());
    let room_owner = Owner::Room(room_id);

    let mut draws: Vec<(PlayerId, Option<i32>)> = Vec::with_capacity(present);
    for player in &snapshot.room.players {
        let value = match zones.top_of_deck() {
            Some(card) => {
                let value = definition(rules.catalog, card)?.quantity;
                zones.relocate(card, Zone::Deck, Zone::DiscardPile, room_owner)?;
                Some(value)
            }
            None => None,
        };
        draws.push((*player, value));
    }
    // Stable sort: equal draws keep join order. `None` sorts below any value.
    draws.sort_by(|a, b| b.1.cmp(&a.1));
    let turn_order: Vec<PlayerId> = draws.into_iter().map(|(p, _)| p).collect();

    'deal: for player in &turn_order {
        for _ in 0..rules.config.hand_size {
            let Some(card) = zones.top_of_deck() else {
                break 'deal;
            };
            zones.relocate(card, Zone::Deck, Zone::Hand, Owner::Player(*player))?;
        }
    }
    zones.verify_partition(&cards)?;

    let room = &mut snapshot.room;
    room.current_turn = turn_order.first().copied();
    room.turn_order = turn_order;
    room.started = true;
    room.winner = None;
    snapshot.zones = zones;

    tracing::info!(
        %room_id,
        players = present,
        deck = snapshot.zones.deck_len(),
        first = ?snapshot.room.current_turn,
        "game started"
    );
    out.push(Notification::game_started(
        room_id,
        format!("Game in room {room_id} has started!"),
    ));
    Ok(())
}

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// Moves the top deck card into `player`'s hand and passes the turn.
///
/// An empty deck is refilled from the discard pile first. With both empty
/// the draw fails with [`GameError::NoCardAvailable`].
pub fn draw_card(
    snapshot: &mut RoomSnapshot,
    player: PlayerId,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Result<CardDefinition, GameError> {
    ensure_turn(snapshot, player)?;
    let room_id = snapshot.room.id;

    if snapshot.zones.deck_len() == 0 {
        let recycled = snapshot.zones.recycle_discard()?;
        if recycled == 0 {
            return Err(GameError::NoCardAvailable(room_id));
        }
        tracing::debug!(%room_id, recycled, "deck refilled from discard pile");
    }

    let card = snapshot
        .zones
        .top_of_deck()
        .ok_or(GameError::NoCardAvailable(room_id))?;
    let drawn = definition(rules.catalog, card)?;
    snapshot
        .zones
        .relocate(card, Zone::Deck, Zone::Hand, Owner::Player(player))?;
    let next = advance_turn(&mut snapshot.room);

    tracing::info!(%room_id, %player, %card, next = ?next, "card drawn");
    out.push(Notification::update(room_id, format!("Player {player} drew a card.")));
    Ok(drawn)
}

// ---------------------------------------------------------------------------
// Use
// ---------------------------------------------------------------------------

/// What playing a card did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// An Action card hit the next player in sequence.
    Damaged { target: PlayerId, amount: i32 },
    /// A Consumable card healed the player who used it.
    Healed { amount: i32 },
    /// The card has no in-engine effect.
    NoEffect,
}

/// The result of [`use_card`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlay {
    pub card: CardDefinition,
    pub outcome: PlayOutcome,
}

/// Resolves a card from `player`'s hand, discards it to the room, and
/// passes the turn.
pub fn use_card(
    snapshot: &mut RoomSnapshot,
    player: PlayerId,
    card: CardId,
    rules: &mut Rules<'_>,
    out: &mut Vec<Notification>,
) -> Result<CardPlay, GameError> {
    ensure_turn(snapshot, player)?;
    let room_id = snapshot.room.id;

    let held = snapshot
        .zones
        .find(card)
        .is_some_and(|a| a.is_in_hand_of(player));
    if !held {
        return Err(GameError::CardNotInHand { player, card });
    }
    let played = definition(rules.catalog, card)?;

    let outcome = match played.kind {
        CardKind::Action => match next_holder(&snapshot.room.turn_order, player) {
            Some(target) if target != player => {
                let amount = rules.config.action_damage;
                let record = snapshot
                    .player_mut(target)
                    .ok_or(GameError::NotInRoom(target, room_id))?;
                record.health -= amount;
                out.push(Notification::update(
                    room_id,
                    format!(
                        "Player {player} used an Action card on Player {target}, dealing {amount} damage."
                    ),
                ));
                PlayOutcome::Damaged { target, amount }
            }
            _ => PlayOutcome::NoEffect,
        },
        CardKind::Consumable => {
            let amount = rules.config.consumable_heal;
            let record = snapshot
                .player_mut(player)
                .ok_or(GameError::NotInRoom(player, room_id))?;
            record.health += amount;
            out.push(Notification::update(
                room_id,
                format!("Player {player} used a Consumable card, restoring {amount} HP."),
            ));
            PlayOutcome::Healed { amount }
        }
        CardKind::Equipment => PlayOutcome::NoEffect,
    };

    snapshot
        .zones
        .relocate(card, Zone::Hand, Zone::DiscardPile, Owner::Room(room_id))?;
    let next = advance_turn(&mut snapshot.room);

    tracing::info!(%room_id, %player, %card, kind = %played.kind, next = ?next, "card used");
    out.push(Notification::update(
        room_id,
        format!("Player {player} used card {card}."),
    ));
    Ok(CardPlay {
        card: played,
        outcome,
    })
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

/// Passes the turn without playing.
pub fn pass_turn(
    snapshot: &mut RoomSnapshot,
    player: PlayerId,
    out: &mut Vec<Notification>,
) -> Result<(), GameError> {
    ensure_turn(snapshot, player)?;
    let room_id = snapshot.room.id;
    let next = advance_turn(&mut snapshot.room);

    tracing::info!(%room_id, %player, next = ?next, "turn passed");
    out.push(Notification::update(
        room_id,
        format!("Player {player} passed their turn."),
    ));
    Ok(())
}
