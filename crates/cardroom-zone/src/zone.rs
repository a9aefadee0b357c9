//! Zone assignments: where each card of a room currently sits.
//!
//! The central rule of the whole engine lives here: every card in a room
//! has exactly one assignment at all times. Assignments are created once
//! when a room starts and afterwards only *relocated*, never deleted or
//! duplicated, so the rule holds as long as every move goes through
//! [`ZoneLedger::relocate`].

use std::collections::HashSet;
use std::fmt;

use cardroom_protocol::{AssignmentId, CardId, PlayerId, RoomId};
use serde::{Deserialize, Serialize};

use crate::ZoneError;

// ---------------------------------------------------------------------------
// Zone / Owner
// ---------------------------------------------------------------------------

/// The three places a card can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    DiscardPile,
}

impl Zone {
    /// Returns `true` if `owner` is the right kind of holder for this zone.
    ///
    /// Hands are held by players; the deck and the discard pile by rooms.
    pub fn accepts(&self, owner: &Owner) -> bool {
        matches!(
            (self, owner),
            (Self::Hand, Owner::Player(_))
                | (Self::Deck | Self::DiscardPile, Owner::Room(_))
        )
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deck => write!(f, "Deck"),
            Self::Hand => write!(f, "Hand"),
            Self::DiscardPile => write!(f, "DiscardPile"),
        }
    }
}

/// Who holds a card: exactly one room or exactly one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Room(RoomId),
    Player(PlayerId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(id) => write!(f, "room {id}"),
            Self::Player(id) => write!(f, "player {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ZoneAssignment
// ---------------------------------------------------------------------------

/// The location record of one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    id: AssignmentId,
    card: CardId,
    zone: Zone,
    owner: Owner,
}

impl ZoneAssignment {
    /// Creates an assignment, rejecting a zone/owner pair that cannot exist.
    pub fn new(
        id: AssignmentId,
        card: CardId,
        zone: Zone,
        owner: Owner,
    ) -> Result<Self, ZoneError> {
        if !zone.accepts(&owner) {
            return Err(ZoneError::OwnerMismatch { zone, owner });
        }
        Ok(Self {
            id,
            card,
            zone,
            owner,
        })
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Returns `true` if the card is in `player`'s hand.
    pub fn is_in_hand_of(&self, player: PlayerId) -> bool {
        self.zone == Zone::Hand && self.owner == Owner::Player(player)
    }
}

// ---------------------------------------------------------------------------
// ZoneLedger
// ---------------------------------------------------------------------------

/// All zone assignments of one room.
///
/// Order matters: the deck is read top-down in ledger order, so the
/// shuffle done before [`stock_deck`](Self::stock_deck) is the deck order.
/// Relocation keeps a card's position in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLedger {
    room_id: RoomId,
    assignments: Vec<ZoneAssignment>,
}

impl ZoneLedger {
    /// Creates an empty ledger (a room that has not been dealt).
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            assignments: Vec::new(),
        }
    }

    /// Creates one Deck assignment per card, in the given order.
    ///
    /// Duplicate ids in `cards` are skipped; each card gets one assignment.
    pub fn stock_deck(
        room_id: RoomId,
        cards: impl IntoIterator<Item = CardId>,
    ) -> Self {
        let mut seen = HashSet::new();
        let assignments = cards
            .into_iter()
            .filter(|card| seen.insert(*card))
            .enumerate()
            .map(|(i, card)| ZoneAssignment {
                id: AssignmentId(i as u64 + 1),
                card,
                zone: Zone::Deck,
                owner: Owner::Room(room_id),
            })
            .collect();
        Self {
            room_id,
            assignments,
        }
    }

    /// Rebuilds a ledger from stored assignments, checking integrity.
    pub fn from_assignments(
        room_id: RoomId,
        assignments: Vec<ZoneAssignment>,
    ) -> Result<Self, ZoneError> {
        let ledger = Self {
            room_id,
            assignments,
        };
        ledger.check_integrity()?;
        Ok(ledger)
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn assignments(&self) -> &[ZoneAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns the assignment for `card`, if it has one.
    pub fn find(&self, card: CardId) -> Option<&ZoneAssignment> {
        self.assignments.iter().find(|a| a.card == card)
    }

    /// Deck cards, top first.
    pub fn deck(&self) -> impl Iterator<Item = &ZoneAssignment> {
        self.assignments.iter().filter(|a| a.zone == Zone::Deck)
    }

    pub fn discard_pile(&self) -> impl Iterator<Item = &ZoneAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.zone == Zone::DiscardPile)
    }

    pub fn hand(
        &self,
        player: PlayerId,
    ) -> impl Iterator<Item = &ZoneAssignment> {
        self.assignments
            .iter()
            .filter(move |a| a.is_in_hand_of(player))
    }

    pub fn deck_len(&self) -> usize {
        self.deck().count()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile().count()
    }

    pub fn hand_len(&self, player: PlayerId) -> usize {
        self.hand(player).count()
    }

    /// The card that the next draw would take.
    pub fn top_of_deck(&self) -> Option<CardId> {
        self.deck().next().map(|a| a.card)
    }

    /// Moves `card` from `from` to `to`, handing it to `owner`.
    ///
    /// This is the only mutation the ledger allows on a single card. It
    /// fails without changing anything if the card is not currently in
    /// `from`, if `owner` cannot hold `to`, or if a room-held zone would
    /// be owned by another room.
    pub fn relocate(
        &mut self,
        card: CardId,
        from: Zone,
        to: Zone,
        owner: Owner,
    ) -> Result<&ZoneAssignment, ZoneError> {
        if !to.accepts(&owner) {
            return Err(ZoneError::OwnerMismatch { zone: to, owner });
        }
        if let Owner::Room(room) = owner {
            if room != self.room_id {
                return Err(ZoneError::ForeignRoom { card, room });
            }
        }

        let mut matches = self
            .assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.card == card)
            .map(|(i, _)| i);
        let index = matches.next().ok_or(ZoneError::Missing(card))?;
        if matches.next().is_some() {
            return Err(ZoneError::Duplicate(card));
        }

        let assignment = &mut self.assignments[index];
        if assignment.zone != from {
            return Err(ZoneError::WrongZone {
                card,
                expected: from,
                actual: assignment.zone,
            });
        }
        assignment.zone = to;
        assignment.owner = owner;
        Ok(&self.assignments[index])
    }

    /// Moves every discarded card back into the deck.
    ///
    /// Returns how many cards moved. The recycled cards keep their ledger
    /// order, which becomes their order in the deck.
    pub fn recycle_discard(&mut self) -> Result<usize, ZoneError> {
        let room = Owner::Room(self.room_id);
        let discarded: Vec<CardId> =
            self.discard_pile().map(|a| a.card).collect();
        for card in &discarded {
            self.relocate(*card, Zone::DiscardPile, Zone::Deck, room)?;
        }
        Ok(discarded.len())
    }

    /// Moves every card in `player`'s hand to the discard pile.
    pub fn surrender_hand(
        &mut self,
        player: PlayerId,
    ) -> Result<usize, ZoneError> {
        let room = Owner::Room(self.room_id);
        let held: Vec<CardId> = self.hand(player).map(|a| a.card).collect();
        for card in &held {
            self.relocate(*card, Zone::Hand, Zone::DiscardPile, room)?;
        }
        Ok(held.len())
    }

    /// Checks the structural rules: one assignment per card, unique
    /// assignment ids, valid zone/owner pairs, room zones owned by this
    /// room.
    pub fn check_integrity(&self) -> Result<(), ZoneError> {
        let mut cards = HashSet::with_capacity(self.assignments.len());
        let mut ids = HashSet::with_capacity(self.assignments.len());
        for a in &self.assignments {
            if !cards.insert(a.card) {
                return Err(ZoneError::Duplicate(a.card));
            }
            if !ids.insert(a.id) {
                return Err(ZoneError::DuplicateAssignment(a.id));
            }
            if !a.zone.accepts(&a.owner) {
                return Err(ZoneError::OwnerMismatch {
                    zone: a.zone,
                    owner: a.owner,
                });
            }
            if let Owner::Room(room) = a.owner {
                if room != self.room_id {
                    return Err(ZoneError::ForeignRoom { card: a.card, room });
                }
            }
        }
        Ok(())
    }

    /// Checks that the ledger partitions exactly `expected`: every card
    /// present once, nothing else present.
    pub fn verify_partition(&self, expected: &[CardId]) -> Result<(), ZoneError> {
        self.check_integrity()?;
        let expected: HashSet<CardId> = expected.iter().copied().collect();
        if let Some(extra) = self
            .assignments
            .iter()
            .find(|a| !expected.contains(&a.card))
        {
            return Err(ZoneError::Unexpected(extra.card));
        }
        let present: HashSet<CardId> =
            self.assignments.iter().map(|a| a.card).collect();
        let mut missing: Vec<CardId> =
            expected.difference(&present).copied().collect();
        missing.sort();
        match missing.first() {
            Some(card) => Err(ZoneError::Missing(*card)),
            None => Ok(()),
        }
    }
}
