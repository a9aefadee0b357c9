//! Card catalog: read-only card definitions.
//!
//! The engine never mutates a definition. It only asks the catalog what a
//! card is when it needs the card's kind or value.

use std::collections::BTreeMap;
use std::fmt;

use cardroom_protocol::CardId;
use serde::{Deserialize, Serialize};

/// What a card does when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Damages the next player in the turn sequence.
    Action,
    /// Restores the player's own health.
    Consumable,
    /// No in-engine effect; discarded when used.
    Equipment,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => write!(f, "Action"),
            Self::Consumable => write!(f, "Consumable"),
            Self::Equipment => write!(f, "Equipment"),
        }
    }
}

/// An effect linked to a card. Carried through for clients; the engine
/// does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    pub id: u64,
    pub name: String,
    pub reference: String,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub description: String,
    pub kind: CardKind,
    /// Numeric value. Also the card's weight in the turn-order draw.
    pub quantity: i32,
    pub effect: Option<CardEffect>,
}

impl CardDefinition {
    /// Creates a definition with an empty description and no effect.
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        kind: CardKind,
        quantity: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            kind,
            quantity,
            effect: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Read-only lookup of card definitions.
pub trait CardCatalog: Send + Sync + 'static {
    /// Returns the definition for `id`, if the catalog has one.
    fn card(&self, id: CardId) -> Option<CardDefinition>;

    /// Returns every card id in the catalog, in a stable order.
    fn card_ids(&self) -> Vec<CardId>;
}

/// A catalog held in memory, ordered by card id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    cards: BTreeMap<CardId, CardDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, card: CardDefinition) {
        self.cards.insert(card.id, card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<CardDefinition> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}

impl CardCatalog for InMemoryCatalog {
    fn card(&self, id: CardId) -> Option<CardDefinition> {
        self.cards.get(&id).cloned()
    }

    fn card_ids(&self) -> Vec<CardId> {
        self.cards.keys().copied().collect()
    }
}
