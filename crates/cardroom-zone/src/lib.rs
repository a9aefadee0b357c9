//! Card zones and persistence for Cardroom.
//!
//! Every card in a room sits in exactly one zone at any moment: the
//! room's deck, the room's discard pile, or one player's hand. This crate
//! owns that model and the storage contract the engine writes through.
//!
//! # Key types
//!
//! - [`ZoneLedger`]: all zone assignments of one room, with
//!   [`relocate`](ZoneLedger::relocate) as the only way to move a card
//! - [`Zone`] / [`Owner`]: where a card is and who holds it
//! - [`CardCatalog`]: read-only card definitions
//! - [`GameStore`]: room/player/zone persistence with atomic commits
//! - [`InMemoryStore`]: process-local `GameStore` implementation

mod catalog;
mod error;
mod record;
mod store;
mod zone;

pub use catalog::{CardCatalog, CardDefinition, CardEffect, CardKind, InMemoryCatalog};
pub use error::{StoreError, ZoneError};
pub use record::{PlayerProfile, PlayerRecord, RoomRecord, RoomSnapshot};
pub use store::{GameStore, InMemoryStore};
pub use zone::{Owner, Zone, ZoneAssignment, ZoneLedger};
