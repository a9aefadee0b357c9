//! # Cardroom
//!
//! Server-authoritative engine for turn-based multiplayer card games.
//!
//! Players join a room, the room deals a shuffled catalog, and players take
//! turns drawing, playing or passing. Every action is followed by a random
//! event and a win check; observers of the room receive a notification for
//! each state change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardroom::prelude::*;
//!
//! # async fn demo(catalog: InMemoryCatalog) -> Result<(), CardroomError> {
//! let server = CardroomServer::builder().catalog(catalog).build();
//! let room = server.create_room(4).await?;
//! let mut observer = server.subscribe(room).await?;
//! server.join_room(room, PlayerProfile::new(PlayerId(1), "ada")).await?;
//! server.join_room(room, PlayerProfile::new(PlayerId(2), "bo")).await?;
//! server.start_game(room).await?;
//! while let Some(note) = observer.recv().await {
//!     println!("{note}");
//! #   break;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod server;

pub use error::CardroomError;
pub use server::{CardroomServer, CardroomServerBuilder};

/// Re-exports for game servers built on Cardroom.
pub mod prelude {
    pub use crate::{CardroomError, CardroomServer, CardroomServerBuilder};

    pub use cardroom_protocol::{
        CardId, EventName, MatchId, Notification, PlayerId, RoomId,
    };

    pub use cardroom_zone::{
        CardCatalog, CardDefinition, CardEffect, CardKind, GameStore,
        InMemoryCatalog, InMemoryStore, PlayerProfile,
    };

    pub use cardroom_room::engine::{CardPlay, PlayOutcome};
    pub use cardroom_room::{
        ErrorKind, GameConfig, GameError, Observer, PlayerView, RandomEvent, RoomInfo,
    };

    pub use cardroom_match::{ActionUsage, MatchError, MatchState};
}
