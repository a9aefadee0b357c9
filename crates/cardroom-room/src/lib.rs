//! Room lifecycle and the turn engine for Cardroom.
//!
//! Each room runs as an isolated Tokio task (actor model). The actor is
//! the only writer for its room, so start/draw/play/pass, random events
//! and win checks for one room never interleave, while different rooms
//! proceed in parallel.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates/destroys rooms, hands out room handles
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`engine`]: the pure state machine the actor drives
//! - [`Broadcaster`]: where the actor sends notifications
//! - [`GameConfig`]: rule constants and room settings

mod config;
mod error;
mod manager;
mod notify;
mod room;

pub mod engine;

pub use config::GameConfig;
pub use engine::RandomEvent;
pub use error::{ErrorKind, GameError, NotifyError};
pub use manager::RoomManager;
pub use notify::{Broadcaster, ChannelBroadcaster, Observer};
pub use room::{PlayerView, RoomHandle, RoomInfo, RoomServices};
