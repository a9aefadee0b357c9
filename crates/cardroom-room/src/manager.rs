//! Room manager: creates, tracks, and routes players to rooms.

use std::collections::HashMap;

use cardroom_protocol::{PlayerId, RoomId};
use cardroom_zone::{PlayerProfile, RoomRecord};

use crate::room::spawn_room;
use crate::{GameConfig, GameError, RoomHandle, RoomInfo, RoomServices};

/// Manages all active rooms.
///
/// Which player sits where is read from the store, not tracked here, so
/// eliminations made inside a room actor are visible without a callback.
pub struct RoomManager {
    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle>,
    services: RoomServices,
    config: GameConfig,
}

impl RoomManager {
    /// Creates a new, empty room manager. `config` is clamped first.
    pub fn new(services: RoomServices, config: GameConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            services,
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn services(&self) -> &RoomServices {
        &self.services
    }

    /// Creates a new room seating up to `max_players` and returns its ID.
    ///
    /// Rooms are named "Room N", where N is one more than the number of
    /// rooms in the store.
    pub fn create_room(&mut self, max_players: usize) -> Result<RoomId, GameError> {
        if max_players < self.config.min_players {
            return Err(GameError::InvalidSettings(format!(
                "max_players {max_players} is below min_players {}",
                self.config.min_players
            )));
        }

        let store = &self.services.store;
        let room_id = store.next_room_id()?;
        let name = format!("Room {}", store.room_count()? + 1);
        store.insert_room(&RoomRecord::new(room_id, name.as_str(), max_players))?;

        let handle = spawn_room(room_id, self.config.clone(), self.services.clone());
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, %name, max_players, "room created");
        Ok(room_id)
    }

    /// Returns a handle to a running room.
    ///
    /// Clone it to issue commands without holding on to the manager.
    pub fn handle(&self, room_id: RoomId) -> Result<&RoomHandle, GameError> {
        self.rooms
            .get(&room_id)
            .ok_or(GameError::RoomNotFound(room_id))
    }

    /// Seats a player in a room.
    ///
    /// A player can sit in at most one room at a time. Takes `&mut self`
    /// so joins are exclusive: the seat check in the target room and the
    /// commit that seats the player happen before any other join starts.
    pub async fn join_room(
        &mut self,
        room_id: RoomId,
        profile: PlayerProfile,
    ) -> Result<(), GameError> {
        self.handle(room_id)?.join(profile).await
    }

    /// Returns info about a specific room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, GameError> {
        self.handle(room_id)?.info().await
    }

    /// Shuts down a room and deletes it from the store. Its players are
    /// free to join another room afterwards.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), GameError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(GameError::RoomNotFound(room_id))?;

        let _ = handle.shutdown().await;
        self.services.store.delete_room(room_id)?;

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Returns the room a player is currently seated in, if any.
    pub fn player_room(&self, player_id: PlayerId) -> Result<Option<RoomId>, GameError> {
        Ok(self
            .services
            .store
            .load_player(player_id)?
            .and_then(|p| p.room))
    }

    /// Lists all rooms that are currently joinable.
    ///
    /// Queries each room actor for its current info. Rooms that fail
    /// to respond (e.g., shutting down) are silently skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                if info.is_joinable() {
                    infos.push(info);
                }
            }
        }
        infos.sort_by_key(|info| info.room_id);
        infos
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all active room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().copied().collect();
        ids.sort();
        ids
    }
}
