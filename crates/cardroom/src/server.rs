//! `CardroomServer` builder and the operations it exposes.
//!
//! This is the entry point for embedding Cardroom. It ties together all
//! the layers: store and catalog → room actors → broadcaster, plus the
//! standalone match tracker.

use std::sync::Arc;

use cardroom_match::{MatchError, MatchState, MatchTracker};
use cardroom_protocol::{CardId, MatchId, PlayerId, RoomId};
use cardroom_room::engine::CardPlay;
use cardroom_room::{
    ChannelBroadcaster, GameConfig, GameError, Observer, RandomEvent, RoomHandle, RoomInfo,
    RoomManager, RoomServices,
};
use cardroom_zone::{
    CardCatalog, CardDefinition, GameStore, InMemoryCatalog, InMemoryStore, PlayerProfile,
};
use tokio::sync::Mutex;

use crate::CardroomError;

/// Shared server state.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
struct ServerState {
    rooms: Mutex<RoomManager>,
    matches: Mutex<MatchTracker>,
    broadcaster: Arc<ChannelBroadcaster>,
}

/// Builder for configuring a Cardroom server.
///
/// # Example
///
/// ```rust,ignore
/// use cardroom::prelude::*;
///
/// let server = CardroomServer::builder()
///     .config(GameConfig::seeded(7))
///     .catalog(my_catalog)
///     .build();
/// ```
pub struct CardroomServerBuilder {
    config: GameConfig,
    store: Option<Arc<dyn GameStore>>,
    catalog: Option<Arc<dyn CardCatalog>>,
}

impl CardroomServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            store: None,
            catalog: None,
        }
    }

    /// Sets the game configuration shared by every room.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the backing store. Defaults to an [`InMemoryStore`].
    pub fn store(mut self, store: Arc<dyn GameStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the card catalog rooms deal from. Defaults to an empty catalog.
    pub fn catalog(mut self, catalog: impl CardCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Sets a catalog that is shared with other owners.
    pub fn shared_catalog(mut self, catalog: Arc<dyn CardCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Builds the server. Rooms are spawned on the current Tokio runtime
    /// as they are created.
    pub fn build(self) -> CardroomServer {
        let store: Arc<dyn GameStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryStore::new()),
        };
        let catalog: Arc<dyn CardCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(InMemoryCatalog::new()),
        };
        let broadcaster = Arc::new(ChannelBroadcaster::new());
        let services = RoomServices::new(store, catalog, broadcaster.clone());

        tracing::info!(config = ?self.config, "cardroom server built");

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomManager::new(services, self.config)),
            matches: Mutex::new(MatchTracker::new()),
            broadcaster,
        });
        CardroomServer { state }
    }
}

impl Default for CardroomServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Cardroom game server.
///
/// Cheap to clone; clones share every room and match.
#[derive(Clone)]
pub struct CardroomServer {
    state: Arc<ServerState>,
}

impl CardroomServer {
    /// Creates a new builder.
    pub fn builder() -> CardroomServerBuilder {
        CardroomServerBuilder::new()
    }

    /// Clones a room's handle so the manager lock is released before the
    /// room is awaited.
    async fn room(&self, room_id: RoomId) -> Result<RoomHandle, GameError> {
        self.state.rooms.lock().await.handle(room_id).cloned()
    }

    // -----------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------

    /// Creates a room seating up to `max_players`.
    pub async fn create_room(&self, max_players: usize) -> Result<RoomId, CardroomError> {
        Ok(self.state.rooms.lock().await.create_room(max_players)?)
    }

    /// Seats a player in a room.
    ///
    /// Joins hold the manager lock, so two rooms can never seat the same
    /// player at once.
    pub async fn join_room(
        &self,
        room_id: RoomId,
        profile: PlayerProfile,
    ) -> Result<(), CardroomError> {
        let mut rooms = self.state.rooms.lock().await;
        Ok(rooms.join_room(room_id, profile).await?)
    }

    /// Returns a read-only view of a room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, CardroomError> {
        Ok(self.room(room_id).await?.info().await?)
    }

    /// Lists the rooms that still accept players.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        self.state.rooms.lock().await.list_rooms().await
    }

    /// Returns the room a player is seated in, if any.
    pub async fn player_room(&self, player: PlayerId) -> Result<Option<RoomId>, CardroomError> {
        Ok(self.state.rooms.lock().await.player_room(player)?)
    }

    /// Shuts a room down, deletes it, and closes its observer channels.
    pub async fn destroy_room(&self, room_id: RoomId) -> Result<(), CardroomError> {
        self.state.rooms.lock().await.destroy_room(room_id).await?;
        self.state.broadcaster.close_room(room_id);
        Ok(())
    }

    /// Subscribes to every future notification of a room.
    pub async fn subscribe(&self, room_id: RoomId) -> Result<Observer, CardroomError> {
        self.room(room_id).await?;
        Ok(self.state.broadcaster.subscribe(room_id)?)
    }

    // -----------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------

    pub async fn start_game(&self, room_id: RoomId) -> Result<(), CardroomError> {
        Ok(self.room(room_id).await?.start_game().await?)
    }

    pub async fn draw_card(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<CardDefinition, CardroomError> {
        Ok(self.room(room_id).await?.draw_card(player).await?)
    }

    pub async fn use_card(
        &self,
        room_id: RoomId,
        player: PlayerId,
        card: CardId,
    ) -> Result<CardPlay, CardroomError> {
        Ok(self.room(room_id).await?.use_card(player, card).await?)
    }

    pub async fn pass_turn(&self, room_id: RoomId, player: PlayerId) -> Result<(), CardroomError> {
        Ok(self.room(room_id).await?.pass_turn(player).await?)
    }

    /// Rolls a random event outside the action flow.
    pub async fn apply_random_event(
        &self,
        room_id: RoomId,
    ) -> Result<Option<RandomEvent>, CardroomError> {
        Ok(self.room(room_id).await?.apply_random_event().await?)
    }

    /// Runs a win check outside the action flow.
    pub async fn check_win_condition(
        &self,
        room_id: RoomId,
    ) -> Result<Option<PlayerId>, CardroomError> {
        Ok(self.room(room_id).await?.check_win_condition().await?)
    }

    // -----------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------

    /// Starts tracking a match, replacing any match with the same id.
    pub async fn create_match(
        &self,
        match_id: MatchId,
        player_order: Vec<PlayerId>,
    ) -> Result<MatchState, CardroomError> {
        let mut matches = self.state.matches.lock().await;
        Ok(matches.create(match_id, player_order)?.clone())
    }

    pub async fn get_match(&self, match_id: MatchId) -> Option<MatchState> {
        self.state.matches.lock().await.get(match_id).cloned()
    }

    /// Replaces a match wholesale. Returns `false` if it is not tracked.
    pub async fn update_match(&self, match_id: MatchId, state: MatchState) -> bool {
        self.state.matches.lock().await.update(match_id, state)
    }

    /// Reads, modifies and writes back a match under one lock.
    pub async fn update_match_with<F>(
        &self,
        match_id: MatchId,
        modify: F,
    ) -> Result<MatchState, CardroomError>
    where
        F: FnOnce(&mut MatchState) -> Result<(), MatchError>,
    {
        let mut matches = self.state.matches.lock().await;
        Ok(matches.update_with(match_id, modify)?.clone())
    }
}
