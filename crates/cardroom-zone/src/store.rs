//! The persistence contract and an in-memory implementation.
//!
//! The engine never writes records one at a time. It stages a whole
//! [`RoomSnapshot`] and commits it; a store must apply a commit entirely
//! or not at all.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use cardroom_protocol::{PlayerId, RoomId};

use crate::{PlayerRecord, RoomRecord, RoomSnapshot, StoreError, ZoneAssignment, ZoneLedger};

/// Durable storage of rooms, players and zone assignments.
///
/// Methods are synchronous: implementations are expected to complete a
/// round-trip without waiting on anything else. Each room's operations
/// are already serialized by its actor, so a store only has to make each
/// individual call atomic.
pub trait GameStore: Send + Sync + 'static {
    /// Allocates a fresh room id.
    fn next_room_id(&self) -> Result<RoomId, StoreError>;

    /// Number of rooms currently stored.
    fn room_count(&self) -> Result<usize, StoreError>;

    /// Stores a new room.
    fn insert_room(&self, room: &RoomRecord) -> Result<(), StoreError>;

    /// Loads a room with its seated players and its zone ledger.
    fn load_room(&self, id: RoomId) -> Result<Option<RoomSnapshot>, StoreError>;

    /// Loads a single player record.
    fn load_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError>;

    /// Writes the room, every player record in the snapshot, and the
    /// room's zone ledger as one transaction.
    fn commit(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError>;

    /// Removes a room and its zone assignments, and detaches its players.
    fn delete_room(&self, id: RoomId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    last_room_id: u64,
    rooms: BTreeMap<RoomId, RoomRecord>,
    players: HashMap<PlayerId, PlayerRecord>,
    zones: HashMap<RoomId, Vec<ZoneAssignment>>,
}

/// A [`GameStore`] kept in process memory behind a single lock.
///
/// Holding the lock for the whole commit is what makes each commit
/// atomic: readers see either the old snapshot or the new one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    read_only: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While read-only, every commit is rejected without writing.
    /// Simulates a backing store outage.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl GameStore for InMemoryStore {
    fn next_room_id(&self) -> Result<RoomId, StoreError> {
        let mut tables = self.tables()?;
        tables.last_room_id += 1;
        Ok(RoomId(tables.last_room_id))
    }

    fn room_count(&self) -> Result<usize, StoreError> {
        Ok(self.tables()?.rooms.len())
    }

    fn insert_room(&self, room: &RoomRecord) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.rooms.contains_key(&room.id) {
            return Err(StoreError::RoomExists(room.id));
        }
        tables.last_room_id = tables.last_room_id.max(room.id.0);
        tables.rooms.insert(room.id, room.clone());
        Ok(())
    }

    fn load_room(&self, id: RoomId) -> Result<Option<RoomSnapshot>, StoreError> {
        let tables = self.tables()?;
        let Some(room) = tables.rooms.get(&id) else {
            return Ok(None);
        };

        let mut players = Vec::with_capacity(room.players.len());
        for player_id in &room.players {
            match tables.players.get(player_id) {
                Some(record) => players.push(record.clone()),
                None => {
                    tracing::warn!(room_id = %id, %player_id, "seated player has no record");
                }
            }
        }

        let assignments = tables.zones.get(&id).cloned().unwrap_or_default();
        let zones = ZoneLedger::from_assignments(id, assignments)?;

        Ok(Some(RoomSnapshot {
            room: room.clone(),
            players,
            zones,
        }))
    }

    fn load_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.tables()?.players.get(&id).cloned())
    }

    fn commit(&self, snapshot: &RoomSnapshot) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("store is read-only".into()));
        }
        let room_id = snapshot.room.id;

        // Validate everything before the first write.
        snapshot.zones.check_integrity()?;
        if snapshot.zones.room_id() != room_id {
            return Err(StoreError::Rejected(format!(
                "ledger of room {} committed with room {}",
                snapshot.zones.room_id(),
                room_id
            )));
        }

        let mut tables = self.tables()?;
        if !tables.rooms.contains_key(&room_id) {
            return Err(StoreError::UnknownRoom(room_id));
        }

        tables.rooms.insert(room_id, snapshot.room.clone());
        for player in &snapshot.players {
            tables.players.insert(player.id, player.clone());
        }
        tables
            .zones
            .insert(room_id, snapshot.zones.assignments().to_vec());

        tracing::trace!(%room_id, "snapshot committed");
        Ok(())
    }

    fn delete_room(&self, id: RoomId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if tables.rooms.remove(&id).is_none() {
            return Err(StoreError::UnknownRoom(id));
        }
        tables.zones.remove(&id);
        for player in tables.players.values_mut() {
            if player.room == Some(id) {
                player.room = None;
            }
        }
        Ok(())
    }
}
