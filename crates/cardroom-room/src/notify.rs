//! Notifier contract and a channel-backed observer registry.
//!
//! The engine never talks to a transport directly. A room actor stages
//! notifications while it works and, once the state change is committed,
//! hands each one to a [`Broadcaster`]. Delivery failures are logged and
//! dropped; they never undo the state change.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cardroom_protocol::{Notification, RoomId};
use tokio::sync::mpsc;

use crate::NotifyError;

/// Receiving end of a room subscription.
pub type Observer = mpsc::UnboundedReceiver<Notification>;

/// Delivers notifications to every observer of a room.
pub trait Broadcaster: Send + Sync + 'static {
    /// Sends `notification` to all observers of `notification.room_id`.
    fn broadcast(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// An in-process broadcaster: observers subscribe per room and receive
/// notifications on an unbounded channel.
///
/// Dropping an [`Observer`] unsubscribes it; closed channels are pruned on
/// the next broadcast to that room.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    rooms: Mutex<HashMap<RoomId, Vec<mpsc::UnboundedSender<Notification>>>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to every future notification of `room_id`.
    pub fn subscribe(&self, room_id: RoomId) -> Result<Observer, NotifyError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.rooms()?.entry(room_id).or_default().push(tx);
        tracing::debug!(%room_id, "observer subscribed");
        Ok(rx)
    }

    /// Number of live observers of `room_id`.
    pub fn observer_count(&self, room_id: RoomId) -> usize {
        self.rooms()
            .map(|rooms| {
                rooms
                    .get(&room_id)
                    .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Drops every subscription of `room_id`. Observers see their channel
    /// close.
    pub fn close_room(&self, room_id: RoomId) {
        if let Ok(mut rooms) = self.rooms() {
            rooms.remove(&room_id);
        }
    }

    fn rooms(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<RoomId, Vec<mpsc::UnboundedSender<Notification>>>>, NotifyError>
    {
        self.rooms.lock().map_err(|_| NotifyError::Poisoned)
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn broadcast(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut rooms = self.rooms()?;
        if let Some(senders) = rooms.get_mut(&notification.room_id) {
            senders.retain(|tx| tx.send(notification.clone()).is_ok());
        }
        Ok(())
    }
}

/// Hands staged notifications to the broadcaster, in order.
///
/// Fire-and-forget: a failed delivery is logged and the rest still go out.
pub(crate) fn dispatch(broadcaster: &dyn Broadcaster, notifications: Vec<Notification>) {
    for notification in notifications {
        if let Err(e) = broadcaster.broadcast(&notification) {
            tracing::warn!(
                room_id = %notification.room_id,
                event = %notification.name,
                error = %e,
                "notification not delivered"
            );
        }
    }
}
