use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::dtos::WsEventDTO;

pub enum InternalSignal {
    Shutdown,
    Event(WsEventDTO),
}

/// One live connection per user. A second connection replaces the first,
/// which is told to shut down.
pub struct UserMap {
    users_online: DashMap<i64, UnboundedSender<InternalSignal>>,
}

impl Default for UserMap {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMap {
    pub fn new() -> Self {
        UserMap {
            users_online: DashMap::new(),
        }
    }

    #[instrument(skip(self, tx), fields(user_id))]
    pub fn register_online(&self, user_id: i64, tx: UnboundedSender<InternalSignal>) {
        info!("Registering user {} as online", user_id);
        if let Some(previous) = self.users_online.insert(user_id, tx) {
            debug!("Replacing previous connection");
            let _ = previous.send(InternalSignal::Shutdown);
        }
        info!("Total online users: {}", self.users_online.len());
    }

    /// Removes the entry only while it still belongs to `tx`, so a replaced
    /// connection cannot unregister its successor
    #[instrument(skip(self, tx), fields(user_id))]
    pub fn remove_from_online(&self, user_id: &i64, tx: &UnboundedSender<InternalSignal>) {
        info!("Removing user from online");
        self.users_online
            .remove_if(user_id, |_, current| current.same_channel(tx));
    }

    /// Drops the user's connection, used when the account goes away
    #[instrument(skip(self), fields(user_id))]
    pub fn disconnect(&self, user_id: &i64) {
        if let Some((_, tx)) = self.users_online.remove(user_id) {
            info!("Disconnecting user");
            let _ = tx.send(InternalSignal::Shutdown);
        }
    }

    /// Returns whether the event was handed to a live connection
    #[instrument(skip(self, event), fields(user_id))]
    pub fn send_if_online(&self, user_id: &i64, event: WsEventDTO) -> bool {
        let Some(entry) = self.users_online.get(user_id) else {
            debug!("User {} not online, event not pushed", user_id);
            return false;
        };

        match entry.value().send(InternalSignal::Event(event)) {
            Ok(()) => {
                debug!("Event pushed to online user");
                true
            }
            Err(e) => {
                warn!("Failed to push event to user: {:?}", e);
                false
            }
        }
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, user_id: &i64) -> bool {
        self.users_online.contains_key(user_id)
    }
}
