use crate::state::ConnectionState;
use songcast_protocol::Command;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A client's [`ConnectionState`] plus the signal that wakes its outbound
/// handler when there is something new to do.
#[derive(Debug)]
pub struct Connection {
    state: Mutex<ConnectionState>,
    wake: Notify,
}

pub type SharedConnection = Arc<Connection>;

impl Connection {
    pub fn new(id: u64) -> SharedConnection {
        Arc::new(Self {
            state: Mutex::new(ConnectionState::new(id)),
            wake: Notify::new(),
        })
    }

    pub fn lock(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> u64 {
        self.lock().id
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected()
    }

    pub fn enqueue(&self, command: Command) {
        if self.lock().enqueue(command) {
            self.wake.notify_one();
        }
    }

    pub fn disconnect(&self) -> bool {
        let flipped = self.lock().disconnect();
        self.wake.notify_one();
        flipped
    }

    /// Suspend until [`enqueue`](Self::enqueue) or
    /// [`disconnect`](Self::disconnect) is called. A notification sent while
    /// nobody waits is kept for the next call.
    pub async fn woken(&self) {
        self.wake.notified().await;
    }
}
