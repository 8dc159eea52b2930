use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::config::Config;
use crate::game::SessionId;
use crate::service::Arcade;

/// Per-session move serialisation. A move holds its session's guard across the
/// whole read, apply and write cycle.
#[derive(Debug, Default)]
pub struct MoveLocks {
    // Maps SessionId to the mutex guarding its updates.
    locks: RwLock<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl MoveLocks {
    pub async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(&id).cloned();
        let lock = match existing {
            Some(lock) => lock,
            None => self.locks.write().await.entry(id).or_default().clone(),
        };
        lock.lock_owned().await
    }

    pub async fn release(&self, id: SessionId) {
        self.locks.write().await.remove(&id);
    }

    /// Forgets the session's lock unless another caller still holds or awaits it.
    /// Call after dropping the guard returned by [`MoveLocks::acquire`].
    pub async fn release_idle(&self, id: SessionId) {
        let mut locks = self.locks.write().await;
        if locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&id);
        }
    }

    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }
}

pub struct AppState {
    pub arcade: Arcade,
    pub config: Arc<Config>,
}

pub type SharedState = Arc<AppState>;
