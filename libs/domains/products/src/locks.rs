//! Per-entity serialization of read-modify-write cycles

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::store::EntityId;

/// Purge dead entries every N acquisitions.
const CLEANUP_INTERVAL: usize = 64;

/// Map size below which cleanup is skipped.
const CLEANUP_THRESHOLD: usize = 128;

/// Registry of per-id async mutexes.
///
/// Operations on the same id queue up behind each other; different ids never
/// contend. Entries are held weakly and dropped once no guard is alive.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<EntityId, Weak<AsyncMutex<()>>>>,
    acquisitions: AtomicUsize,
}

/// Exclusive access to one entity id until dropped.
#[derive(Debug)]
pub struct KeyGuard {
    id: EntityId,
    _guard: OwnedMutexGuard<()>,
}

impl KeyGuard {
    pub fn id(&self) -> EntityId {
        self.id
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: EntityId) -> KeyGuard {
        let mutex = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

            let mutex = map.get(&id).and_then(Weak::upgrade).unwrap_or_else(|| {
                let fresh = Arc::new(AsyncMutex::new(()));
                map.insert(id, Arc::downgrade(&fresh));
                fresh
            });

            let tick = self.acquisitions.fetch_add(1, Ordering::Relaxed);
            if map.len() > CLEANUP_THRESHOLD && tick % CLEANUP_INTERVAL == 0 {
                map.retain(|_, weak| weak.strong_count() > 0);
            }

            mutex
        };

        KeyGuard {
            id,
            _guard: mutex.lock_owned().await,
        }
    }

    /// Number of ids currently tracked, live or not yet purged.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    fn purge(&self) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, weak| weak.strong_count() > 0);
    }
}
