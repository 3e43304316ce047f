//! In-memory Entity Store backend

use async_trait::async_trait;
use core_config::store::StoreConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::{Entity, EntityId, EntityStore, StoreError, StoreResult};

/// Monotonic id source bounded by `[start, max]`.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: EntityId,
    max: EntityId,
    exhausted: bool,
}

impl IdSequence {
    pub fn new(start: EntityId, max: EntityId) -> Self {
        Self {
            next: start,
            max,
            exhausted: false,
        }
    }

    fn advance(&mut self) -> StoreResult<EntityId> {
        if self.exhausted || self.next > self.max {
            return Err(StoreError::IdSpaceExhausted { max: self.max });
        }
        let id = self.next;
        match id.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        Ok(id)
    }
}

impl From<StoreConfig> for IdSequence {
    fn from(config: StoreConfig) -> Self {
        Self::new(config.id_start, config.id_max)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        StoreConfig::default().into()
    }
}

#[derive(Debug)]
struct Inner<E> {
    entities: BTreeMap<EntityId, E>,
    ids: IdSequence,
}

/// In-memory implementation of EntityStore (for development/testing)
///
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct InMemoryEntityStore<E> {
    inner: Arc<RwLock<Inner<E>>>,
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self::with_sequence(IdSequence::default())
    }

    pub fn with_sequence(ids: IdSequence) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entities: BTreeMap::new(),
                ids,
            })),
        }
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.inner.read().await.entities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E: Entity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn fetch_all(&self) -> StoreResult<Vec<E>> {
        let inner = self.inner.read().await;
        Ok(inner.entities.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: EntityId) -> StoreResult<Option<E>> {
        let inner = self.inner.read().await;
        Ok(inner.entities.get(&id).cloned())
    }

    async fn create(&self, mut entity: E) -> StoreResult<E> {
        let mut inner = self.inner.write().await;
        let id = inner.ids.advance()?;
        entity.assign_id(id);
        inner.entities.insert(id, entity.clone());

        tracing::debug!(entity_id = id, "Stored new entity");
        Ok(entity)
    }

    async fn update(&self, entity: E) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.entities.get_mut(&entity.id()) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(StoreError::Missing(entity.id())),
        }
    }

    async fn delete(&self, id: EntityId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .entities
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::Missing(id))
    }
}
