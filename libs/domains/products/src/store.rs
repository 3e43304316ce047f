//! Entity Store - generic keyed persistence contract

use async_trait::async_trait;
use thiserror::Error;

/// Integer key assigned by the store at creation time.
pub type EntityId = i32;

/// Anything the store can persist under an integer key.
///
/// An entity whose id is `0` has not been persisted yet.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> EntityId;

    /// Called once by the store when the entity is created.
    fn assign_id(&mut self, id: EntityId);
}

/// Failures raised by a storage backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No stored entity with ID {0}")]
    Missing(EntityId),

    #[error("ID sequence exhausted (maximum {max})")]
    IdSpaceExhausted { max: EntityId },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Store trait for keyed entity persistence
///
/// The core depends only on this contract. Backends synchronize their own
/// internal state; a missing id is reported as `None` by `fetch_by_id` and
/// never as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Every stored entity, or an empty vector
    async fn fetch_all(&self) -> StoreResult<Vec<E>>;

    /// The entity with the given id, if any
    async fn fetch_by_id(&self, id: EntityId) -> StoreResult<Option<E>>;

    /// Assign a fresh id, persist, and return the stored entity
    async fn create(&self, entity: E) -> StoreResult<E>;

    /// Overwrite the entity stored under `entity.id()`
    async fn update(&self, entity: E) -> StoreResult<()>;

    /// Remove the entity stored under `id`
    async fn delete(&self, id: EntityId) -> StoreResult<()>;
}
