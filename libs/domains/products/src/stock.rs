//! Stock Mutator - invariant-preserving stock adjustments
//!
//! Each adjustment is one load → check → apply → persist cycle executed while
//! holding the product's key lock, so concurrent adjustments of the same
//! product observe each other's writes. `stock >= 0` holds after every
//! successful call; a failed call leaves the stored product untouched and
//! never reaches `EntityStore::update`.

use std::sync::Arc;
use strum::Display;
use tracing::debug;

use crate::error::{ProductError, ProductResult};
use crate::locks::KeyedLocks;
use crate::models::Product;
use crate::store::{EntityId, EntityStore};

/// Direction of a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StockDirection {
    Increment,
    Decrement,
}

pub struct StockMutator<S> {
    store: Arc<S>,
    locks: Arc<KeyedLocks>,
}

impl<S: EntityStore<Product>> StockMutator<S> {
    pub fn new(store: Arc<S>, locks: Arc<KeyedLocks>) -> Self {
        Self { store, locks }
    }

    /// Remove `quantity` units; fails with `InsufficientStock` rather than go negative.
    pub async fn decrement(&self, id: EntityId, quantity: i32) -> ProductResult<Product> {
        self.adjust(id, quantity, StockDirection::Decrement).await
    }

    /// Add `quantity` units.
    pub async fn increment(&self, id: EntityId, quantity: i32) -> ProductResult<Product> {
        self.adjust(id, quantity, StockDirection::Increment).await
    }

    async fn adjust(
        &self,
        id: EntityId,
        quantity: i32,
        direction: StockDirection,
    ) -> ProductResult<Product> {
        if quantity <= 0 {
            return Err(ProductError::InvalidInput(format!(
                "Quantity must be a positive number, got {}.",
                quantity
            )));
        }

        let _guard = self.locks.acquire(id).await;

        let mut product = self
            .store
            .fetch_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.stock = match direction {
            StockDirection::Decrement => {
                if product.stock < quantity {
                    return Err(ProductError::InsufficientStock {
                        id,
                        available: product.stock,
                        requested: quantity,
                    });
                }
                product.stock - quantity
            }
            StockDirection::Increment => product.stock.checked_add(quantity).ok_or_else(|| {
                ProductError::InvalidInput(format!(
                    "Adding {} units to product with ID {} would exceed the maximum stock of {}.",
                    quantity,
                    id,
                    i32::MAX
                ))
            })?,
        };

        self.store.update(product.clone()).await?;

        debug!(product_id = id, %direction, quantity, stock = product.stock, "Stock adjusted");
        Ok(product)
    }
}

impl<S> Clone for StockMutator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{MockEntityStore, StoreError};
    use mockall::predicate::eq;

    fn widget(stock: i32) -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            stock,
        }
    }

    fn mutator(store: MockEntityStore<Product>) -> StockMutator<MockEntityStore<Product>> {
        StockMutator::new(Arc::new(store), Arc::new(KeyedLocks::new()))
    }

    fn store_with(stock: i32) -> MockEntityStore<Product> {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .with(eq(1))
            .times(1)
            .returning(move |_| Ok(Some(widget(stock))));
        store
    }

    #[tokio::test]
    async fn test_decrement_within_stock() {
        let mut store = store_with(12);
        store
            .expect_update()
            .withf(|p: &Product| p.id == 1 && p.stock == 7)
            .times(1)
            .returning(|_| Ok(()));

        let product = mutator(store).decrement(1, 5).await.unwrap();
        assert_eq!(product.stock, 7);
    }

    #[tokio::test]
    async fn test_increment() {
        let mut store = store_with(12);
        store
            .expect_update()
            .withf(|p: &Product| p.stock == 17)
            .times(1)
            .returning(|_| Ok(()));

        let product = mutator(store).increment(1, 5).await.unwrap();
        assert_eq!(product.stock, 17);
    }

    #[tokio::test]
    async fn test_decrement_to_exactly_zero() {
        let mut store = store_with(5);
        store
            .expect_update()
            .withf(|p: &Product| p.stock == 0)
            .times(1)
            .returning(|_| Ok(()));

        let product = mutator(store).decrement(1, 5).await.unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_decrement_beyond_stock_never_updates() {
        let mut store = store_with(3);
        store.expect_update().never();

        let err = mutator(store).decrement(1, 5).await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::InsufficientStock {
                id: 1,
                available: 3,
                requested: 5
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        for direction in [StockDirection::Increment, StockDirection::Decrement] {
            let mut store = MockEntityStore::<Product>::new();
            store
                .expect_fetch_by_id()
                .with(eq(999))
                .times(1)
                .returning(|_| Ok(None));
            store.expect_update().never();

            let err = mutator(store).adjust(999, 1, direction).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{direction}");
        }
    }

    #[tokio::test]
    async fn test_non_positive_quantity_touches_nothing() {
        for quantity in [0, -1, i32::MIN] {
            let mut store = MockEntityStore::<Product>::new();
            store.expect_fetch_by_id().never();
            store.expect_update().never();
            let mutator = mutator(store);

            let err = mutator.decrement(1, quantity).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            let err = mutator.increment(1, quantity).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[tokio::test]
    async fn test_increment_overflow_is_rejected() {
        let mut store = store_with(i32::MAX - 1);
        store.expect_update().never();

        let err = mutator(store).increment(1, 2).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_unexpected() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("disk on fire".into())));
        store.expect_update().never();

        let err = mutator(store).increment(1, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }

    #[tokio::test]
    async fn test_update_failure_is_unexpected() {
        let mut store = store_with(10);
        store
            .expect_update()
            .times(1)
            .returning(|p| Err(StoreError::Missing(p.id)));

        let err = mutator(store).decrement(1, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::Unexpected(StoreError::Missing(1))
        ));
    }
}
