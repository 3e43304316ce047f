//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::locks::KeyedLocks;
use crate::models::{CreateProduct, Product, ProductDto, UpdateProduct};
use crate::stock::StockMutator;
use crate::store::{EntityId, EntityStore};

/// Product service providing the public operation set
///
/// Translates between stored entities and DTOs, runs plain CRUD against the
/// store and hands stock adjustments to the [`StockMutator`]. Every failure
/// is logged once here and returned unchanged.
///
/// Clones share the store and the key locks, so `update`, `delete` and stock
/// adjustments on the same id are serialized across all clones.
pub struct ProductService<S: EntityStore<Product>> {
    store: Arc<S>,
    locks: Arc<KeyedLocks>,
    stock: StockMutator<S>,
}

impl<S: EntityStore<Product>> ProductService<S> {
    /// Create a new ProductService with the given store
    pub fn new(store: S) -> Self {
        let store = Arc::new(store);
        let locks = Arc::new(KeyedLocks::new());
        let stock = StockMutator::new(Arc::clone(&store), Arc::clone(&locks));
        Self {
            store,
            locks,
            stock,
        }
    }

    /// List every product
    ///
    /// An empty catalog is reported as `CatalogEmpty`, not as an empty list.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ProductResult<Vec<ProductDto>> {
        let result: ProductResult<Vec<ProductDto>> = async {
            let products = self.store.fetch_all().await?;
            if products.is_empty() {
                return Err(ProductError::CatalogEmpty);
            }
            Ok(products.into_iter().map(ProductDto::from).collect())
        }
        .await;

        result.inspect_err(|e| e.log("list_all"))
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: EntityId) -> ProductResult<ProductDto> {
        let result: ProductResult<ProductDto> = async {
            self.store
                .fetch_by_id(id)
                .await?
                .map(ProductDto::from)
                .ok_or(ProductError::NotFound(id))
        }
        .await;

        result.inspect_err(|e| e.log("get_by_id"))
    }

    /// Create a new product; the store assigns the id
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: CreateProduct) -> ProductResult<ProductDto> {
        let result: ProductResult<ProductDto> = async {
            input
                .validate()
                .map_err(|e| ProductError::InvalidInput(e.to_string()))?;

            let stored = self.store.create(Product::from(input)).await?;
            tracing::info!(product_id = stored.id, "Created product");
            Ok(ProductDto::from(stored))
        }
        .await;

        result.inspect_err(|e| e.log("create"))
    }

    /// Overwrite name and stock of an existing product
    ///
    /// An unknown id is a caller error here (`InvalidInput`), not `NotFound`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: EntityId, input: UpdateProduct) -> ProductResult<()> {
        let result: ProductResult<()> = async {
            input
                .validate()
                .map_err(|e| ProductError::InvalidInput(e.to_string()))?;

            let _guard = self.locks.acquire(id).await;

            let mut product = self.store.fetch_by_id(id).await?.ok_or_else(|| {
                ProductError::InvalidInput(format!("Product with ID {} does not exist.", id))
            })?;

            product.apply_update(input);
            self.store.update(product).await?;
            Ok(())
        }
        .await;

        result.inspect_err(|e| e.log("update"))
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EntityId) -> ProductResult<()> {
        let result: ProductResult<()> = async {
            let _guard = self.locks.acquire(id).await;

            if self.store.fetch_by_id(id).await?.is_none() {
                return Err(ProductError::NotFound(id));
            }

            self.store.delete(id).await?;
            tracing::info!(product_id = id, "Deleted product");
            Ok(())
        }
        .await;

        result.inspect_err(|e| e.log("delete"))
    }

    /// Remove `quantity` units from stock
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: EntityId, quantity: i32) -> ProductResult<ProductDto> {
        self.stock
            .decrement(id, quantity)
            .await
            .map(ProductDto::from)
            .inspect_err(|e| e.log("decrement_stock"))
    }

    /// Add `quantity` units to stock
    #[instrument(skip(self))]
    pub async fn add_stock(&self, id: EntityId, quantity: i32) -> ProductResult<ProductDto> {
        self.stock
            .increment(id, quantity)
            .await
            .map(ProductDto::from)
            .inspect_err(|e| e.log("add_stock"))
    }
}

impl<S: EntityStore<Product>> Clone for ProductService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
            stock: self.stock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{MockEntityStore, StoreError};
    use mockall::predicate::eq;

    fn widget(id: EntityId, stock: i32) -> Product {
        Product {
            id,
            name: "Widget".to_string(),
            stock,
        }
    }

    #[tokio::test]
    async fn test_list_all_maps_every_product() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(vec![widget(1, 12), widget(2, 0)]));

        let products = ProductService::new(store).list_all().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[1].stock, 0);
    }

    #[tokio::test]
    async fn test_list_all_empty_catalog_is_not_found() {
        let mut store = MockEntityStore::<Product>::new();
        store.expect_fetch_all().times(1).returning(|| Ok(vec![]));

        let err = ProductService::new(store).list_all().await.unwrap_err();

        assert!(matches!(err, ProductError::CatalogEmpty));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .with(eq(999))
            .times(1)
            .returning(|_| Ok(None));

        let err = ProductService::new(store).get_by_id(999).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_create_passes_unsaved_entity_to_store() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_create()
            .withf(|p: &Product| p.id == 0 && p.name == "Widget" && p.stock == 12)
            .times(1)
            .returning(|mut p| {
                p.id = 100000;
                Ok(p)
            });

        let dto = ProductService::new(store)
            .create(CreateProduct {
                name: "Widget".to_string(),
                stock: 12,
            })
            .await
            .unwrap();

        assert_eq!(
            dto,
            ProductDto {
                id: 100000,
                name: "Widget".to_string(),
                stock: 12
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_store() {
        let mut store = MockEntityStore::<Product>::new();
        store.expect_create().never();
        let service = ProductService::new(store);

        let err = service
            .create(CreateProduct {
                name: String::new(),
                stock: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = service
            .create(CreateProduct {
                name: "Widget".to_string(),
                stock: -3,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_update_overwrites_name_and_stock() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(Some(widget(id, 12))));
        store
            .expect_update()
            .withf(|p: &Product| p.id == 1 && p.name == "Gadget" && p.stock == 4)
            .times(1)
            .returning(|_| Ok(()));

        ProductService::new(store)
            .update(
                1,
                UpdateProduct {
                    name: "Gadget".to_string(),
                    stock: 4,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_invalid_input() {
        let mut store = MockEntityStore::<Product>::new();
        store.expect_fetch_by_id().times(1).returning(|_| Ok(None));
        store.expect_update().never();

        let err = ProductService::new(store)
            .update(
                42,
                UpdateProduct {
                    name: "Gadget".to_string(),
                    stock: 4,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("42"));
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(Some(widget(id, 1))));
        store
            .expect_delete()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        ProductService::new(store).delete(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_never_calls_store_delete() {
        let mut store = MockEntityStore::<Product>::new();
        store.expect_fetch_by_id().times(1).returning(|_| Ok(None));
        store.expect_delete().never();

        let err = ProductService::new(store).delete(7).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_stock_operations_delegate_to_mutator() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(Some(widget(id, 12))));
        store
            .expect_update()
            .withf(|p: &Product| p.stock == 7)
            .times(1)
            .returning(|_| Ok(()));

        let dto = ProductService::new(store).decrement_stock(1, 5).await.unwrap();
        assert_eq!(dto.stock, 7);
    }

    #[tokio::test]
    async fn test_store_failures_propagate_as_unexpected() {
        let mut store = MockEntityStore::<Product>::new();
        store
            .expect_fetch_all()
            .returning(|| Err(StoreError::Unavailable("timeout".into())));
        store
            .expect_fetch_by_id()
            .returning(|_| Err(StoreError::Unavailable("timeout".into())));
        store
            .expect_create()
            .returning(|_| Err(StoreError::IdSpaceExhausted { max: 999_999 }));
        let service = ProductService::new(store);

        assert_eq!(
            service.list_all().await.unwrap_err().kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            service.get_by_id(1).await.unwrap_err().kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            service.delete(1).await.unwrap_err().kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            service.add_stock(1, 1).await.unwrap_err().kind(),
            ErrorKind::Unexpected
        );
        assert_eq!(
            service
                .create(CreateProduct {
                    name: "Widget".to_string(),
                    stock: 0
                })
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::Unexpected
        );
    }

    mod in_memory {
        use super::*;
        use crate::memory::InMemoryEntityStore;

        async fn with_product(stock: i32) -> (ProductService<InMemoryEntityStore<Product>>, EntityId) {
            let service = ProductService::new(InMemoryEntityStore::new());
            let created = service
                .create(CreateProduct {
                    name: "Widget".to_string(),
                    stock,
                })
                .await
                .unwrap();
            (service, created.id)
        }

        #[tokio::test]
        async fn test_decrement_then_read_back() {
            let (service, id) = with_product(12).await;

            assert_eq!(service.decrement_stock(id, 5).await.unwrap().stock, 7);
            assert_eq!(service.get_by_id(id).await.unwrap().stock, 7);
        }

        #[tokio::test]
        async fn test_add_then_read_back() {
            let (service, id) = with_product(12).await;

            assert_eq!(service.add_stock(id, 5).await.unwrap().stock, 17);
            assert_eq!(service.get_by_id(id).await.unwrap().stock, 17);
        }

        #[tokio::test]
        async fn test_insufficient_stock_leaves_product_unchanged() {
            let (service, id) = with_product(3).await;

            let err = service.decrement_stock(id, 5).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InsufficientStock);
            assert_eq!(service.get_by_id(id).await.unwrap().stock, 3);
        }

        #[tokio::test]
        async fn test_empty_store_reads() {
            let service = ProductService::new(InMemoryEntityStore::<Product>::new());

            assert_eq!(
                service.get_by_id(999).await.unwrap_err().kind(),
                ErrorKind::NotFound
            );
            assert_eq!(
                service.list_all().await.unwrap_err().kind(),
                ErrorKind::NotFound
            );
        }

        #[tokio::test]
        async fn test_clones_share_catalog() {
            let (service, id) = with_product(1).await;
            let clone = service.clone();

            clone.delete(id).await.unwrap();
            assert!(matches!(
                service.get_by_id(id).await,
                Err(ProductError::NotFound(_))
            ));
        }
    }
}
