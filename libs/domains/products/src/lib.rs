//! Products Domain
//!
//! Product inventory: catalog CRUD plus stock adjustments that never let a
//! product's stock go negative, even under concurrent requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← DTO mapping, validation, failure logging
//! └──┬───────┬──┘
//!    │       │
//!    │ ┌─────▼─────┐
//!    │ │   Stock   │  ← invariant-preserving increment/decrement
//!    │ └─────┬─────┘
//!    │       │        (both serialize per id through KeyedLocks)
//! ┌──▼───────▼──┐
//! │ EntityStore │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryEntityStore, Product, ProductService};
//!
//! let store: InMemoryEntityStore<Product> = InMemoryEntityStore::new();
//! let service = ProductService::new(store);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod locks;
pub mod memory;
pub mod models;
pub mod service;
pub mod stock;
pub mod store;

// Re-export commonly used types
pub use error::{ErrorKind, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use locks::KeyedLocks;
pub use memory::{IdSequence, InMemoryEntityStore};
pub use models::{CreateProduct, Product, ProductDto, StockAdjusted, StockChange, UpdateProduct};
pub use service::ProductService;
pub use stock::{StockDirection, StockMutator};
pub use store::{Entity, EntityId, EntityStore, StoreError, StoreResult};
