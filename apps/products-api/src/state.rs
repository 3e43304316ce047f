//! Application state management

use domain_products::{InMemoryEntityStore, Product, ProductService};

use crate::config::Config;

pub type ProductStore = InMemoryEntityStore<Product>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub products: ProductService<ProductStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = InMemoryEntityStore::with_sequence(config.store.into());
        let products = ProductService::new(store);
        Self { config, products }
    }
}
