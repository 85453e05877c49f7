use std::sync::Arc;

use crate::categories::CategoryMap;
use crate::config::AppConfig;
use crate::errors::DirectoryError;
use crate::listing::PageLimits;
use crate::store::{MemoryStore, RestaurantStore};

/// Everything a request handler reads. Built once at startup and never
/// mutated afterwards.
#[derive(Debug)]
pub struct AppState<S> {
    pub store: S,
    pub categories: Arc<CategoryMap>,
    pub limits: PageLimits,
}

pub type SharedState<S> = Arc<AppState<S>>;

impl<S: RestaurantStore> AppState<S> {
    pub fn new(store: S, categories: CategoryMap, limits: PageLimits) -> Self {
        Self { store, categories: Arc::new(categories), limits }
    }

    #[must_use]
    pub fn shared(self) -> SharedState<S> {
        Arc::new(self)
    }
}

impl AppState<MemoryStore> {
    /// Loads the category table and seed data named by `config`.
    ///
    /// # Errors
    /// Returns an error if either file cannot be read or parsed.
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectoryError> {
        let categories = CategoryMap::from_config(config)?;
        let store = match &config.data_path {
            Some(p) => MemoryStore::open(p)?.0,
            None => {
                log::warn!("no data path configured; serving an empty collection");
                MemoryStore::new()
            }
        };
        Ok(Self::new(store, categories, config.page_limits()))
    }
}
