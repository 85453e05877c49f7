use bson::Document as BsonDocument;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use super::RestaurantStore;
use super::load::{LoadReport, load_documents};
use crate::errors::DirectoryError;
use crate::query::{Filter, Pipeline, count_docs, find_one, run_pipeline};
use crate::utils::num::usize_to_u64;

/// In-memory collection of restaurant documents.
///
/// Cloning is cheap and shares the underlying collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<Vec<BsonDocument>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").field("len", &self.len()).finish()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_documents(docs: Vec<BsonDocument>) -> Self {
        Self { docs: Arc::new(RwLock::new(docs)) }
    }

    /// Loads a JSON array or NDJSON export from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a record is not a valid
    /// restaurant document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, LoadReport), DirectoryError> {
        let store = Self::new();
        let report = load_documents(&store, path.as_ref())?;
        Ok((store, report))
    }

    pub fn insert_document(&self, doc: BsonDocument) {
        self.docs.write().push(doc);
    }

    pub fn insert_many<I: IntoIterator<Item = BsonDocument>>(&self, docs: I) -> usize {
        let mut guard = self.docs.write();
        let before = guard.len();
        guard.extend(docs);
        guard.len() - before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RestaurantStore for MemoryStore {
    async fn aggregate(&self, pipeline: Pipeline) -> Result<Vec<BsonDocument>, DirectoryError> {
        let docs = Arc::clone(&self.docs);
        let out = tokio::task::spawn_blocking(move || run_pipeline(&docs.read(), &pipeline)).await?;
        Ok(out)
    }

    async fn count(&self, filter: Filter) -> Result<u64, DirectoryError> {
        let docs = Arc::clone(&self.docs);
        let n = tokio::task::spawn_blocking(move || count_docs(&docs.read(), &filter)).await?;
        Ok(usize_to_u64(n))
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<BsonDocument>, DirectoryError> {
        let docs = Arc::clone(&self.docs);
        let hit = tokio::task::spawn_blocking(move || find_one(&docs.read(), &filter)).await?;
        Ok(hit)
    }
}
