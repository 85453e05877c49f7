//! Document store seam.
//!
//! The HTTP layer only sees [`RestaurantStore`]; the bundled [`MemoryStore`]
//! keeps the collection in memory and runs queries on the blocking pool.

mod load;
mod memory;

use bson::Document as BsonDocument;
use std::future::Future;

use crate::errors::DirectoryError;
use crate::query::{Filter, Pipeline};

pub use load::{LoadReport, load_documents, read_documents};
pub use memory::MemoryStore;

/// Read-only access to the restaurant collection.
///
/// Every call is attempted exactly once; failures surface as
/// `DirectoryError::StoreError` and are never retried here.
pub trait RestaurantStore: Send + Sync + 'static {
    /// Runs an aggregation pipeline and returns the resulting documents.
    fn aggregate(
        &self,
        pipeline: Pipeline,
    ) -> impl Future<Output = Result<Vec<BsonDocument>, DirectoryError>> + Send;

    /// Number of documents matching `filter`.
    fn count(&self, filter: Filter) -> impl Future<Output = Result<u64, DirectoryError>> + Send;

    /// First document matching `filter`, in collection order.
    fn find_one(
        &self,
        filter: Filter,
    ) -> impl Future<Output = Result<Option<BsonDocument>, DirectoryError>> + Send;
}
