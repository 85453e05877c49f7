//! Restaurant directory service.
//!
//! Serves a read-only restaurant collection over HTTP: filtered, sorted and
//! paginated listings with a derived `averageRating`, single lookups by
//! `restaurant_id`, and a static table of cuisine categories.
//!
//! Request flow: [`listing::parse_listing`] turns the raw query string into a
//! typed [`listing::ListingQuery`]; [`listing::fetch_listing`] runs it as a
//! [`query::Pipeline`] against a [`store::RestaurantStore`] and shapes the
//! response envelope.

pub mod api;
pub mod categories;
pub mod config;
pub mod errors;
pub mod listing;
pub mod query;
pub mod restaurant;
pub mod store;
pub mod utils;

pub use categories::CategoryMap;
pub use config::AppConfig;
pub use errors::DirectoryError;
pub use restaurant::Restaurant;
pub use store::{MemoryStore, RestaurantStore};
