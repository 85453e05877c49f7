//! Restaurant documents and the derived average rating.

pub mod rating;
mod types;

pub use rating::{AVERAGE_RATING_FIELD, GRADE_SCORE_PATH, average_rating};
pub use types::{Address, Grade, Restaurant};
