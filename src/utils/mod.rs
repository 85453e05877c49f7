//! Utility modules: logger, numeric conversions.
pub mod logger;
pub mod num;
