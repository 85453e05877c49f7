// Submodules for separation of concerns
mod eval;
mod exec;
mod types;

// Public API re-exports
pub use eval::{compare_bson, compare_docs, eval_filter, resolve_path};
pub use exec::{count_docs, find_one, run_pipeline};
pub use types::{Filter, Order, Pipeline, SortSpec, Stage};
