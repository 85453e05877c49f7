//! Listing requests: raw query parameters -> typed query -> store pipeline ->
//! response envelope.

mod params;
mod shaper;

pub use params::{ListingQuery, PageLimits, RawListingParams, SortKey, parse_listing};
pub use shaper::{
    CategoryList, ListingPage, build_pipeline, fetch_listing, fetch_restaurant, total_pages,
};
