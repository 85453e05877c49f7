use bson::Bson;
use serde::{Deserialize, Serialize};

use super::params::ListingQuery;
use crate::categories::CategoryMap;
use crate::errors::DirectoryError;
use crate::query::{Filter, Pipeline, SortSpec, Stage};
use crate::restaurant::{AVERAGE_RATING_FIELD, GRADE_SCORE_PATH, Restaurant};
use crate::store::RestaurantStore;
use crate::utils::num::usize_to_u64;

/// Response body of `GET /restaurants`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub restaurants: Vec<Restaurant>,
    pub total_pages: u64,
    pub current_page: usize,
    pub total_restaurants: u64,
}

/// Response body of `GET /categories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryList {
    pub count: usize,
    pub categories: Vec<String>,
}

impl CategoryList {
    #[must_use]
    pub fn from_map(map: &CategoryMap) -> Self {
        let categories: Vec<String> = map.names().map(str::to_string).collect();
        Self { count: categories.len(), categories }
    }
}

/// Match, attach `averageRating`, sort, skip, limit. In that order.
#[must_use]
pub fn build_pipeline(q: &ListingQuery) -> Pipeline {
    Pipeline::new()
        .stage(Stage::Match(q.filter.clone()))
        .stage(Stage::AddAverage {
            field: AVERAGE_RATING_FIELD.to_string(),
            source: GRADE_SCORE_PATH.to_string(),
        })
        .stage(Stage::Sort(vec![SortSpec { field: q.sort.field().to_string(), order: q.order }]))
        .stage(Stage::Skip(q.offset))
        .stage(Stage::Limit(q.limit))
}

#[must_use]
pub fn total_pages(total: u64, limit: usize) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(usize_to_u64(limit))
}

/// Runs the page query and the total count concurrently against the same
/// filter. Either failing fails the whole request.
///
/// # Errors
/// Propagates store errors and documents that cannot be decoded.
pub async fn fetch_listing<S: RestaurantStore>(
    store: &S,
    q: &ListingQuery,
) -> Result<ListingPage, DirectoryError> {
    let pipeline = build_pipeline(q);
    let (docs, total) =
        tokio::try_join!(store.aggregate(pipeline), store.count(q.filter.clone()))?;

    let mut restaurants = Vec::with_capacity(docs.len());
    for doc in &docs {
        let mut r = Restaurant::from_document(doc)?;
        if let Some(avg) = Restaurant::aggregated_rating(doc) {
            r.average_rating = avg;
        }
        restaurants.push(r);
    }
    Ok(ListingPage {
        restaurants,
        total_pages: total_pages(total, q.limit),
        current_page: q.page,
        total_restaurants: total,
    })
}

/// Looks a single restaurant up by its `restaurant_id`.
///
/// # Errors
/// `NoSuchRestaurant` when no document carries `id`; store errors otherwise.
pub async fn fetch_restaurant<S: RestaurantStore>(
    store: &S,
    id: &str,
) -> Result<Restaurant, DirectoryError> {
    let filter = Filter::Eq { path: "restaurant_id".to_string(), value: Bson::String(id.to_string()) };
    match store.find_one(filter).await? {
        Some(doc) => Restaurant::from_document(&doc),
        None => Err(DirectoryError::NoSuchRestaurant(id.to_string())),
    }
}
