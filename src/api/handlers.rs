use axum::Json;
use axum::extract::{Path, Query, State};

use super::error::ApiError;
use super::state::SharedState;
use crate::listing::{
    CategoryList, ListingPage, RawListingParams, fetch_listing, fetch_restaurant, parse_listing,
};
use crate::restaurant::Restaurant;
use crate::store::RestaurantStore;

pub const LIVENESS_MESSAGE: &str = "Server is running!";

pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn list_restaurants<S: RestaurantStore>(
    State(state): State<SharedState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListingPage>, ApiError> {
    let on_err = || ApiError::with_fallback("Error fetching restaurants");
    let raw = RawListingParams::from_pairs(pairs);
    let query = parse_listing(&raw, &state.categories, &state.limits).map_err(on_err())?;
    let page = fetch_listing(&state.store, &query).await.map_err(on_err())?;
    Ok(Json(page))
}

pub async fn get_restaurant<S: RestaurantStore>(
    State(state): State<SharedState<S>>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let restaurant = fetch_restaurant(&state.store, &restaurant_id)
        .await
        .map_err(ApiError::with_fallback("Error fetching restaurant"))?;
    Ok(Json(restaurant))
}

pub async fn list_categories<S: RestaurantStore>(
    State(state): State<SharedState<S>>,
) -> Json<CategoryList> {
    Json(CategoryList::from_map(&state.categories))
}
