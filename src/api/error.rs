use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::errors::DirectoryError;

/// A [`DirectoryError`] on its way out of a handler.
///
/// Client errors become JSON `{"error": ...}`; everything else is logged with
/// its detail and answered with the handler's plain-text `fallback`.
#[derive(Debug)]
pub struct ApiError {
    pub source: DirectoryError,
    pub fallback: &'static str,
}

impl ApiError {
    pub fn with_fallback(fallback: &'static str) -> impl FnOnce(DirectoryError) -> Self {
        move |source| Self { source, fallback }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.source {
            DirectoryError::NoSuchRestaurant(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Restaurant not found" })))
                    .into_response()
            }
            ref e if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            e => {
                log::error!("{}: {e}", self.fallback);
                (StatusCode::INTERNAL_SERVER_ERROR, self.fallback).into_response()
            }
        }
    }
}
