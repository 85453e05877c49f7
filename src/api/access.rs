use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use uuid::Uuid;

use crate::utils::logger::ACCESS_TARGET;
use crate::utils::num::u128_to_u64_saturating;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// One access-log line per request; the id is echoed in `x-request-id`.
pub async fn access_log(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let mut resp = next.run(req).await;

    let ms = u128_to_u64_saturating(started.elapsed().as_millis());
    log::info!(target: ACCESS_TARGET, "{id} {method} {uri} {} {ms}ms", resp.status().as_u16());
    if let Ok(v) = HeaderValue::from_str(&id.to_string()) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, v);
    }
    resp
}
