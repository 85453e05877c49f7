use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use restaurant_directory::api::{LIVENESS_MESSAGE, REQUEST_ID_HEADER};

use super::_support::{FailingStore, ORIGIN, app, app_with, categories, get, ids, restaurants, send};

#[tokio::test]
async fn root_reports_liveness() {
    let resp = get(app(), "/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text(), LIVENESS_MESSAGE);
}

#[tokio::test]
async fn default_listing_envelope() {
    let resp = get(app(), "/restaurants").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["totalRestaurants"], 7);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["currentPage"], 1);
    let list = body["restaurants"].as_array().unwrap();
    assert_eq!(list.len(), 7);
    // Default sort is by name, ascending (byte order).
    assert_eq!(list[0]["name"], "Burger Barn");
    assert_eq!(list[6]["name"], "pizza place");
    assert!(list.iter().all(|r| r["averageRating"].is_number()));
}

#[tokio::test]
async fn restaurant_object_shape() {
    let body = get(app(), "/restaurants?name=golden").await.json();
    let r = &body["restaurants"][0];
    assert_eq!(r["name"], "Golden Dragon");
    assert_eq!(r["borough"], "Manhattan");
    assert_eq!(r["cuisine"], "Chinese");
    assert_eq!(r["restaurant_id"], "1");
    assert_eq!(r["address"]["street"], "Mott Street");
    assert_eq!(r["address"]["coord"].as_array().unwrap().len(), 2);
    assert_eq!(r["grades"][1]["grade"], "B");
    assert_eq!(r["grades"][1]["score"], 20.0);
    assert_eq!(r["averageRating"], 15.0);
}

#[tokio::test]
async fn category_matches_equivalent_cuisine_list() {
    let by_category = get(app(), "/restaurants?category=Asian").await.json();
    let by_cuisine = get(app(), "/restaurants?cuisine=Chinese,Japanese").await.json();
    assert_eq!(ids(&by_category), ids(&by_cuisine));
    assert_eq!(by_category["totalRestaurants"], 3);
}

#[tokio::test]
async fn category_overrides_cuisine() {
    let body = get(app(), "/restaurants?category=European&cuisine=Chinese").await.json();
    let mut got = ids(&body);
    got.sort();
    assert_eq!(got, vec!["3", "4"]);
}

#[tokio::test]
async fn unknown_category_is_a_client_error() {
    let resp = get(app(), "/restaurants?category=Martian").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json(), serde_json::json!({"error": "Invalid categories selected"}));
}

#[tokio::test]
async fn desc_name_order_is_non_increasing() {
    let body = get(app(), "/restaurants?sortBy=name&order=desc").await.json();
    let names: Vec<&str> = body["restaurants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 7);
    assert!(names.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn sort_by_average_rating() {
    let body = get(app(), "/restaurants?sortBy=averageRating&order=desc&limit=3").await.json();
    let ratings: Vec<f64> = body["restaurants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["averageRating"].as_f64().unwrap())
        .collect();
    assert_eq!(ratings, vec![40.0, 21.0, 15.0]);
    assert_eq!(body["totalPages"], 3);
}

#[tokio::test]
async fn grade_filter_matches_any_grade_record() {
    let body = get(app(), "/restaurants?grade=A").await.json();
    let mut got = ids(&body);
    got.sort();
    let mut want: Vec<String> = restaurants()
        .iter()
        .filter(|d| {
            d.get_array("grades").is_ok_and(|gs| {
                gs.iter().any(|g| g.as_document().and_then(|g| g.get_str("grade").ok()) == Some("A"))
            })
        })
        .map(|d| d.get_str("restaurant_id").unwrap().to_string())
        .collect();
    want.sort();
    assert_eq!(got, want);
    assert_eq!(got, vec!["1", "2", "5"]);
}

#[tokio::test]
async fn borough_and_name_filters_conjoin() {
    let body = get(app(), "/restaurants?borough=Queens,Brooklyn&name=O").await.json();
    let mut got = ids(&body);
    got.sort();
    // Only "Trattoria Roma" and "Noodle House" contain an "o".
    assert_eq!(got, vec!["3", "6"]);
}

#[tokio::test]
async fn pagination_envelope() {
    let body = get(app(), "/restaurants?page=2&limit=3").await.json();
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalRestaurants"], 7);
    assert_eq!(ids(&body).len(), 3);

    let last = get(app(), "/restaurants?page=3&limit=3").await.json();
    assert_eq!(ids(&last).len(), 1);
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let resp = get(app(), "/restaurants?page=2&page=3&limit=1").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["currentPage"], 2);
    assert_eq!(ids(&body).len(), 1);

    let body = get(app(), "/restaurants?cuisine=Chinese&cuisine=Italian").await.json();
    let mut got = ids(&body);
    got.sort();
    assert_eq!(got, vec!["1", "6"]);
}

#[tokio::test]
async fn malformed_paging_is_clamped() {
    let resp = get(app(), "/restaurants?page=zero&limit=-4").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["currentPage"], 1);
    assert_eq!(ids(&body).len(), 7);
}

#[tokio::test]
async fn empty_match_is_an_empty_page() {
    let body = get(app(), "/restaurants?borough=Atlantis").await.json();
    assert_eq!(body["totalRestaurants"], 0);
    assert_eq!(body["totalPages"], 0);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn categories_endpoint_lists_every_usable_name() {
    let body = get(app(), "/categories").await.json();
    let names: Vec<String> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(body["count"], categories().len());
    assert_eq!(names, vec!["Asian", "European", "Comfort"]);
    for name in names {
        let resp = get(app(), &format!("/restaurants?category={name}")).await;
        assert_eq!(resp.status, StatusCode::OK, "category {name}");
    }
}

#[tokio::test]
async fn single_restaurant_lookup() {
    let resp = get(app(), "/restaurants/5").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["name"], "Burger Barn");
    assert_eq!(body["averageRating"], 5.0);

    let missing = get(app(), "/restaurants/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json(), serde_json::json!({"error": "Restaurant not found"}));
}

#[tokio::test]
async fn store_failure_is_a_plain_server_error() {
    let resp = get(app_with(FailingStore), "/restaurants").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text(), "Error fetching restaurants");

    let resp = get(app_with(FailingStore), "/restaurants/1").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);

    // Category validation happens before the store is touched.
    let resp = get(app_with(FailingStore), "/restaurants?category=Nope").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = get(app_with(FailingStore), "/categories").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_and_cors() {
    let req = Request::builder()
        .uri("/categories")
        .header(header::ORIGIN, ORIGIN)
        .body(Body::empty())
        .unwrap();
    let resp = send(app(), req).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.headers.contains_key(REQUEST_ID_HEADER));
    assert_eq!(resp.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ORIGIN);
}
