use crate::api::client::test_server::serve_once;
use crate::app::testing::sign_in;
use crate::errors::ServerError;
use crate::router::handle_at;
use crate::tests::utils::{
    body_json, expect_err, fixed_now, init_test_app, init_test_app_with_backend, request, respond,
};
use http::Method;
use serde_json::{json, Value};

fn building(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Tower {id}"),
        "location": "Jayanagar",
        "type": "Apartment",
        "cost": 6500000.0,
        "description": "Corner unit",
        "available": true,
        "images": []
    })
}

#[test]
fn toggling_requires_login() {
    let h = init_test_app();

    let req = request(Method::POST, "/api/favorites", Some(building(42)));
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 401);
    assert_eq!(body_json(resp)["error"], "Please login to add favorites");
}

#[test]
fn toggle_adds_then_removes() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let body = body_json(respond(handle_at(
        request(Method::POST, "/api/favorites", Some(building(42))),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["favorited"], true);

    let list = body_json(respond(handle_at(
        request(Method::GET, "/api/favorites", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], 42);
    assert_eq!(list[0]["type"], "Apartment");
    assert_eq!(list[0]["addedAt"], "2024-06-01T09:00:00Z");
    assert!(list[0].get("property").is_none());

    let body = body_json(respond(handle_at(
        request(Method::POST, "/api/favorites", Some(building(42))),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["favorited"], false);
    assert_eq!(body["favorites"], json!([]));
}

#[test]
fn listing_search_filters_backend_results() {
    let payload = json!([building(1), building(2), {
        "id": 3, "name": "Lake View", "location": "Hebbal", "type": "Villa",
        "cost": 15000000.0, "description": "", "available": false, "images": []
    }]);
    let (base, server) = serve_once(200, &payload.to_string());
    let h = init_test_app_with_backend(&base);

    let body = body_json(respond(handle_at(
        request(Method::GET, "/api/buildings?type=Villa&minCost=1000000", None),
        &h.app,
        fixed_now(),
    )));
    let ids: Vec<i64> = body.as_array().unwrap().iter().map(|b| b["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![3]);
    server.join().unwrap();
}

#[test]
fn property_page_counts_a_view() {
    let (base, server) = serve_once(200, &building(5).to_string());
    let h = init_test_app_with_backend(&base);

    let body = body_json(respond(handle_at(
        request(Method::GET, "/api/buildings/5", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["building"]["id"], 5);
    assert_eq!(body["propertiesViewed"], 1);
    assert_eq!(body["isFavorite"], false);
    server.join().unwrap();
}

#[test]
fn missing_listing_is_not_found() {
    let (base, server) = serve_once(404, "");
    let h = init_test_app_with_backend(&base);

    let err = expect_err(handle_at(request(Method::GET, "/api/buildings/77", None), &h.app, fixed_now()));
    assert!(matches!(err, ServerError::NotFound));
    server.join().unwrap();
}

#[test]
fn non_numeric_id_is_bad_request() {
    let h = init_test_app();
    let err = expect_err(handle_at(request(Method::GET, "/api/buildings/abc", None), &h.app, fixed_now()));
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn oversized_body_is_rejected() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let mut huge = building(42);
    huge["description"] = json!("x".repeat(70_000));
    let err = expect_err(handle_at(
        request(Method::POST, "/api/favorites", Some(huge)),
        &h.app,
        fixed_now(),
    ));
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert!(h.app.favorites().unwrap().is_empty());
}
