use crate::activity::IdentityKey;
use crate::app::testing::{sign_in, Sent, ADMIN_EMAIL};
use crate::errors::ServerError;
use crate::router::handle_at;
use crate::tests::utils::{body_json, expect_err, fixed_now, init_test_app, request, respond};
use http::Method;
use serde_json::json;

fn book(h: &crate::app::testing::Harness, property_id: i64) -> i64 {
    let req = request(
        Method::POST,
        "/api/appointments",
        Some(json!({
            "propertyId": property_id,
            "propertyName": format!("Tower {property_id}"),
            "requestedTime": "2024-06-10T11:00:00Z",
            "meetingMode": "physical",
            "message": "Morning please"
        })),
    );
    body_json(respond(handle_at(req, &h.app, fixed_now())))["appointment"]["id"]
        .as_i64()
        .unwrap()
}

#[test]
fn admin_routes_reject_regular_users() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    for (method, uri) in [
        (Method::GET, "/api/admin/overview"),
        (Method::GET, "/api/admin/appointments"),
        (Method::POST, "/api/admin/clear-local-data"),
    ] {
        let err = expect_err(handle_at(request(method, uri, None), &h.app, fixed_now()));
        assert!(matches!(err, ServerError::Forbidden(_)), "{uri}");
    }
}

#[test]
fn confirming_through_router_notifies_requester_once() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);
    let id = book(&h, 42);

    sign_in(&h.app, ADMIN_EMAIL, 1);
    let listed = body_json(respond(handle_at(
        request(Method::GET, "/api/admin/appointments", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["userId"], "9");

    let uri = format!("/api/admin/appointments/9/{id}/status");
    let body = body_json(respond(handle_at(
        request(Method::POST, &uri, Some(json!({ "status": "confirmed", "adminMessage": "Gate 2" }))),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["appointment"]["status"], "confirmed");
    assert_eq!(body["notification"]["path"], "logged_fallback");

    assert_eq!(
        h.notifier.sent(),
        vec![Sent::Requested(id), Sent::Confirmed(id, Some("Gate 2".into()))]
    );

    let stored = h.app.activity().appointments(&IdentityKey::new("9")).unwrap();
    assert_eq!(stored[0].status.as_str(), "confirmed");
}

#[test]
fn unknown_status_is_bad_request() {
    let h = init_test_app();
    sign_in(&h.app, ADMIN_EMAIL, 1);

    let req = request(
        Method::POST,
        "/api/admin/appointments/9/1/status",
        Some(json!({ "status": "teleported" })),
    );
    let err = expect_err(handle_at(req, &h.app, fixed_now()));
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn overview_and_users_fall_back_offline() {
    let h = init_test_app();
    sign_in(&h.app, ADMIN_EMAIL, 1);

    let overview = body_json(respond(handle_at(
        request(Method::GET, "/api/admin/overview", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(overview["totalUsers"], 7);
    assert_eq!(overview["totalProperties"], 0);

    let users = body_json(respond(handle_at(
        request(Method::GET, "/api/admin/users?search=kumar", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "Rajesh Kumar");
}

#[test]
fn clear_local_data_reports_removed_keys() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);
    book(&h, 1);

    sign_in(&h.app, ADMIN_EMAIL, 1);
    let body = body_json(respond(handle_at(
        request(Method::POST, "/api/admin/clear-local-data", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["removed"], 1);
    assert!(h.app.appointments().unwrap().is_empty());
}

#[test]
fn building_management_needs_a_backend() {
    let h = init_test_app();
    sign_in(&h.app, ADMIN_EMAIL, 1);

    let req = request(Method::DELETE, "/api/admin/buildings/3", None);
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 503);
}
