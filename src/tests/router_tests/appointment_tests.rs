use crate::app::testing::{sign_in, Sent};
use crate::errors::ServerError;
use crate::router::handle_at;
use crate::tests::utils::{body_json, expect_err, fixed_now, init_test_app, request, respond};
use http::Method;
use serde_json::{json, Value};

fn booking_body(time: &str) -> Value {
    json!({
        "buildingId": 42,
        "buildingName": "Tower 42",
        "buildingLocation": "Whitefield",
        "appointmentTime": time,
        "mode": "online"
    })
}

#[test]
fn booking_requires_login() {
    let h = init_test_app();
    let req = request(Method::POST, "/api/appointments", Some(booking_body("2024-06-05T10:00:00Z")));
    let err = expect_err(handle_at(req, &h.app, fixed_now()));
    assert!(matches!(err, ServerError::Unauthorized(_)));
}

#[test]
fn booking_creates_pending_appointment() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let req = request(Method::POST, "/api/appointments", Some(booking_body("2024-06-05T10:00:00Z")));
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 201);

    let body = body_json(resp);
    assert_eq!(body["appointment"]["status"], "pending");
    assert_eq!(body["appointment"]["propertyId"], 42);
    assert_eq!(body["appointment"]["meetingMode"], "online");
    assert_eq!(body["appointment"]["message"], "Looking forward to viewing this property.");
    assert_eq!(body["notification"]["success"], true);

    let id = body["appointment"]["id"].as_i64().unwrap();
    assert_eq!(h.notifier.sent(), vec![Sent::Requested(id)]);

    let list = body_json(respond(handle_at(
        request(Method::GET, "/api/appointments", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], id);
}

#[test]
fn booking_inside_a_day_lists_the_field() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let req = request(Method::POST, "/api/appointments", Some(booking_body("2024-06-01T18:00:00Z")));
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["fields"][0]["field"], "requestedTime");
    assert!(h.notifier.sent().is_empty());
}

#[test]
fn cancel_route_marks_cancelled() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let req = request(Method::POST, "/api/appointments", Some(booking_body("2024-06-05T10:00:00Z")));
    let id = body_json(respond(handle_at(req, &h.app, fixed_now())))["appointment"]["id"]
        .as_i64()
        .unwrap();

    let uri = format!("/api/appointments/{id}/cancel");
    let body = body_json(respond(handle_at(request(Method::POST, &uri, None), &h.app, fixed_now())));
    assert_eq!(body["status"], "cancelled");
}

#[test]
fn dashboard_reports_activity() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);

    let req = request(Method::POST, "/api/appointments", Some(booking_body("2024-06-05T10:00:00Z")));
    respond(handle_at(req, &h.app, fixed_now()));

    let body = body_json(respond(handle_at(
        request(Method::GET, "/api/dashboard", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["stats"]["totalAppointments"], 1);
    assert_eq!(body["stats"]["totalFavorites"], 0);
    assert!(body["stats"]["profileViews"].as_u64().unwrap() >= 6);
    assert_eq!(body["user"]["email"], "asha@example.com");
}

#[test]
fn dashboard_requires_login() {
    let h = init_test_app();
    let resp = respond(handle_at(request(Method::GET, "/api/dashboard", None), &h.app, fixed_now()));
    assert_eq!(resp.status(), 401);
}

#[test]
fn clearing_my_data_spares_other_users() {
    let h = init_test_app();
    sign_in(&h.app, "asha@example.com", 9);
    let resp = respond(handle_at(
        request(Method::POST, "/api/appointments", Some(booking_body("2024-06-05T10:00:00Z"))),
        &h.app,
        fixed_now(),
    ));
    assert_eq!(resp.status(), 201);

    sign_in(&h.app, "ravi@example.com", 5);
    let resp = respond(handle_at(
        request(Method::POST, "/api/appointments", Some(booking_body("2024-06-06T10:00:00Z"))),
        &h.app,
        fixed_now(),
    ));
    assert_eq!(resp.status(), 201);

    let resp = respond(handle_at(
        request(Method::POST, "/api/dashboard/clear", None),
        &h.app,
        fixed_now(),
    ));
    assert_eq!(resp.status(), 200);

    let mine = body_json(respond(handle_at(
        request(Method::GET, "/api/appointments", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(mine, json!([]));
    assert!(body_json(respond(handle_at(
        request(Method::GET, "/api/session", None),
        &h.app,
        fixed_now(),
    )))["authenticated"]
        .as_bool()
        .unwrap());

    sign_in(&h.app, "asha@example.com", 9);
    let theirs = body_json(respond(handle_at(
        request(Method::GET, "/api/appointments", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(theirs.as_array().unwrap().len(), 1);
    assert_eq!(theirs[0]["userId"], "9");
}

#[test]
fn clearing_requires_login() {
    let h = init_test_app();
    let err = expect_err(handle_at(
        request(Method::POST, "/api/dashboard/clear", None),
        &h.app,
        fixed_now(),
    ));
    assert!(matches!(err, ServerError::Unauthorized(_)));
}
