use crate::api::client::test_server::serve_once;
use crate::errors::ServerError;
use crate::router::handle_at;
use crate::tests::utils::{
    body_json, expect_err, fixed_now, init_test_app, init_test_app_with_backend, request, respond,
};
use http::Method;
use serde_json::json;

#[test]
fn session_is_anonymous_by_default() {
    let h = init_test_app();

    let resp = respond(handle_at(request(Method::GET, "/api/session", None), &h.app, fixed_now()));
    assert_eq!(resp.status(), 200);

    let body = body_json(resp);
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["identity"], "anonymous");
    assert!(body["user"].is_null());
}

#[test]
fn login_persists_session_and_identity() {
    let (base, server) = serve_once(200, r#"{"token":"jwt-9","userId":9,"name":"Asha"}"#);
    let h = init_test_app_with_backend(&base);

    let req = request(
        Method::POST,
        "/api/session/login",
        Some(json!({ "email": "Asha@Example.com", "password": "secret1" })),
    );
    let body = body_json(respond(handle_at(req, &h.app, fixed_now())));
    assert_eq!(body["email"], "asha@example.com");
    assert_eq!(body["role"], "user");
    server.join().unwrap();

    let body = body_json(respond(handle_at(
        request(Method::GET, "/api/session", None),
        &h.app,
        fixed_now(),
    )));
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["identity"], "9");
}

#[test]
fn rejected_login_reports_invalid_credentials() {
    let (base, server) = serve_once(401, "");
    let h = init_test_app_with_backend(&base);

    let req = request(
        Method::POST,
        "/api/session/login",
        Some(json!({ "email": "asha@example.com", "password": "wrong-pass" })),
    );
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 401);
    assert_eq!(body_json(resp)["error"], "Invalid email or password");
    server.join().unwrap();

    assert!(!h.app.session().is_authenticated().unwrap());
}

#[test]
fn malformed_login_form_lists_fields() {
    let h = init_test_app();

    let req = request(
        Method::POST,
        "/api/session/login",
        Some(json!({ "email": "not-an-email", "password": "123" })),
    );
    let resp = respond(handle_at(req, &h.app, fixed_now()));
    assert_eq!(resp.status(), 400);

    let body = body_json(resp);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[test]
fn garbage_body_is_bad_request() {
    let h = init_test_app();

    let req = request(Method::POST, "/api/session/login", Some(json!("nope")));
    let err = expect_err(handle_at(req, &h.app, fixed_now()));
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn logout_then_profile_update_is_unauthorized() {
    let h = init_test_app();
    crate::app::testing::sign_in(&h.app, "asha@example.com", 9);

    let req = request(Method::PATCH, "/api/session/profile", Some(json!({ "name": "Asha R" })));
    let body = body_json(respond(handle_at(req, &h.app, fixed_now())));
    assert_eq!(body["name"], "Asha R");

    let resp = respond(handle_at(request(Method::POST, "/api/session/logout", None), &h.app, fixed_now()));
    assert_eq!(resp.status(), 200);

    let req = request(Method::PATCH, "/api/session/profile", Some(json!({ "name": "X" })));
    let err = expect_err(handle_at(req, &h.app, fixed_now()));
    assert!(matches!(err, ServerError::Unauthorized(_)));
}

#[test]
fn registration_is_validated_before_dispatch() {
    let h = init_test_app();

    let req = request(
        Method::POST,
        "/api/register",
        Some(json!({ "name": "", "email": "asha@example.com", "password": "secret1" })),
    );
    let err = expect_err(handle_at(req, &h.app, fixed_now()));
    match err {
        ServerError::Validation(v) => assert_eq!(v.message_for("name"), Some("Name is required")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unknown_routes_are_not_found() {
    let h = init_test_app();
    for uri in ["/", "/api", "/api/nope", "/admin"] {
        let err = expect_err(handle_at(request(Method::GET, uri, None), &h.app, fixed_now()));
        assert!(matches!(err, ServerError::NotFound), "{uri}");
    }
}
