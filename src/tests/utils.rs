use crate::app::testing::{harness, Harness};
use crate::api::ApiClient;
use crate::errors::ServerError;
use crate::responses::{error_to_response, ResultResp};
use astra::{Body, Request, Response};
use chrono::{DateTime, TimeZone, Utc};
use http::Method;
use http::Request as HttpRequest;
use serde_json::Value;
use std::io::Read;

/// Fresh app on a throwaway database, with no backend configured.
pub fn init_test_app() -> Harness {
    harness(None)
}

/// Same, pointed at a backend (usually a `serve_once` stub).
pub fn init_test_app_with_backend(base: &str) -> Harness {
    let api = ApiClient::new(base, std::time::Duration::from_secs(5)).unwrap();
    harness(Some(api))
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request {
    let body = match body {
        Some(v) => Body::from(v.to_string().into_bytes()),
        None => Body::empty(),
    };
    HttpRequest::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body)
        .unwrap()
}

/// Render a handler result the way the server loop does.
pub fn respond(result: ResultResp) -> Response {
    result.unwrap_or_else(error_to_response)
}

pub fn body_json(resp: Response) -> Value {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    serde_json::from_str(&body).unwrap()
}

pub fn expect_err(result: ResultResp) -> ServerError {
    match result {
        Ok(resp) => panic!("expected an error, got status {}", resp.status()),
        Err(e) => e,
    }
}
