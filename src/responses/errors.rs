use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;
use tracing::error;

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a JSON error body with the matching status.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    let body = match &err {
        ServerError::NotFound => json!({ "error": "Not Found" }),
        ServerError::Validation(v) => json!({
            "error": "Please correct the highlighted fields",
            "fields": v.fields,
        }),
        ServerError::BadRequest(msg)
        | ServerError::Unauthorized(msg)
        | ServerError::Forbidden(msg)
        | ServerError::Unavailable(msg) => json!({ "error": msg }),
        ServerError::DbError(msg) => {
            error!(error = %msg, "database error");
            json!({ "error": "Internal Server Error" })
        }
        ServerError::InternalError => json!({ "error": "Internal Server Error" }),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| Response::new(Body::from(body.to_string())))
}
