use crate::activity::IdentityKey;
use crate::api::models::{Building, Credentials, NewBuilding, Registration, UserRole};
use crate::app::{App, BookingRequest, StatusRequest};
use crate::auth::ProfileUpdate;
use crate::catalog::BuildingQuery;
use crate::errors::ServerError;
use crate::responses::{json_response, json_status, ResultResp};
use astra::Request;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::io::Read;

/// Largest JSON body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Deserialize)]
struct RoleBody {
    role: UserRole,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    handle_at(req, app, Utc::now())
}

/// Route one request with an explicit clock.
pub fn handle_at(req: Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();

    let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    let Some(rest) = segments.strip_prefix(&["api"]) else {
        return Err(ServerError::NotFound);
    };

    match (method.as_str(), rest) {
        // session
        ("GET", ["session"]) => json_response(&app.session_info()?),
        ("POST", ["session", "login"]) => {
            let creds: Credentials = read_json(req)?;
            json_response(&app.login(&creds)?)
        }
        ("POST", ["session", "logout"]) => {
            app.logout()?;
            json_response(&json!({ "ok": true }))
        }
        ("PATCH", ["session", "profile"]) => {
            let update: ProfileUpdate = read_json(req)?;
            json_response(&app.update_profile(update)?)
        }
        ("POST", ["register"]) => {
            let reg: Registration = read_json(req)?;
            json_status(201, &app.register(reg)?)
        }

        // listings
        ("GET", ["buildings"]) => {
            json_response(&app.buildings(&BuildingQuery::from_query(&query))?)
        }
        ("GET", ["buildings", id]) => json_response(&app.property_page(parse_id(id)?, now)?),

        // favorites
        ("GET", ["favorites"]) => json_response(&app.favorites()?),
        ("POST", ["favorites"]) => {
            let building: Building = read_json(req)?;
            json_response(&app.toggle_favorite(building, now)?)
        }

        // appointments
        ("GET", ["appointments"]) => json_response(&app.appointments()?),
        ("GET", ["appointments", "remote"]) => json_response(&app.remote_appointments(now)?),
        ("POST", ["appointments"]) => {
            let booking: BookingRequest = read_json(req)?;
            json_status(201, &app.book_appointment(booking, now)?)
        }
        ("POST", ["appointments", id, "cancel"]) => {
            json_response(&app.cancel_appointment(parse_id(id)?, now)?)
        }

        ("GET", ["dashboard"]) => json_response(&app.dashboard()?),
        ("POST", ["dashboard", "clear"]) => {
            app.clear_my_data()?;
            json_response(&json!({ "ok": true }))
        }

        // admin
        ("GET", ["admin", "overview"]) => json_response(&app.admin_overview(now)?),
        ("GET", ["admin", "users"]) => {
            let search = query_param(&query, "search");
            json_response(&app.admin_users(now, search.as_deref())?)
        }
        ("PATCH", ["admin", "users", id, "role"]) => {
            let id = parse_id(id)?;
            let body: RoleBody = read_json(req)?;
            json_response(&app.admin_set_user_role(id, body.role)?)
        }
        ("DELETE", ["admin", "users", id]) => json_response(&app.admin_delete_user(parse_id(id)?)?),
        ("GET", ["admin", "appointments"]) => json_response(&app.admin_appointments(now)?),
        ("POST", ["admin", "appointments", owner, id, "status"]) => {
            let owner = IdentityKey::new(*owner);
            let id = parse_id(id)?;
            let body: StatusRequest = read_json(req)?;
            json_response(&app.admin_set_appointment_status(&owner, id, body, now)?)
        }
        ("DELETE", ["admin", "appointments", id]) => {
            json_response(&app.admin_delete_appointment(parse_id(id)?)?)
        }
        ("POST", ["admin", "buildings"]) => {
            let input: NewBuilding = read_json(req)?;
            json_status(201, &app.admin_create_building(&input)?)
        }
        ("PUT", ["admin", "buildings", id]) => {
            let id = parse_id(id)?;
            let input: NewBuilding = read_json(req)?;
            json_response(&app.admin_update_building(id, &input)?)
        }
        ("DELETE", ["admin", "buildings", id]) => {
            json_response(&app.admin_delete_building(parse_id(id)?)?)
        }
        ("POST", ["admin", "clear-local-data"]) => {
            let removed = app.admin_clear_local_data()?;
            json_response(&json!({ "removed": removed }))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id: {raw}")))
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn read_json<T: DeserializeOwned>(req: Request) -> Result<T, ServerError> {
    let mut raw = String::new();
    req.into_body()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    if raw.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    serde_json::from_str(&raw).map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}
