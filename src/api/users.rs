// src/api/users.rs
use serde_json::Value;

use crate::api::client::{ApiClient, ApiError};
use crate::api::models::{Credentials, LoginResponse, Registration};

impl ApiClient {
    pub fn register_user(&self, registration: &Registration) -> Result<Value, ApiError> {
        let url = self.url("users/register")?;
        self.send(self.post(url).json(registration), "register")
    }

    pub fn login_user(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.url("users/login")?;
        self.send(self.post(url).json(credentials), "login")
    }

    /// Server-side mirror of a local favorite.
    pub fn add_favorite_building(&self, user_id: i64, building_id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("users/{user_id}/favorites/{building_id}"))?;
        self.send(self.post(url), "favorite")
    }
}
