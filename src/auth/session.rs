// src/auth/session.rs
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::activity::IdentityKey;
use crate::api::models::{Credentials, LoginResponse, UserProfile, UserRole};
use crate::api::{ApiClient, ApiError};
use crate::auth::validate::{normalize_email, validate_login, ValidationError};
use crate::db::{KeyValueStore, StoreError};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid login form: {0}")]
    Invalid(#[from] ValidationError),
    #[error("backend rejected login: {0}")]
    Rejected(#[from] ApiError),
    #[error("login response carried no token")]
    MissingToken,
    #[error("session store: {0}")]
    Store(#[from] StoreError),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Invalid(e) => e.to_string(),
            LoginError::Rejected(e) => e.login_message().to_string(),
            LoginError::MissingToken | LoginError::Store(_) => {
                "Login failed. Please try again.".to_string()
            }
        }
    }
}

/// Fields a signed-in user may change about themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partition key for a profile: its id, else its email.
pub fn identity_for(profile: &UserProfile) -> IdentityKey {
    match profile.id {
        Some(id) => IdentityKey::new(id.to_string()),
        None => IdentityKey::new(profile.email.as_str()),
    }
}

/// Token + profile persisted beside the activity data.
#[derive(Clone)]
pub struct SessionProvider {
    kv: KeyValueStore,
    admin_email: String,
}

impl SessionProvider {
    pub fn new(kv: KeyValueStore, admin_email: &str) -> Self {
        Self {
            kv,
            admin_email: normalize_email(admin_email),
        }
    }

    pub fn bearer_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.kv.get(TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }

    /// The stored profile, only while a token is also stored.
    pub fn current_user(&self) -> Result<Option<UserProfile>, StoreError> {
        if self.bearer_token()?.is_none() {
            return Ok(None);
        }
        let Some(raw) = self.kv.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(key = USER_KEY, error = %e, "stored profile is corrupt, treating as signed out");
                Ok(None)
            }
        }
    }

    pub fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.current_user()?.is_some())
    }

    pub fn identity(&self) -> Result<IdentityKey, StoreError> {
        Ok(self
            .current_user()?
            .map(|p| identity_for(&p))
            .unwrap_or_else(IdentityKey::anonymous))
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        normalize_email(email) == self.admin_email
    }

    pub fn is_admin(&self) -> Result<bool, StoreError> {
        Ok(self
            .current_user()?
            .is_some_and(|p| self.is_admin_email(&p.email)))
    }

    /// Validate, call the backend, then persist the session.
    pub fn login(&self, api: &ApiClient, creds: &Credentials) -> Result<UserProfile, LoginError> {
        validate_login(creds)?;
        let email = normalize_email(&creds.email);
        let resp = api.login_user(&Credentials {
            email: email.clone(),
            password: creds.password.clone(),
        })?;
        self.establish(&email, resp)
    }

    /// Persist a session from a successful login response.
    pub fn establish(&self, email: &str, resp: LoginResponse) -> Result<UserProfile, LoginError> {
        let token = resp
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(LoginError::MissingToken)?;
        let email = normalize_email(email);

        let name = resp
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        let role = if self.is_admin_email(&email) {
            UserRole::Admin
        } else {
            UserRole::User
        };
        let profile = UserProfile {
            id: resp.user_id,
            email,
            name,
            favorite_building_ids: resp.favorite_building_ids,
            role,
            phone: resp.phone,
        };

        self.kv.set(TOKEN_KEY, &token)?;
        self.kv.set(USER_KEY, &serde_json::to_string(&profile).map_err(StoreError::from)?)?;
        info!(identity = %identity_for(&profile), admin = role == UserRole::Admin, "session established");
        Ok(profile)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.kv.remove(TOKEN_KEY)?;
        self.kv.remove(USER_KEY)?;
        info!("session cleared");
        Ok(())
    }

    /// Merge `update` into the stored profile. None when nobody is signed in.
    ///
    /// Only name and phone change, so the identity key stays put.
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<Option<UserProfile>, StoreError> {
        let Some(mut profile) = self.current_user()? else {
            return Ok(None);
        };
        if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
            profile.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            let phone = phone.trim().to_string();
            profile.phone = (!phone.is_empty()).then_some(phone);
        }
        self.kv.set(USER_KEY, &serde_json::to_string(&profile)?)?;
        Ok(Some(profile))
    }
}
