// src/app/mod.rs
//! Actions behind the JSON endpoints. Local state is the source of truth;
//! backend calls that mirror a local change run on their own thread and only log.

use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::activity::{IdentityKey, UserActivityStore};
use crate::api::models::UserProfile;
use crate::api::{ApiClient, ApiError};
use crate::auth::{identity_for, SessionProvider};
use crate::db::{KeyValueStore, StoreError};
use crate::errors::ServerError;
use crate::notify::Notifier;

mod admin;
mod user;

pub use admin::{AdminStatusChange, StatusRequest};
pub use user::{BookingRequest, Booking, Dashboard, FavoriteToggle, PropertyPage, SessionInfo};

pub struct App {
    session: SessionProvider,
    activity: UserActivityStore,
    notifier: Arc<dyn Notifier>,
    api: Option<ApiClient>,
    rng: Mutex<StdRng>,
}

impl App {
    pub fn new(
        kv: KeyValueStore,
        admin_email: &str,
        notifier: Arc<dyn Notifier>,
        api: Option<ApiClient>,
        rng: StdRng,
    ) -> Self {
        Self {
            session: SessionProvider::new(kv.clone(), admin_email),
            activity: UserActivityStore::new(kv),
            notifier,
            api,
            rng: Mutex::new(rng),
        }
    }

    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    pub fn activity(&self) -> &UserActivityStore {
        &self.activity
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut rng)
    }

    /// Backend client carrying the session's bearer token, if a backend is set.
    fn authed_api(&self) -> Result<Option<ApiClient>, StoreError> {
        match &self.api {
            Some(api) => Ok(Some(api.with_token(self.session.bearer_token()?))),
            None => Ok(None),
        }
    }

    fn require_api(&self) -> Result<ApiClient, ServerError> {
        self.authed_api()?
            .ok_or_else(|| ServerError::Unavailable("No backend is configured".into()))
    }

    fn require_user(&self, why: &str) -> Result<(UserProfile, IdentityKey), ServerError> {
        match self.session.current_user()? {
            Some(p) => {
                let key = identity_for(&p);
                Ok((p, key))
            }
            None => Err(ServerError::Unauthorized(why.to_string())),
        }
    }

    fn require_admin(&self) -> Result<UserProfile, ServerError> {
        let (profile, _) = self.require_user("Please login to continue")?;
        if !self.session.is_admin_email(&profile.email) {
            return Err(ServerError::Forbidden("Admin access required".into()));
        }
        Ok(profile)
    }

    /// Fire-and-forget backend call. Failures are logged, never returned.
    fn mirror<T, F>(&self, what: &'static str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&ApiClient) -> Result<T, ApiError> + Send + 'static,
        T: 'static,
    {
        let Some(api) = self.authed_api()? else {
            debug!(what, "no backend configured, skipping remote mirror");
            return Ok(());
        };
        std::thread::spawn(move || match f(&api) {
            Ok(_) => debug!(what, "remote mirror succeeded"),
            Err(e) => warn!(what, error = %e, "remote mirror failed, local state kept"),
        });
        Ok(())
    }
}
