// src/app/user.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::activity::{
    Appointment, AppointmentStatus, DashboardStats, Favorite, IdentityKey, MeetingMode,
    NewAppointment, PropertyId, PropertyView,
};
use crate::api::models::{Building, Credentials, Registration, UserProfile};
use crate::app::App;
use crate::auth::validate::normalize_email;
use crate::auth::{validate_login, validate_registration, ProfileUpdate, ValidationError};
use crate::catalog::{filter_buildings, BuildingQuery};
use crate::errors::ServerError;
use crate::notify::DispatchResult;

pub const DEFAULT_BOOKING_MESSAGE: &str = "Looking forward to viewing this property.";

/// Earliest a viewing may be booked, relative to now.
pub const MIN_BOOKING_LEAD_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub authenticated: bool,
    pub is_admin: bool,
    pub identity: IdentityKey,
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPage {
    pub building: Building,
    pub is_favorite: bool,
    pub properties_viewed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub favorited: bool,
    pub favorites: Vec<Favorite>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(alias = "buildingId")]
    pub property_id: PropertyId,
    #[serde(alias = "buildingName")]
    pub property_name: String,
    #[serde(default, alias = "buildingLocation")]
    pub property_location: String,
    #[serde(alias = "appointmentTime")]
    pub requested_time: DateTime<Utc>,
    #[serde(default, alias = "mode")]
    pub meeting_mode: MeetingMode,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub appointment: Appointment,
    pub notification: DispatchResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: UserProfile,
    pub stats: DashboardStats,
    pub favorites: Vec<Favorite>,
    pub appointments: Vec<Appointment>,
    pub recently_viewed: Vec<PropertyView>,
}

pub fn validate_booking(req: &BookingRequest, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if req.property_name.trim().is_empty() {
        return Err(ValidationError::single("propertyName", "Property is required"));
    }
    if req.requested_time < now + Duration::hours(MIN_BOOKING_LEAD_HOURS) {
        return Err(ValidationError::single(
            "requestedTime",
            "Appointments must be scheduled at least 24 hours in advance",
        ));
    }
    Ok(())
}

impl App {
    pub fn session_info(&self) -> Result<SessionInfo, ServerError> {
        let user = self.session.current_user()?;
        let is_admin = user
            .as_ref()
            .is_some_and(|p| self.session.is_admin_email(&p.email));
        Ok(SessionInfo {
            authenticated: user.is_some(),
            is_admin,
            identity: self.session.identity()?,
            user,
        })
    }

    pub fn login(&self, creds: &Credentials) -> Result<UserProfile, ServerError> {
        validate_login(creds)?;
        let api = self
            .api
            .as_ref()
            .ok_or_else(|| ServerError::Unavailable("No backend is configured".into()))?;
        Ok(self.session.login(api, creds)?)
    }

    pub fn logout(&self) -> Result<(), ServerError> {
        Ok(self.session.logout()?)
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ServerError> {
        self.session
            .update_profile(update)?
            .ok_or_else(|| ServerError::Unauthorized("Please login to continue".into()))
    }

    pub fn register(&self, reg: Registration) -> Result<Value, ServerError> {
        validate_registration(&reg)?;
        let reg = Registration {
            email: normalize_email(&reg.email),
            name: reg.name.trim().to_string(),
            ..reg
        };
        let api = self.require_api()?;
        let created = api.register_user(&reg)?;
        info!(email = %reg.email, "registered new account");
        Ok(created)
    }

    pub fn buildings(&self, query: &BuildingQuery) -> Result<Vec<Building>, ServerError> {
        let api = self.require_api()?;
        Ok(filter_buildings(api.list_buildings()?, query))
    }

    /// Fetch one listing and count the view against the current identity.
    pub fn property_page(&self, id: PropertyId, now: DateTime<Utc>) -> Result<PropertyPage, ServerError> {
        let api = self.require_api()?;
        let building = api.get_building(id)?;
        self.view_property(building, now)
    }

    pub fn view_property(&self, building: Building, now: DateTime<Utc>) -> Result<PropertyPage, ServerError> {
        let key = self.session.identity()?;
        let properties_viewed = self
            .activity
            .track_property_view(&key, building.id, &building.name, now)?;
        let is_favorite = self.activity.is_favorite(&key, building.id)?;
        Ok(PropertyPage {
            building,
            is_favorite,
            properties_viewed,
        })
    }

    pub fn favorites(&self) -> Result<Vec<Favorite>, ServerError> {
        let key = self.session.identity()?;
        Ok(self.activity.favorites(&key)?)
    }

    /// Add or remove `building` from the signed-in user's favorites.
    pub fn toggle_favorite(&self, building: Building, now: DateTime<Utc>) -> Result<FavoriteToggle, ServerError> {
        let (profile, key) = self.require_user("Please login to add favorites")?;
        let id = building.id;

        let (favorited, favorites) = self.activity.toggle_favorite(&key, building, now)?;
        if !favorited {
            info!(user = %key, property_id = id, "removed from favorites");
            return Ok(FavoriteToggle {
                favorited,
                favorites,
            });
        }

        info!(user = %key, property_id = id, "added to favorites");
        if let Some(user_id) = profile.id {
            self.mirror("favorite", move |api| api.add_favorite_building(user_id, id))?;
        }
        Ok(FavoriteToggle {
            favorited,
            favorites,
        })
    }

    pub fn appointments(&self) -> Result<Vec<Appointment>, ServerError> {
        let key = self.session.identity()?;
        Ok(self.activity.appointments(&key)?)
    }

    /// The backend's copy of the user's appointments, or the demo list when
    /// the backend cannot be reached.
    pub fn remote_appointments(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>, ServerError> {
        let (_, key) = self.require_user("Please login to continue")?;
        let api = self.require_api()?;
        Ok(api.user_appointments_or_fallback(key.as_str(), now))
    }

    /// Store a pending appointment, tell the operator, mirror to the backend.
    pub fn book_appointment(&self, req: BookingRequest, now: DateTime<Utc>) -> Result<Booking, ServerError> {
        let (profile, key) = self.require_user("Please login to book an appointment")?;
        validate_booking(&req, now)?;

        let message = req
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_BOOKING_MESSAGE.to_string());
        let data = NewAppointment {
            property_id: req.property_id,
            property_name: req.property_name.trim().to_string(),
            property_location: req.property_location,
            requested_time: req.requested_time,
            meeting_mode: req.meeting_mode,
            message,
            user_name: profile.name.clone(),
            user_email: profile.email.clone(),
            user_phone: req.phone.filter(|p| !p.trim().is_empty()).or(profile.phone),
        };

        let appointment = self.activity.store_appointment(&key, data, now)?;
        info!(user = %key, appointment_id = appointment.id, property_id = appointment.property_id, "appointment booked");

        let notification = self.notifier.appointment_requested(&appointment);

        let remote = appointment.clone();
        self.mirror("book appointment", move |api| api.book_appointment(&remote))?;

        Ok(Booking {
            appointment,
            notification,
        })
    }

    /// Mark one of the signed-in user's appointments cancelled.
    pub fn cancel_appointment(&self, id: i64, now: DateTime<Utc>) -> Result<Appointment, ServerError> {
        let (_, key) = self.require_user("Please login to continue")?;

        let change = self.activity.transition_appointment(
            &key,
            id,
            AppointmentStatus::Cancelled,
            now,
            |current| matches!(current, AppointmentStatus::Pending | AppointmentStatus::Confirmed),
        )?;
        let cancelled = match (change.previous, change.changed) {
            (None, _) => return Err(ServerError::NotFound),
            (Some(status), None) => {
                return Err(ServerError::BadRequest(format!(
                    "A {status} appointment cannot be cancelled"
                )))
            }
            (Some(_), Some(cancelled)) => cancelled,
        };
        info!(user = %key, appointment_id = id, "appointment cancelled");

        self.mirror("cancel appointment", move |api| api.cancel_appointment(id))?;
        Ok(cancelled)
    }

    /// Wipe the signed-in user's favorites, appointments and view counters.
    /// The session itself and other users' data are kept.
    pub fn clear_my_data(&self) -> Result<(), ServerError> {
        let (_, key) = self.require_user("Please login to continue")?;
        self.activity.clear_user_data(&key)?;
        info!(user = %key, "cleared local activity data");
        Ok(())
    }

    /// Seeds the partition on first visit and counts one profile view.
    pub fn dashboard(&self) -> Result<Dashboard, ServerError> {
        let (user, key) = self.require_user("Please login to view your dashboard")?;

        self.with_rng(|rng| -> Result<(), ServerError> {
            self.activity.initialize_user_data(&key, rng)?;
            self.activity.track_profile_view(&key, rng)?;
            Ok(())
        })?;

        let mut recently_viewed = self.activity.viewed_properties(&key)?;
        recently_viewed.sort_by(|a, b| b.last_viewed.cmp(&a.last_viewed));

        Ok(Dashboard {
            stats: self.activity.dashboard_stats(&key)?,
            favorites: self.activity.favorites(&key)?,
            appointments: self.activity.appointments(&key)?,
            recently_viewed,
            user,
        })
    }
}
