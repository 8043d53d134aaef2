// src/app/admin.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::activity::{Appointment, AppointmentStatus, IdentityKey};
use crate::api::fallback;
use crate::api::models::{AdminUser, Building, NewBuilding, UserRole};
use crate::app::App;
use crate::catalog::{merge_appointments, search_users, AdminOverview};
use crate::errors::ServerError;
use crate::notify::DispatchResult;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: AppointmentStatus,
    #[serde(default)]
    pub admin_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStatusChange {
    pub appointment: Appointment,
    /// Present only when the change confirmed the appointment.
    pub notification: Option<DispatchResult>,
}

impl App {
    pub fn admin_users(&self, now: DateTime<Utc>, search: Option<&str>) -> Result<Vec<AdminUser>, ServerError> {
        self.require_admin()?;
        let users = match self.authed_api()? {
            Some(api) => api.admin_users_or_fallback(now),
            None => {
                warn!(endpoint = "admin/users", "no backend configured, serving fallback payload");
                fallback::admin_users(now)
            }
        };
        Ok(search_users(users, search.unwrap_or_default()))
    }

    pub fn admin_set_user_role(&self, user_id: i64, role: UserRole) -> Result<Value, ServerError> {
        self.require_admin()?;
        Ok(self.require_api()?.update_user_role(user_id, role)?)
    }

    pub fn admin_delete_user(&self, user_id: i64) -> Result<Value, ServerError> {
        self.require_admin()?;
        Ok(self.require_api()?.delete_user(user_id)?)
    }

    /// Every local partition's appointments, then remote ones not seen locally.
    pub fn admin_appointments(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>, ServerError> {
        self.require_admin()?;
        let local = self.activity.all_appointments()?;
        let remote = match self.authed_api()? {
            Some(api) => api.admin_appointments_or_fallback(now),
            None => Vec::new(),
        };
        Ok(merge_appointments(local, remote))
    }

    /// Change the status of `owner`'s appointment `id`. Confirming sends the
    /// requester a confirmation, once per transition into `confirmed`.
    pub fn admin_set_appointment_status(
        &self,
        owner: &IdentityKey,
        id: i64,
        req: StatusRequest,
        now: DateTime<Utc>,
    ) -> Result<AdminStatusChange, ServerError> {
        self.require_admin()?;

        let change = self
            .activity
            .update_appointment_status(owner, id, req.status, now)?;
        let Some(appointment) = change.changed else {
            return Err(ServerError::NotFound);
        };
        info!(owner = %owner, appointment_id = id, status = %req.status, "appointment status changed");

        let notification = (req.status == AppointmentStatus::Confirmed
            && change.previous != Some(AppointmentStatus::Confirmed))
        .then(|| {
            self.notifier
                .appointment_confirmed(&appointment, req.admin_message.as_deref())
        });

        let status = req.status;
        self.mirror("appointment status", move |api| api.update_appointment_status(id, status))?;

        Ok(AdminStatusChange {
            appointment,
            notification,
        })
    }

    pub fn admin_delete_appointment(&self, id: i64) -> Result<Value, ServerError> {
        self.require_admin()?;
        Ok(self.require_api()?.delete_appointment(id)?)
    }

    pub fn admin_overview(&self, now: DateTime<Utc>) -> Result<AdminOverview, ServerError> {
        self.require_admin()?;
        let buildings = match self.authed_api()? {
            Some(api) => api.list_buildings().unwrap_or_else(|e| {
                warn!(endpoint = "buildings", error = %e, "backend unavailable, counting no listings");
                Vec::new()
            }),
            None => Vec::new(),
        };
        let users = self.admin_users(now, None)?;
        let appointments = self.admin_appointments(now)?;
        Ok(AdminOverview::compute(&buildings, &users, &appointments))
    }

    pub fn admin_create_building(&self, input: &NewBuilding) -> Result<Building, ServerError> {
        self.require_admin()?;
        let created = self.require_api()?.create_building(input)?;
        info!(building_id = created.id, "building created");
        Ok(created)
    }

    pub fn admin_update_building(&self, id: i64, input: &NewBuilding) -> Result<Building, ServerError> {
        self.require_admin()?;
        Ok(self.require_api()?.update_building(id, input)?)
    }

    pub fn admin_delete_building(&self, id: i64) -> Result<Value, ServerError> {
        self.require_admin()?;
        let out = self.require_api()?.delete_building(id)?;
        info!(building_id = id, "building deleted");
        Ok(out)
    }

    /// Wipe activity data for every identity. Session keys survive.
    pub fn admin_clear_local_data(&self) -> Result<usize, ServerError> {
        self.require_admin()?;
        let removed = self.activity.clear_all_users_data()?;
        warn!(removed, "cleared local activity data for all users");
        Ok(removed)
    }
}
