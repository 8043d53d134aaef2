// src/api/admin.rs
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::warn;

use crate::activity::{Appointment, AppointmentStatus};
use crate::api::client::{ApiClient, ApiError};
use crate::api::fallback;
use crate::api::models::{AdminUser, UserRole};

impl ApiClient {
    pub fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let url = self.url("admin/users")?;
        self.send(self.get(url), "admin users")
    }

    pub fn admin_users_or_fallback(&self, now: DateTime<Utc>) -> Vec<AdminUser> {
        self.admin_users().unwrap_or_else(|e| {
            warn!(endpoint = "admin/users", error = %e, "backend unavailable, serving fallback payload");
            fallback::admin_users(now)
        })
    }

    pub fn admin_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let url = self.url("admin/appointments")?;
        self.send(self.get(url), "admin appointments")
    }

    pub fn admin_appointments_or_fallback(&self, now: DateTime<Utc>) -> Vec<Appointment> {
        self.admin_appointments().unwrap_or_else(|e| {
            warn!(endpoint = "admin/appointments", error = %e, "backend unavailable, serving fallback payload");
            fallback::admin_appointments(now)
        })
    }

    pub fn update_user_role(&self, user_id: i64, role: UserRole) -> Result<Value, ApiError> {
        let url = self.url(&format!("admin/users/{user_id}/role"))?;
        self.send(self.patch(url).json(&json!({ "role": role })), &format!("user {user_id}"))
    }

    pub fn delete_user(&self, user_id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("admin/users/{user_id}"))?;
        self.send(self.delete(url), &format!("user {user_id}"))
    }

    pub fn update_appointment_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<Value, ApiError> {
        let url = self.url(&format!("admin/appointments/{appointment_id}/status"))?;
        self.send(
            self.patch(url).json(&json!({ "status": status })),
            &format!("appointment {appointment_id}"),
        )
    }

    pub fn delete_appointment(&self, appointment_id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("admin/appointments/{appointment_id}"))?;
        self.send(self.delete(url), &format!("appointment {appointment_id}"))
    }
}
