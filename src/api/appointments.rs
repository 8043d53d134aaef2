// src/api/appointments.rs
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::activity::Appointment;
use crate::api::client::{ApiClient, ApiError};
use crate::api::fallback;

impl ApiClient {
    pub fn book_appointment(&self, appointment: &Appointment) -> Result<Value, ApiError> {
        let url = self.url("appointments/book")?;
        self.send(self.post(url).json(appointment), "book appointment")
    }

    pub fn verify_appointment(&self, appointment_id: i64) -> Result<Value, ApiError> {
        let mut url = self.url("appointments/verify")?;
        url.query_pairs_mut()
            .append_pair("appointmentId", &appointment_id.to_string());
        self.send(self.get(url), &format!("appointment {appointment_id}"))
    }

    pub fn user_appointments(&self, user_id: &str) -> Result<Vec<Appointment>, ApiError> {
        let url = self.url(&format!("appointments/user/{user_id}"))?;
        self.send(self.get(url), "user appointments")
    }

    /// [`Self::user_appointments`], substituting the fixed demo list on failure.
    pub fn user_appointments_or_fallback(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Vec<Appointment> {
        self.user_appointments(user_id).unwrap_or_else(|e| {
            warn!(endpoint = "appointments/user", error = %e, "backend unavailable, serving fallback payload");
            fallback::user_appointments(now, user_id)
        })
    }

    pub fn cancel_appointment(&self, appointment_id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("appointments/{appointment_id}"))?;
        self.send(self.delete(url), &format!("appointment {appointment_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_server::serve_once;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn verify_passes_id_as_query() {
        let (base, handle) = serve_once(200, r#"{"valid":true}"#);
        let api = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let v = api.verify_appointment(55).unwrap();
        assert_eq!(v["valid"], true);

        let raw = handle.join().unwrap();
        assert!(raw.starts_with("GET /api/appointments/verify?appointmentId=55 "));
    }

    #[test]
    fn user_appointments_fall_back_on_server_error() {
        let (base, handle) = serve_once(500, "boom");
        let api = ApiClient::new(&base, Duration::from_secs(5)).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let list = api.user_appointments_or_fallback("4", now);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|a| a.user_id == "4"));
        handle.join().unwrap();
    }
}
