// src/api/fallback.rs
//! Fixed payloads served when a read path cannot reach the backend, so the
//! pages stay populated in demo/offline conditions.
use chrono::{DateTime, Duration, Utc};

use crate::activity::{Appointment, AppointmentStatus, MeetingMode};
use crate::api::models::{AdminUser, UserRole};

fn user(
    now: DateTime<Utc>,
    id: i64,
    name: &str,
    email: &str,
    role: UserRole,
    days_ago: i64,
    favorites: &[i64],
) -> AdminUser {
    AdminUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        created_at: now - Duration::days(days_ago),
        favorite_building_ids: favorites.to_vec(),
        phone: Some(format!("+91 98765 432{:02}", 9 + id)),
        status: "active".to_string(),
    }
}

pub fn admin_users(now: DateTime<Utc>) -> Vec<AdminUser> {
    vec![
        user(now, 1, "John Doe", "john@example.com", UserRole::User, 30, &[1, 2, 3]),
        user(now, 2, "Jane Smith", "jane@example.com", UserRole::User, 15, &[2, 4]),
        user(now, 3, "Admin User", "admin@clementregency.com", UserRole::Admin, 90, &[]),
        user(now, 4, "Demo User", "demo@clementregency.com", UserRole::User, 5, &[1, 3, 5]),
        user(now, 5, "Priya Sharma", "priya.sharma@gmail.com", UserRole::User, 7, &[2, 6]),
        user(now, 6, "Rajesh Kumar", "rajesh.kumar@yahoo.com", UserRole::User, 12, &[1, 4, 7]),
        user(now, 7, "Anita Patel", "anita.patel@hotmail.com", UserRole::User, 20, &[3, 5]),
    ]
}

/// One canned appointment, timed relative to `now`.
struct Row {
    id: i64,
    user_id: &'static str,
    property_id: i64,
    property_name: &'static str,
    property_location: &'static str,
    user_name: &'static str,
    user_email: &'static str,
    hours_ahead: i64,
    status: AppointmentStatus,
    mode: MeetingMode,
}

impl Row {
    fn at(self, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: self.id,
            user_id: self.user_id.to_string(),
            property_id: self.property_id,
            property_name: self.property_name.to_string(),
            property_location: self.property_location.to_string(),
            requested_time: now + Duration::hours(self.hours_ahead),
            meeting_mode: self.mode,
            message: String::new(),
            user_name: self.user_name.to_string(),
            user_email: self.user_email.to_string(),
            user_phone: None,
            status: self.status,
            created_at: now,
            updated_at: None,
        }
    }
}

const DOWNTOWN: Row = Row {
    id: 1,
    user_id: "1",
    property_id: 1,
    property_name: "Luxury Downtown Apartment",
    property_location: "Downtown District",
    user_name: "John Doe",
    user_email: "john@example.com",
    hours_ahead: 24,
    status: AppointmentStatus::Confirmed,
    mode: MeetingMode::InPerson,
};

const OFFICE: Row = Row {
    id: 2,
    user_id: "2",
    property_id: 2,
    property_name: "Modern Office Space",
    property_location: "Business Center",
    user_name: "Jane Smith",
    user_email: "jane@example.com",
    hours_ahead: 48,
    status: AppointmentStatus::Pending,
    mode: MeetingMode::Virtual,
};

const STUDIO: Row = Row {
    id: 3,
    user_id: "1",
    property_id: 3,
    property_name: "Cozy Studio Apartment",
    property_location: "Riverside",
    user_name: "John Doe",
    user_email: "john@example.com",
    hours_ahead: 72,
    status: AppointmentStatus::Completed,
    mode: MeetingMode::InPerson,
};

pub fn admin_appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    [DOWNTOWN, OFFICE, STUDIO].into_iter().map(|r| r.at(now)).collect()
}

pub fn user_appointments(now: DateTime<Utc>, user_id: &str) -> Vec<Appointment> {
    [DOWNTOWN, OFFICE]
        .into_iter()
        .map(|r| Appointment {
            user_id: user_id.to_string(),
            user_name: String::new(),
            user_email: String::new(),
            ..r.at(now)
        })
        .collect()
}
