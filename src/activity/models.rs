// src/activity/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::models::Building;

pub type PropertyId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Rejected,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// How the viewing takes place. Stored with the backend's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeetingMode {
    #[default]
    #[serde(rename = "physical", alias = "in-person")]
    InPerson,
    #[serde(rename = "online", alias = "virtual")]
    Virtual,
}

impl MeetingMode {
    pub fn label(&self) -> &'static str {
        match self {
            MeetingMode::InPerson => "In-Person Visit",
            MeetingMode::Virtual => "Online Meeting",
        }
    }
}

/// A saved listing: the snapshot taken when it was favorited, flattened,
/// plus `addedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(flatten)]
    pub property: Building,
    pub added_at: DateTime<Utc>,
}

impl Favorite {
    pub fn property_id(&self) -> PropertyId {
        self.property.id
    }
}

/// Booking input, before an id and status are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub property_id: PropertyId,
    pub property_name: String,
    pub property_location: String,
    pub requested_time: DateTime<Utc>,
    pub meeting_mode: MeetingMode,
    pub message: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: Option<String>,
}

/// Stored appointment. The aliases accept the backend's admin/user listing shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default, alias = "buildingId")]
    pub property_id: PropertyId,
    #[serde(default, alias = "buildingName")]
    pub property_name: String,
    #[serde(default, alias = "buildingLocation")]
    pub property_location: String,
    #[serde(alias = "appointmentTime", alias = "dateTime")]
    pub requested_time: DateTime<Utc>,
    #[serde(default, alias = "mode")]
    pub meeting_mode: MeetingMode,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_phone: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(d)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    pub property_id: PropertyId,
    pub property_name: String,
    pub view_count: u64,
    pub first_viewed: DateTime<Utc>,
    pub last_viewed: DateTime<Utc>,
}

/// Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_favorites: usize,
    pub total_appointments: usize,
    pub properties_viewed: usize,
    pub profile_views: u64,
}

/// Result of a status update. `previous` is the status read inside the same
/// write, `None` when the id was not found. `changed` is `None` when nothing
/// was written, in which case `appointments` is the untouched collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub appointments: Vec<Appointment>,
    pub previous: Option<AppointmentStatus>,
    pub changed: Option<Appointment>,
}
