// src/notify/templates.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::{Appointment, MeetingMode};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const DEFAULT_USER_MESSAGE: &str = "Looking forward to viewing this property.";
const DEFAULT_ADMIN_MESSAGE: &str = "Looking forward to meeting with you!";

/// Who is sending, and where the operator inbox is.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub admin_email: String,
    pub admin_template_id: String,
    pub user_template_id: String,
    pub company_name: String,
    pub company_phone: String,
    pub company_email: String,
}

/// Variables handed to the relay's stored template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub to_name: String,
    pub from_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_phone: Option<String>,
    pub building_name: String,
    pub building_location: String,
    pub appointment_time: String,
    pub meeting_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_message: Option<String>,
    pub subject: String,
}

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y, %H:%M UTC").to_string()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

pub fn notification_params(a: &Appointment, cfg: &NotifyConfig) -> TemplateParams {
    TemplateParams {
        to_email: cfg.admin_email.clone(),
        to_name: "Admin".to_string(),
        from_name: a.user_name.clone(),
        from_email: Some(a.user_email.clone()),
        from_phone: a.user_phone.clone(),
        building_name: a.property_name.clone(),
        building_location: a.property_location.clone(),
        appointment_time: format_time(&a.requested_time),
        meeting_mode: a.meeting_mode.label().to_string(),
        user_message: Some(
            non_empty(Some(&a.message))
                .unwrap_or(DEFAULT_USER_MESSAGE)
                .to_string(),
        ),
        admin_message: None,
        subject: format!("New Appointment Request - {}", a.property_name),
    }
}

pub fn confirmation_params(
    a: &Appointment,
    admin_message: Option<&str>,
    cfg: &NotifyConfig,
) -> TemplateParams {
    TemplateParams {
        to_email: a.user_email.clone(),
        to_name: a.user_name.clone(),
        from_name: cfg.company_name.clone(),
        from_email: None,
        from_phone: None,
        building_name: a.property_name.clone(),
        building_location: a.property_location.clone(),
        appointment_time: format_time(&a.requested_time),
        meeting_mode: a.meeting_mode.label().to_string(),
        user_message: None,
        admin_message: Some(
            non_empty(admin_message)
                .unwrap_or(DEFAULT_ADMIN_MESSAGE)
                .to_string(),
        ),
        subject: format!("Appointment Confirmed - {}", a.property_name),
    }
}

/// Plain-text body of the operator notification.
pub fn notification_body(a: &Appointment, cfg: &NotifyConfig) -> String {
    let phone = a.user_phone.as_deref().unwrap_or("Not provided");
    let message = match non_empty(Some(&a.message)) {
        Some(m) => format!("\n💬 Message: {m}\n"),
        None => String::new(),
    };

    format!(
        "Dear Admin,

A new appointment has been requested on the {company} platform.

APPOINTMENT DETAILS:
{RULE}

🏢 Property: {property}
📍 Location: {location}
📅 Requested Date & Time: {time}
🎯 Meeting Mode: {mode}

CUSTOMER DETAILS:
{RULE}

👤 Name: {name}
📧 Email: {email}
📱 Phone: {phone}
{message}
NEXT STEPS:
{RULE}

1. Contact the customer to confirm the appointment
2. Update the appointment status in the admin panel
3. Send confirmation details to the customer

Please log into the admin dashboard to manage this appointment request.

Best regards,
{company} System
{RULE}

This is an automated message. Please do not reply to this email.",
        company = cfg.company_name,
        property = a.property_name,
        location = a.property_location,
        time = format_time(&a.requested_time),
        mode = a.meeting_mode.label(),
        name = a.user_name,
        email = a.user_email,
    )
}

/// Plain-text body of the requester confirmation.
pub fn confirmation_body(a: &Appointment, admin_message: Option<&str>, cfg: &NotifyConfig) -> String {
    let team_message = match non_empty(admin_message) {
        Some(m) => format!("\n💬 Message from our team: {m}\n"),
        None => String::new(),
    };
    let reminders = match a.meeting_mode {
        MeetingMode::InPerson => {
            "• Please arrive 10 minutes early for your appointment\n\
             • Bring a valid ID for verification\n\
             • Feel free to ask any questions during your visit"
        }
        MeetingMode::Virtual => {
            "• You will receive a meeting link closer to the appointment time\n\
             • Ensure you have a stable internet connection\n\
             • Prepare any questions you may have about the property"
        }
    };

    format!(
        "Dear {name},

Your appointment request has been confirmed!

APPOINTMENT CONFIRMATION:
{RULE}

🏢 Property: {property}
📍 Location: {location}
📅 Date & Time: {time}
🎯 Meeting Mode: {mode}
{team_message}
IMPORTANT REMINDERS:
{RULE}

{reminders}

Need to reschedule or cancel? Contact us at:
📞 {phone}
📧 {email}

Thank you for choosing {company}!

Best regards,
The {company} Team
{RULE}",
        name = a.user_name,
        property = a.property_name,
        location = a.property_location,
        time = format_time(&a.requested_time),
        mode = a.meeting_mode.label(),
        phone = cfg.company_phone,
        email = cfg.company_email,
        company = cfg.company_name,
    )
}
