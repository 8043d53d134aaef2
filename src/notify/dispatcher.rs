// src/notify/dispatcher.rs
use serde::Serialize;
use tracing::{info, warn};

use crate::activity::Appointment;
use crate::notify::relay::MessageRelay;
use crate::notify::templates::{
    confirmation_body, confirmation_params, notification_body, notification_params, NotifyConfig,
    TemplateParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPath {
    Relay,
    LoggedFallback,
}

/// Outcome of a dispatch. Always inspected, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    pub path: DeliveryPath,
}

impl DispatchResult {
    fn relayed(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            path: DeliveryPath::Relay,
        }
    }

    fn logged(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            path: DeliveryPath::LoggedFallback,
        }
    }
}

pub trait Notifier: Send + Sync {
    /// "New appointment" message to the operator.
    fn appointment_requested(&self, appointment: &Appointment) -> DispatchResult;

    /// "Appointment confirmed" message to the requester.
    fn appointment_confirmed(
        &self,
        appointment: &Appointment,
        admin_message: Option<&str>,
    ) -> DispatchResult;
}

pub struct NotificationDispatcher {
    relay: Box<dyn MessageRelay>,
    cfg: NotifyConfig,
}

impl NotificationDispatcher {
    pub fn new(relay: Box<dyn MessageRelay>, cfg: NotifyConfig) -> Self {
        Self { relay, cfg }
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.cfg
    }

    /// Returns the relay error text, or None when delivered.
    fn try_relay(&self, template_id: &str, params: &TemplateParams) -> Option<String> {
        if !self.relay.is_configured() {
            return Some("relay not configured".to_string());
        }
        match self.relay.send(template_id, params) {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        }
    }
}

impl Notifier for NotificationDispatcher {
    fn appointment_requested(&self, appointment: &Appointment) -> DispatchResult {
        let params = notification_params(appointment, &self.cfg);

        let Some(reason) = self.try_relay(&self.cfg.admin_template_id, &params) else {
            info!(appointment_id = appointment.id, to = %params.to_email, "appointment notification sent");
            return DispatchResult::relayed("Appointment notification sent successfully");
        };

        if self.relay.is_configured() {
            warn!(appointment_id = appointment.id, error = %reason, "relay delivery failed, logging notification");
        }
        info!(
            kind = "appointment_requested",
            appointment_id = appointment.id,
            to = %params.to_email,
            subject = %params.subject,
            from_name = %params.from_name,
            property = %params.building_name,
            time = %params.appointment_time,
            mode = %params.meeting_mode,
            body = %notification_body(appointment, &self.cfg),
            "notification logged instead of sent"
        );
        DispatchResult::logged("Appointment notification logged (relay unavailable)")
    }

    fn appointment_confirmed(
        &self,
        appointment: &Appointment,
        admin_message: Option<&str>,
    ) -> DispatchResult {
        let params = confirmation_params(appointment, admin_message, &self.cfg);

        let Some(reason) = self.try_relay(&self.cfg.user_template_id, &params) else {
            info!(appointment_id = appointment.id, to = %params.to_email, "appointment confirmation sent");
            return DispatchResult::relayed("Appointment confirmation sent successfully");
        };

        if self.relay.is_configured() {
            warn!(appointment_id = appointment.id, error = %reason, "relay delivery failed, logging confirmation");
        }
        info!(
            kind = "appointment_confirmed",
            appointment_id = appointment.id,
            to = %params.to_email,
            subject = %params.subject,
            property = %params.building_name,
            time = %params.appointment_time,
            mode = %params.meeting_mode,
            body = %confirmation_body(appointment, admin_message, &self.cfg),
            "confirmation logged instead of sent"
        );
        DispatchResult::logged("Appointment confirmation logged (relay unavailable)")
    }
}
