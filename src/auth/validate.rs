// src/auth/validate.rs
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::api::models::{Credentials, Registration};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// One or more form fields rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl ValidationError {
    pub fn single(field: &'static str, message: &'static str) -> Self {
        Self {
            fields: vec![FieldError { field, message }],
        }
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields: self.0 })
        }
    }
}

/// Trim + lowercase. Shape checking is [`is_email_shaped`]'s job.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `something@something.something`, no whitespace.
pub fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn check_email(c: &mut Collector, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        c.push("email", "Email is required");
    } else if !is_email_shaped(email) {
        c.push("email", "Please enter a valid email address");
    }
}

fn check_password(c: &mut Collector, password: &str) {
    if password.trim().is_empty() {
        c.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        c.push("password", "Password must be at least 6 characters long");
    }
}

pub fn validate_login(creds: &Credentials) -> Result<(), ValidationError> {
    let mut c = Collector::default();
    check_email(&mut c, &creds.email);
    check_password(&mut c, &creds.password);
    c.finish()
}

pub fn validate_registration(reg: &Registration) -> Result<(), ValidationError> {
    let mut c = Collector::default();
    if reg.name.trim().is_empty() {
        c.push("name", "Name is required");
    }
    check_email(&mut c, &reg.email);
    check_password(&mut c, &reg.password);
    if let Some(phone) = reg.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let allowed = phone
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' ' | '(' | ')'));
        if !allowed || digits < 7 {
            c.push("phone", "Please enter a valid phone number");
        }
    }
    c.finish()
}
