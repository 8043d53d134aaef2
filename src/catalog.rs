// src/catalog.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::activity::Appointment;
use crate::api::models::{AdminUser, Building};

/// Listing-page search box plus filter panel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub min_cost: Option<f64>,
    #[serde(default)]
    pub max_cost: Option<f64>,
}

impl BuildingQuery {
    /// Parse `search`, `type`, `minCost`, `maxCost` from a query string.
    /// Unparseable numbers are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut q = BuildingQuery::default();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            let v = v.trim();
            if v.is_empty() {
                continue;
            }
            match k.as_ref() {
                "search" | "q" => q.search = Some(v.to_string()),
                "type" => q.property_type = Some(v.to_string()),
                "minCost" => q.min_cost = v.parse().ok(),
                "maxCost" => q.max_cost = v.parse().ok(),
                _ => {}
            }
        }
        q
    }

    pub fn matches(&self, b: &Building) -> bool {
        if let Some(term) = self.search.as_deref().map(str::to_lowercase) {
            let hit = b.name.to_lowercase().contains(&term)
                || b.location.to_lowercase().contains(&term)
                || b.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(t) = &self.property_type {
            if &b.property_type != t {
                return false;
            }
        }
        if self.min_cost.is_some_and(|min| b.cost < min) {
            return false;
        }
        if self.max_cost.is_some_and(|max| b.cost > max) {
            return false;
        }
        true
    }
}

pub fn filter_buildings(buildings: Vec<Building>, query: &BuildingQuery) -> Vec<Building> {
    buildings.into_iter().filter(|b| query.matches(b)).collect()
}

/// Case-insensitive match on name or email.
pub fn search_users(users: Vec<AdminUser>, term: &str) -> Vec<AdminUser> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return users;
    }
    users
        .into_iter()
        .filter(|u| u.name.to_lowercase().contains(&term) || u.email.to_lowercase().contains(&term))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_properties: usize,
    pub total_users: usize,
    pub total_appointments: usize,
    pub available_properties: usize,
}

impl AdminOverview {
    pub fn compute(buildings: &[Building], users: &[AdminUser], appointments: &[Appointment]) -> Self {
        Self {
            total_properties: buildings.len(),
            total_users: users.len(),
            total_appointments: appointments.len(),
            available_properties: buildings.iter().filter(|b| b.available).count(),
        }
    }
}

/// Local records first, then remote ones whose id is not already present.
pub fn merge_appointments(local: Vec<Appointment>, remote: Vec<Appointment>) -> Vec<Appointment> {
    let mut seen: HashSet<i64> = local.iter().map(|a| a.id).collect();
    let mut merged = local;
    for a in remote {
        if seen.insert(a.id) {
            merged.push(a);
        }
    }
    merged
}
