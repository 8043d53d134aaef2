// src/activity/keys.rs
use serde::{Deserialize, Serialize};
use std::fmt;

const ANONYMOUS: &str = "anonymous";

/// Partition key for everything a user stores locally.
///
/// Derived from the session user's id, else their email, else `"anonymous"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Blank input collapses to the anonymous partition.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The per-user collections kept in the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    ViewedProperties,
    ProfileViews,
    Appointments,
    Favorites,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::ViewedProperties,
        Collection::ProfileViews,
        Collection::Appointments,
        Collection::Favorites,
    ];

    pub fn base_key(&self) -> &'static str {
        match self {
            Collection::ViewedProperties => "user_viewed_properties",
            Collection::ProfileViews => "user_profile_views",
            Collection::Appointments => "user_appointments",
            Collection::Favorites => "user_favorites",
        }
    }

    pub fn storage_key(&self, user: &IdentityKey) -> String {
        format!("{}_{}", self.base_key(), user.as_str())
    }
}

/// Split a stored key back into its collection and partition.
/// Keys that are not activity collections (session entries etc.) yield `None`.
pub fn parse_storage_key(key: &str) -> Option<(Collection, IdentityKey)> {
    Collection::ALL.iter().find_map(|c| {
        key.strip_prefix(c.base_key())
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|id| !id.is_empty())
            .map(|id| (*c, IdentityKey(id.to_string())))
    })
}
