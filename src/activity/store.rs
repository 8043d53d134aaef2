// src/activity/store.rs
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::activity::keys::{parse_storage_key, Collection, IdentityKey};
use crate::activity::models::{
    Appointment, AppointmentStatus, DashboardStats, Favorite, NewAppointment, PropertyId,
    PropertyView, StatusChange,
};
use crate::api::models::Building;
use crate::db::{KeyValueStore, StoreError, Write};

/// Random starting point for the simulated profile-view counter, in `[5, 25)`.
pub fn profile_view_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(5..25)
}

/// Favorites, appointments and view counters, partitioned by [`IdentityKey`].
///
/// Every operation names the partition explicitly; there is no notion of a
/// "current user" in here. Timestamps come from the caller.
#[derive(Clone, Debug)]
pub struct UserActivityStore {
    kv: KeyValueStore,
}

impl UserActivityStore {
    pub fn new(kv: KeyValueStore) -> Self {
        Self { kv }
    }

    // ---- property views ----

    /// Count one view of `property_id`. Returns the number of distinct
    /// properties this user has viewed.
    pub fn track_property_view(
        &self,
        user: &IdentityKey,
        property_id: PropertyId,
        property_name: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let key = Collection::ViewedProperties.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut views: Vec<PropertyView> = decode_list(&key, raw);

            match views.iter_mut().find(|v| v.property_id == property_id) {
                Some(v) => {
                    v.view_count += 1;
                    v.last_viewed = now;
                }
                None => views.push(PropertyView {
                    property_id,
                    property_name: property_name.to_string(),
                    view_count: 1,
                    first_viewed: now,
                    last_viewed: now,
                }),
            }

            let distinct = views.len();
            Ok((Write::Put(encode(&views)?), distinct))
        })
    }

    pub fn viewed_properties(&self, user: &IdentityKey) -> Result<Vec<PropertyView>, StoreError> {
        self.read_list(&Collection::ViewedProperties.storage_key(user))
    }

    // ---- profile views ----

    /// Bump the profile-view counter. An unseeded counter starts from
    /// [`profile_view_seed`] drawn from `rng`.
    pub fn track_profile_view<R: Rng + ?Sized>(
        &self,
        user: &IdentityKey,
        rng: &mut R,
    ) -> Result<u64, StoreError> {
        let key = Collection::ProfileViews.storage_key(user);
        self.kv.update(&key, |raw| {
            let current = match decode_counter(&key, raw) {
                Some(n) => n,
                None => profile_view_seed(rng),
            };
            let next = current + 1;
            Ok((Write::Put(next.to_string()), next))
        })
    }

    /// Stored counter, or 0 when the partition has never been seeded.
    pub fn profile_views(&self, user: &IdentityKey) -> Result<u64, StoreError> {
        let key = Collection::ProfileViews.storage_key(user);
        Ok(decode_counter(&key, self.kv.get(&key)?).unwrap_or(0))
    }

    // ---- appointments ----

    /// Append a new pending appointment. The id is the creation time in
    /// milliseconds, bumped past any existing id in the partition.
    pub fn store_appointment(
        &self,
        user: &IdentityKey,
        data: NewAppointment,
        now: DateTime<Utc>,
    ) -> Result<Appointment, StoreError> {
        let key = Collection::Appointments.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut appointments: Vec<Appointment> = decode_list(&key, raw);

            let highest = appointments.iter().map(|a| a.id).max().unwrap_or(i64::MIN);
            let id = now.timestamp_millis().max(highest.saturating_add(1));

            let created = Appointment {
                id,
                user_id: user.as_str().to_string(),
                property_id: data.property_id,
                property_name: data.property_name,
                property_location: data.property_location,
                requested_time: data.requested_time,
                meeting_mode: data.meeting_mode,
                message: data.message,
                user_name: data.user_name,
                user_email: data.user_email,
                user_phone: data.user_phone,
                status: AppointmentStatus::Pending,
                created_at: now,
                updated_at: None,
            };
            appointments.push(created.clone());

            Ok((Write::Put(encode(&appointments)?), created))
        })
    }

    pub fn appointments(&self, user: &IdentityKey) -> Result<Vec<Appointment>, StoreError> {
        self.read_list(&Collection::Appointments.storage_key(user))
    }

    /// Set the status of appointment `id`. A missing id is not an error:
    /// the collection comes back unchanged with `changed == None`.
    pub fn update_appointment_status(
        &self,
        user: &IdentityKey,
        id: i64,
        status: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, StoreError> {
        self.transition_appointment(user, id, status, now, |_| true)
    }

    /// Like [`update_appointment_status`](Self::update_appointment_status),
    /// but only writes when `allowed` accepts the current status. The check
    /// and the write happen in one transaction.
    pub fn transition_appointment(
        &self,
        user: &IdentityKey,
        id: i64,
        status: AppointmentStatus,
        now: DateTime<Utc>,
        allowed: impl FnOnce(AppointmentStatus) -> bool,
    ) -> Result<StatusChange, StoreError> {
        let key = Collection::Appointments.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut appointments: Vec<Appointment> = decode_list(&key, raw);

            let Some(pos) = appointments.iter().position(|a| a.id == id) else {
                debug!(user = %user, id, "appointment not found, status unchanged");
                return Ok((
                    Write::Keep,
                    StatusChange {
                        appointments,
                        previous: None,
                        changed: None,
                    },
                ));
            };

            let previous = appointments[pos].status;
            if !allowed(previous) {
                return Ok((
                    Write::Keep,
                    StatusChange {
                        appointments,
                        previous: Some(previous),
                        changed: None,
                    },
                ));
            }

            let found = &mut appointments[pos];
            found.status = status;
            found.updated_at = Some(now);
            let changed = found.clone();

            Ok((
                Write::Put(encode(&appointments)?),
                StatusChange {
                    appointments,
                    previous: Some(previous),
                    changed: Some(changed),
                },
            ))
        })
    }

    /// Every locally stored appointment across all partitions, oldest first.
    pub fn all_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let mut all = Vec::new();
        for key in self.kv.list_keys()? {
            if let Some((Collection::Appointments, _)) = parse_storage_key(&key) {
                all.extend(self.read_list::<Appointment>(&key)?);
            }
        }
        all.sort_by_key(|a| (a.created_at, a.id));
        Ok(all)
    }

    // ---- favorites ----

    /// Add `property_id` unless it is already a favorite. Returns the list.
    pub fn add_to_favorites(
        &self,
        user: &IdentityKey,
        property_id: PropertyId,
        mut property: Building,
        now: DateTime<Utc>,
    ) -> Result<Vec<Favorite>, StoreError> {
        let key = Collection::Favorites.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut favorites: Vec<Favorite> = decode_list(&key, raw);
            if favorites.iter().any(|f| f.property_id() == property_id) {
                return Ok((Write::Keep, favorites));
            }

            property.id = property_id;
            favorites.push(Favorite {
                property,
                added_at: now,
            });
            Ok((Write::Put(encode(&favorites)?), favorites))
        })
    }

    /// Remove `property` if it is a favorite, add it otherwise, in one
    /// transaction. Returns whether it is now a favorite, and the list.
    pub fn toggle_favorite(
        &self,
        user: &IdentityKey,
        property: Building,
        now: DateTime<Utc>,
    ) -> Result<(bool, Vec<Favorite>), StoreError> {
        let key = Collection::Favorites.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut favorites: Vec<Favorite> = decode_list(&key, raw);
            let before = favorites.len();
            favorites.retain(|f| f.property_id() != property.id);

            let favorited = favorites.len() == before;
            if favorited {
                favorites.push(Favorite {
                    property,
                    added_at: now,
                });
            }
            Ok((Write::Put(encode(&favorites)?), (favorited, favorites)))
        })
    }

    pub fn remove_from_favorites(
        &self,
        user: &IdentityKey,
        property_id: PropertyId,
    ) -> Result<Vec<Favorite>, StoreError> {
        let key = Collection::Favorites.storage_key(user);
        self.kv.update(&key, |raw| {
            let mut favorites: Vec<Favorite> = decode_list(&key, raw);
            let before = favorites.len();
            favorites.retain(|f| f.property_id() != property_id);

            if favorites.len() == before {
                return Ok((Write::Keep, favorites));
            }
            Ok((Write::Put(encode(&favorites)?), favorites))
        })
    }

    pub fn favorites(&self, user: &IdentityKey) -> Result<Vec<Favorite>, StoreError> {
        self.read_list(&Collection::Favorites.storage_key(user))
    }

    pub fn is_favorite(
        &self,
        user: &IdentityKey,
        property_id: PropertyId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .favorites(user)?
            .iter()
            .any(|f| f.property_id() == property_id))
    }

    // ---- aggregates + housekeeping ----

    pub fn dashboard_stats(&self, user: &IdentityKey) -> Result<DashboardStats, StoreError> {
        Ok(DashboardStats {
            total_favorites: self.favorites(user)?.len(),
            total_appointments: self.appointments(user)?.len(),
            properties_viewed: self.viewed_properties(user)?.len(),
            profile_views: self.profile_views(user)?,
        })
    }

    /// Remove every collection stored for `user`. Other partitions are untouched.
    pub fn clear_user_data(&self, user: &IdentityKey) -> Result<(), StoreError> {
        for c in Collection::ALL {
            self.kv.remove(&c.storage_key(user))?;
        }
        Ok(())
    }

    /// Remove activity collections for every partition found in the store.
    /// Returns how many keys were removed.
    pub fn clear_all_users_data(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in self.kv.list_keys()? {
            if parse_storage_key(&key).is_some() {
                self.kv.remove(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Seed empty collections (and a random profile-view baseline) for any
    /// collection `user` does not have yet. Existing values are left alone.
    pub fn initialize_user_data<R: Rng + ?Sized>(
        &self,
        user: &IdentityKey,
        rng: &mut R,
    ) -> Result<(), StoreError> {
        for c in Collection::ALL {
            let key = c.storage_key(user);
            self.kv.update(&key, |raw| {
                if raw.is_some() {
                    return Ok((Write::Keep, ()));
                }
                let seeded = match c {
                    Collection::ProfileViews => profile_view_seed(rng).to_string(),
                    _ => "[]".to_string(),
                };
                Ok((Write::Put(seeded), ()))
            })?;
        }
        Ok(())
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        Ok(decode_list(key, self.kv.get(key)?))
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

/// Corrupt collections read as empty rather than failing the caller.
fn decode_list<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "stored collection is corrupt, using empty default");
        Vec::new()
    })
}

fn decode_counter(key: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(key, error = %e, "stored counter is corrupt, treating as unseeded");
            None
        }
    }
}
