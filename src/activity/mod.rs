pub mod keys;
pub mod models;
pub mod store;

pub use keys::{Collection, IdentityKey};
pub use models::{
    Appointment, AppointmentStatus, DashboardStats, Favorite, MeetingMode, NewAppointment,
    PropertyId, PropertyView, StatusChange,
};
pub use store::{profile_view_seed, UserActivityStore};
