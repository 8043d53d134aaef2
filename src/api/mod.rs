mod admin;
mod appointments;
mod buildings;
pub mod client;
pub mod fallback;
pub mod models;
mod users;

pub use client::{classify_status, ApiClient, ApiError};
pub use models::{
    AdminUser, Building, BuildingFilter, Credentials, LoginResponse, NewBuilding, Registration,
    UserProfile, UserRole,
};
