pub mod session;
pub mod validate;

pub use session::{identity_for, LoginError, ProfileUpdate, SessionProvider};
pub use validate::{validate_login, validate_registration, FieldError, ValidationError};
