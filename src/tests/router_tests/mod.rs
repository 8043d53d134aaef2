mod admin_tests;
mod appointment_tests;
mod favorites_tests;
mod session_tests;
