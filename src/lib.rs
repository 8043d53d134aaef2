pub mod activity;
pub mod api;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod notify;
pub mod responses;
pub mod router;

#[cfg(test)]
mod tests;
