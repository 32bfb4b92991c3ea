pub mod api;
pub mod config;
pub mod model;
pub mod platform;
pub mod session;
