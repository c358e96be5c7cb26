pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod health_monitor;
pub mod middlewares;
pub mod models;
pub mod params;
pub mod schema;
pub mod server;
pub mod store;
pub mod types;

pub use errors::{ApiError, AppError};
