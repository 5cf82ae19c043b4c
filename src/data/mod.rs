//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - Entity models and read-side views

mod database;
mod models;

pub use database::{unique_violation_field, Database};
pub use models::*;
