//! PostgreSQL store for the motor alert relay.

pub mod client;
pub mod config;
pub mod health;
pub mod insert;
pub mod query;
pub mod schema;

pub use client::*;
pub use config::*;
pub use insert::*;
pub use query::*;
