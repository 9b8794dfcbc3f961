//! Alert ingestion pipeline for the motor alert relay.
//!
//! Orchestrates the per-delivery flow: decode → persist → re-publish →
//! acknowledge, and owns shutdown sequencing.

pub mod config;
pub mod coordinator;

pub use config::*;
pub use coordinator::*;
