//! RabbitMQ client for the motor alert relay.
//!
//! Owns topology declaration, delivery consumption and disposition,
//! and persistent notification publishing over a single channel.

pub mod client;
pub mod config;
pub mod consumer;
pub mod producer;
pub mod topology;

pub use client::*;
pub use config::*;
pub use producer::*;

/// One broker message in flight, carrying its acknowledgment token.
pub use lapin::message::Delivery;
