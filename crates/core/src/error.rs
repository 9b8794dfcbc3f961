//! Unified error types for the alert relay.
//!
//! Each variant maps to one disposition in the pipeline:
//! - `MalformedMessage` / `StoreUnavailable`: reject without requeue
//! - `PublishFailure`: acknowledge anyway, log a warning
//! - `ConnectionFailure`: fatal at startup, stop signal in steady state

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the alert relay.
#[derive(Debug, Error)]
pub enum Error {
    /// Inbound message could not be decoded into a valid alert.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Store insert failed (connectivity loss or constraint violation).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Outbound notification publish failed. The alert row is already
    /// durable when this is raised, so it never escalates past a warning.
    #[error("publish failure: {0}")]
    PublishFailure(String),

    /// Broker or store connection could not be established or was lost.
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMessage(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn publish_failure(msg: impl Into<String>) -> Self {
        Self::PublishFailure(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionFailure(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
