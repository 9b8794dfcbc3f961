//! Core types, codec, and errors for the motor alert relay.

pub mod alert;
pub mod codec;
pub mod error;

pub use alert::{AlertRecord, NotificationRecord, PersistedAlert};
pub use error::{Error, Result};
