//! Test support for the motor alert relay.

pub mod fixtures;
pub mod mocks;
