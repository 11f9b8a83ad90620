//! Data models for the homepage backend.
//!
//! These models match the frontend wire format exactly for seamless interoperability.

mod profile;

pub use profile::*;
