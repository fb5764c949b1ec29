//! Service layer for the Vibelist API
//!
//! The recommendation pipeline lives in [`crate::recommendations`]; this
//! module holds the dependency health checks.

pub mod health;

pub use health::HealthService;
