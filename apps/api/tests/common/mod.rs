//! Common test utilities for API integration tests
//!
//! Shared fixtures for the pipeline and router tests: an in-memory store,
//! mock upstream wiring, and request helpers.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;
pub mod store;

pub use fixtures::*;
pub use helpers::*;
pub use store::InMemoryStore;
