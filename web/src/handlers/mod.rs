//! Handlers shared by every Voyage service.

pub mod health;

pub use health::{health_check, readiness_check};
