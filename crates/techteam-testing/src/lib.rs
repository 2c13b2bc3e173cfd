//! Test utilities for TechTeam services.
//!
//! Import from `[dev-dependencies]` only, never in production code.

pub mod auth;
pub mod fixture;
