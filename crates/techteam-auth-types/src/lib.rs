//! Auth types shared across TechTeam crates.
//!
//! Provides the session cookie builders, the raw session-token extractor and
//! the `AuthContext` value that carries the caller's identity into usecases.

pub mod client;
pub mod context;
pub mod cookie;
pub mod token;
