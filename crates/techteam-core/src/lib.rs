//! Shared plumbing for TechTeam services: health probes, request ids,
//! tracing setup, env config loading and small serde / sea-orm helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
