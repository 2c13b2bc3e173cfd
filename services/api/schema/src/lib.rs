//! sea-orm entities for the TechTeam API database.

pub mod achievements;
pub mod certifications;
pub mod challenge_completions;
pub mod challenges;
pub mod resources;
pub mod schools;
pub mod sessions;
pub mod ticket_notes;
pub mod tickets;
pub mod user_achievements;
pub mod user_certifications;
pub mod users;
pub mod work_logs;
