use sea_orm_migration::prelude::*;

mod m20251101_000001_create_schools;
mod m20251101_000002_create_users;
mod m20251101_000003_create_sessions;
mod m20251101_000004_create_tickets;
mod m20251101_000005_create_ticket_notes;
mod m20251101_000006_create_challenges;
mod m20251101_000007_create_challenge_completions;
mod m20251101_000008_create_work_logs;
mod m20251101_000009_create_resources;
mod m20251101_000010_create_achievements;
mod m20251101_000011_create_certifications;
mod m20251101_000012_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_schools::Migration),
            Box::new(m20251101_000002_create_users::Migration),
            Box::new(m20251101_000003_create_sessions::Migration),
            Box::new(m20251101_000004_create_tickets::Migration),
            Box::new(m20251101_000005_create_ticket_notes::Migration),
            Box::new(m20251101_000006_create_challenges::Migration),
            Box::new(m20251101_000007_create_challenge_completions::Migration),
            Box::new(m20251101_000008_create_work_logs::Migration),
            Box::new(m20251101_000009_create_resources::Migration),
            Box::new(m20251101_000010_create_achievements::Migration),
            Box::new(m20251101_000011_create_certifications::Migration),
            Box::new(m20251101_000012_add_lookup_indexes::Migration),
        ]
    }
}
