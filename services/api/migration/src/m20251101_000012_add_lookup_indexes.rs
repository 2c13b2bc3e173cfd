use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, column) for every single-column lookup index.
const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_users_school_id", "users", "school_id"),
    ("idx_users_role", "users", "role"),
    ("idx_tickets_school_id", "tickets", "school_id"),
    ("idx_tickets_status", "tickets", "status"),
    ("idx_tickets_created_at", "tickets", "created_at"),
    ("idx_tickets_assigned_to", "tickets", "assigned_to"),
    ("idx_ticket_notes_ticket_id", "ticket_notes", "ticket_id"),
    ("idx_challenge_completions_user_id", "challenge_completions", "user_id"),
    ("idx_work_logs_user_id", "work_logs", "user_id"),
    ("idx_work_logs_school_id", "work_logs", "school_id"),
    ("idx_user_achievements_user_id", "user_achievements", "user_id"),
    ("idx_user_certifications_user_id", "user_certifications", "user_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .table(Alias::new(*table))
                        .col(Alias::new(*column))
                        .name(*name)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table(Alias::new(*table))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
