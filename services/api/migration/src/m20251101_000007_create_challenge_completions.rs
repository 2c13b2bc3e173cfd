use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChallengeCompletions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChallengeCompletions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ChallengeCompletions::SchoolId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeCompletions::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeCompletions::ChallengeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeCompletions::CompletedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChallengeCompletions::PointsEarned)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChallengeCompletions::Table, ChallengeCompletions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ChallengeCompletions::Table,
                                ChallengeCompletions::ChallengeId,
                            )
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One completion per student per challenge.
        manager
            .create_index(
                Index::create()
                    .table(ChallengeCompletions::Table)
                    .col(ChallengeCompletions::UserId)
                    .col(ChallengeCompletions::ChallengeId)
                    .col(ChallengeCompletions::SchoolId)
                    .name("uq_challenge_completions_user_challenge_school")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChallengeCompletions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChallengeCompletions {
    Table,
    Id,
    SchoolId,
    UserId,
    ChallengeId,
    CompletedAt,
    PointsEarned,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Challenges {
    Table,
    Id,
}
