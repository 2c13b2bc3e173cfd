use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Challenges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Challenges::Title).string().not_null())
                    .col(ColumnDef::new(Challenges::Description).text())
                    .col(
                        ColumnDef::new(Challenges::Difficulty)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Challenges::Points).integer().not_null())
                    .col(
                        ColumnDef::new(Challenges::Category)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Challenges::DaysToComplete).integer())
                    .col(
                        ColumnDef::new(Challenges::Participants)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Challenges::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Challenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Challenges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Challenges {
    Table,
    Id,
    Title,
    Description,
    Difficulty,
    Points,
    Category,
    DaysToComplete,
    Participants,
    IsActive,
    CreatedAt,
}
