use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resources::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resources::Title).string().not_null())
                    .col(ColumnDef::new(Resources::Category).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Resources::ContentType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Resources::Url).text())
                    .col(ColumnDef::new(Resources::Description).text())
                    .col(ColumnDef::new(Resources::ThumbnailUrl).text())
                    .col(ColumnDef::new(Resources::Duration).string_len(50))
                    .col(
                        ColumnDef::new(Resources::Views)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Resources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Resources {
    Table,
    Id,
    Title,
    Category,
    ContentType,
    Url,
    Description,
    ThumbnailUrl,
    Duration,
    Views,
    CreatedAt,
}
