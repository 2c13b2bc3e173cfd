use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WorkLogs::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(WorkLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(WorkLogs::LogDate).date().not_null())
                    // Minutes, despite the column name.
                    .col(ColumnDef::new(WorkLogs::HoursWorked).integer().not_null())
                    .col(ColumnDef::new(WorkLogs::Category).string_len(100))
                    .col(ColumnDef::new(WorkLogs::Description).text().not_null())
                    .col(
                        ColumnDef::new(WorkLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WorkLogs::Table, WorkLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum WorkLogs {
    Table,
    Id,
    SchoolId,
    UserId,
    LogDate,
    HoursWorked,
    Category,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
