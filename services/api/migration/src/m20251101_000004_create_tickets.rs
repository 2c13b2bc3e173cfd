use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tickets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tickets::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::AssignedTo).uuid())
                    .col(ColumnDef::new(Tickets::StudentName).string().not_null())
                    .col(ColumnDef::new(Tickets::StudentGrade).string_len(20))
                    .col(ColumnDef::new(Tickets::DeviceType).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::DeviceNumber).string_len(50))
                    .col(ColumnDef::new(Tickets::IssueType).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::IssueDescription).text().not_null())
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Tickets::Priority).string_len(20))
                    // Device-check columns; null on repairs.
                    .col(ColumnDef::new(Tickets::Teacher).string())
                    .col(ColumnDef::new(Tickets::RoomNumber).string_len(50))
                    .col(ColumnDef::new(Tickets::AllPresent).boolean())
                    .col(ColumnDef::new(Tickets::MissingStudents).json())
                    .col(ColumnDef::new(Tickets::AllCharged).boolean())
                    .col(ColumnDef::new(Tickets::NotChargedStudents).json())
                    .col(ColumnDef::new(Tickets::AnyMissing).boolean())
                    .col(ColumnDef::new(Tickets::MissingDeviceStudents).json())
                    .col(ColumnDef::new(Tickets::AnyBroken).boolean())
                    .col(ColumnDef::new(Tickets::BrokenAssetTag).string_len(100))
                    .col(ColumnDef::new(Tickets::LteWorking).boolean())
                    .col(ColumnDef::new(Tickets::LteBrokenAssetTag).string_len(100))
                    .col(
                        ColumnDef::new(Tickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tickets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tickets::Table, Tickets::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tickets::Table, Tickets::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tickets {
    Table,
    Id,
    SchoolId,
    AssignedTo,
    StudentName,
    StudentGrade,
    DeviceType,
    DeviceNumber,
    IssueType,
    IssueDescription,
    Status,
    Priority,
    Teacher,
    RoomNumber,
    AllPresent,
    MissingStudents,
    AllCharged,
    NotChargedStudents,
    AnyMissing,
    MissingDeviceStudents,
    AnyBroken,
    BrokenAssetTag,
    LteWorking,
    LteBrokenAssetTag,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Schools {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
