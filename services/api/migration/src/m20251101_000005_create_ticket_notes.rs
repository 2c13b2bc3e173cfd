use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TicketNotes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TicketNotes::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(TicketNotes::TicketId).uuid().not_null())
                    .col(ColumnDef::new(TicketNotes::UserId).uuid().not_null())
                    .col(ColumnDef::new(TicketNotes::NoteText).text().not_null())
                    .col(
                        ColumnDef::new(TicketNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TicketNotes::Table, TicketNotes::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TicketNotes::Table, TicketNotes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketNotes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TicketNotes {
    Table,
    Id,
    SchoolId,
    TicketId,
    UserId,
    NoteText,
    CreatedAt,
}

#[derive(Iden)]
enum Tickets {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
