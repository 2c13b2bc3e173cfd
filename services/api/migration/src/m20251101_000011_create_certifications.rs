use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Certifications::Name).string().not_null())
                    .col(ColumnDef::new(Certifications::Description).text())
                    .col(
                        ColumnDef::new(Certifications::TotalSteps)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCertifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserCertifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserCertifications::SchoolId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserCertifications::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserCertifications::CertificationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCertifications::Status)
                            .string_len(20)
                            .not_null()
                            .default("not_started"),
                    )
                    .col(
                        ColumnDef::new(UserCertifications::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserCertifications::EarnedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCertifications::Table, UserCertifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                UserCertifications::Table,
                                UserCertifications::CertificationId,
                            )
                            .to(Certifications::Table, Certifications::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCertifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Certifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Certifications {
    Table,
    Id,
    Name,
    Description,
    TotalSteps,
}

#[derive(Iden)]
enum UserCertifications {
    Table,
    Id,
    SchoolId,
    UserId,
    CertificationId,
    Status,
    Progress,
    EarnedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
