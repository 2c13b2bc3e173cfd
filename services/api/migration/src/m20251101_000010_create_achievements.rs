use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Achievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Achievements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Achievements::Name).string().not_null())
                    .col(ColumnDef::new(Achievements::Description).text())
                    .col(ColumnDef::new(Achievements::Icon).string_len(20).not_null())
                    .col(ColumnDef::new(Achievements::PointsRequired).integer())
                    .col(ColumnDef::new(Achievements::Category).string_len(100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserAchievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAchievements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAchievements::SchoolId).uuid().not_null())
                    .col(ColumnDef::new(UserAchievements::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserAchievements::AchievementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserAchievements::EarnedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserAchievements::Table, UserAchievements::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserAchievements::Table, UserAchievements::AchievementId)
                            .to(Achievements::Table, Achievements::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserAchievements::Table)
                    .col(UserAchievements::UserId)
                    .col(UserAchievements::AchievementId)
                    .col(UserAchievements::SchoolId)
                    .name("uq_user_achievements_user_achievement_school")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAchievements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Achievements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Achievements {
    Table,
    Id,
    Name,
    Description,
    Icon,
    PointsRequired,
    Category,
}

#[derive(Iden)]
enum UserAchievements {
    Table,
    Id,
    SchoolId,
    UserId,
    AchievementId,
    EarnedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
