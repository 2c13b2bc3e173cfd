use sea_orm::entity::prelude::*;

/// Time a student spent on tech-team work. `minutes_worked` is stored in the
/// `hours_worked` column, which has always held minutes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub log_date: chrono::NaiveDate,
    #[sea_orm(column_name = "hours_worked")]
    pub minutes_worked: i32,
    pub category: Option<String>,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
