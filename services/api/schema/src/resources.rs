use sea_orm::entity::prelude::*;

/// Global learning resource (article, video, ...).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content_type: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub views: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
