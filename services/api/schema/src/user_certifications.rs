use sea_orm::entity::prelude::*;

/// A student's progress through a certification. `progress` is a percentage.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_certifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub certification_id: Uuid,
    pub status: String,
    pub progress: i32,
    pub earned_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::certifications::Entity",
        from = "Column::CertificationId",
        to = "super::certifications::Column::Id"
    )]
    Certification,
}

impl Related<super::certifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Certification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
