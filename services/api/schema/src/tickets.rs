use sea_orm::entity::prelude::*;

/// Device check or repair record.
///
/// One flat table serves both forms; `issue_type` is the discriminator and the
/// check columns (`teacher` through `lte_broken_asset_tag`) are null on
/// repairs. The three student lists are JSON arrays of names.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub school_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub student_name: String,
    pub student_grade: Option<String>,
    pub device_type: String,
    pub device_number: Option<String>,
    pub issue_type: String,
    pub issue_description: String,
    pub status: String,
    pub priority: Option<String>,
    pub teacher: Option<String>,
    pub room_number: Option<String>,
    pub all_present: Option<bool>,
    pub missing_students: Option<Json>,
    pub all_charged: Option<bool>,
    pub not_charged_students: Option<Json>,
    pub any_missing: Option<bool>,
    pub missing_device_students: Option<Json>,
    pub any_broken: Option<bool>,
    pub broken_asset_tag: Option<String>,
    pub lte_working: Option<bool>,
    pub lte_broken_asset_tag: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
    #[sea_orm(has_many = "super::ticket_notes::Entity")]
    TicketNotes,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::ticket_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
