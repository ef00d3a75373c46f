//! Email signup form entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email capture form for `email_signup` announcements.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "signup_form")]
pub struct Model {
    /// Unique form ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning announcement.
    #[sea_orm(indexed)]
    pub announcement_id: i64,

    /// Input placeholder text.
    pub placeholder: String,

    /// Submit button label.
    pub button_label: String,

    /// Where captured addresses are forwarded.
    #[sea_orm(nullable)]
    pub destination_email: Option<String>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::announcement::Entity",
        from = "Column::AnnouncementId",
        to = "super::announcement::Column::Id",
        on_delete = "Cascade"
    )]
    Announcement,
}

impl Related<super::announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
