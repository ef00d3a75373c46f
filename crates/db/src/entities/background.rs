//! Announcement background entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Background styling for an announcement (at most one per announcement).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "background")]
pub struct Model {
    /// Unique background ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning announcement.
    #[sea_orm(indexed, unique)]
    pub announcement_id: i64,

    /// Background kind: `solid`, `gradient`, or `image`.
    pub kind: String,

    /// Primary color (CSS color).
    pub color1: String,

    /// Secondary color; required when `kind = gradient`.
    #[sea_orm(nullable)]
    pub color2: Option<String>,

    /// Image URL; required when `kind = image`.
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Vertical padding in px.
    #[sea_orm(nullable)]
    pub padding: Option<i32>,
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
