//! Announcement text block entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One text block of an announcement. Multi-text banners rotate through
/// several of these; basic banners have exactly one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement_text")]
pub struct Model {
    /// Unique text block ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning announcement.
    #[sea_orm(indexed)]
    pub announcement_id: i64,

    /// Text content shown in the banner.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Text color (CSS color).
    pub text_color: String,

    /// Font size in px.
    pub font_size: i32,

    /// Font family, or `custom` for a merchant-supplied font.
    #[sea_orm(nullable)]
    pub font_family: Option<String>,

    /// Font file URL; required when `font_family = custom`.
    #[sea_orm(nullable)]
    pub custom_font_url: Option<String>,
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
    #[sea_orm(has_many = "super::call_to_action::Entity")]
    Ctas,
}

impl Related<super::announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcement.def()
    }
}

impl Related<super::call_to_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ctas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
