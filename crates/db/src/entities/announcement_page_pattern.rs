//! Announcement to page pattern link entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// N:M link between announcements and page patterns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement_page_pattern")]
pub struct Model {
    /// Unique link ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Linked announcement.
    #[sea_orm(indexed)]
    pub announcement_id: i64,

    /// Linked pattern.
    #[sea_orm(indexed)]
    pub pattern_id: i64,
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
    #[sea_orm(
        belongs_to = "super::page_pattern::Entity",
        from = "Column::PatternId",
        to = "super::page_pattern::Column::Id",
        on_delete = "Cascade"
    )]
    Pattern,
}

impl Related<super::announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcement.def()
    }
}

impl Related<super::page_pattern::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pattern.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
