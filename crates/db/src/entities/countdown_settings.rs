//! Countdown settings entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Countdown timer configuration for `countdown` announcements
/// (at most one per announcement).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "countdown_settings")]
pub struct Model {
    /// Unique settings ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning announcement.
    #[sea_orm(indexed, unique)]
    pub announcement_id: i64,

    /// Timer kind: `to_date` counts down to `ends_at`, `duration` counts
    /// down a fixed span from first view.
    pub timer_kind: String,

    /// Countdown target; required when `timer_kind = to_date`.
    #[sea_orm(nullable)]
    pub ends_at: Option<DateTime<Utc>>,

    /// Duration days component.
    pub duration_days: i32,

    /// Duration hours component.
    pub duration_hours: i32,

    /// Duration minutes component.
    pub duration_minutes: i32,

    /// Duration seconds component.
    pub duration_seconds: i32,

    /// What happens when the timer hits zero: `hide`, `show_zeros`, or
    /// `show_child` (requires `child_announcement_id` on the parent).
    pub after_end: String,
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
