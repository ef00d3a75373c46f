//! Announcement entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Announcement banner model. One row per configured banner for a shop.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    /// Unique announcement ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Shop domain (tenant key).
    #[sea_orm(indexed)]
    pub shop: String,

    /// Title of the announcement (admin-facing).
    pub title: String,

    /// Banner kind: `basic`, `countdown`, `email_signup`, or `multi_text`.
    pub kind: String,

    /// Lifecycle status: `draft`, `published`, `paused`, or `ended`.
    pub status: String,

    /// Independent on/off toggle; a published announcement with
    /// `is_active = false` is never shown.
    pub is_active: bool,

    /// How the start is chosen: `now` or `specific`.
    pub start_type: String,

    /// How the end is chosen: `until_stop` or `specific`.
    pub end_type: String,

    /// When the announcement starts showing.
    pub start_date: DateTime<Utc>,

    /// When the announcement stops showing.
    pub end_date: DateTime<Utc>,

    /// IANA timezone the merchant configured the dates in.
    pub timezone: String,

    /// Size class: `small`, `medium`, `large`, or `custom`.
    pub size: String,

    /// Banner height in px when `size = custom`.
    #[sea_orm(nullable)]
    pub custom_height: Option<i32>,

    /// Banner width in percent when `size = custom`.
    #[sea_orm(nullable)]
    pub custom_width: Option<i32>,

    /// Whether the close button is rendered.
    pub show_close_button: bool,

    /// Close button position: `left` or `right`.
    pub close_button_position: String,

    /// Close button color (CSS color).
    #[sea_orm(nullable)]
    pub close_button_color: Option<String>,

    /// Delay before the banner appears, in seconds.
    #[sea_orm(nullable)]
    pub show_after_delay_seconds: Option<i32>,

    /// Scroll depth (percent) before the banner appears.
    #[sea_orm(nullable)]
    pub show_after_scroll_percent: Option<i32>,

    /// Hours the banner stays hidden after the visitor closes it.
    #[sea_orm(nullable)]
    pub stay_closed_hours: Option<i32>,

    /// Follow-up announcement shown after a countdown ends.
    /// Must never form a reference cycle.
    #[sea_orm(nullable)]
    pub child_announcement_id: Option<i64>,

    /// When the announcement was created.
    pub created_at: DateTime<Utc>,

    /// When the announcement was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::announcement_text::Entity")]
    Texts,
    #[sea_orm(has_many = "super::background::Entity")]
    Backgrounds,
    #[sea_orm(has_many = "super::signup_form::Entity")]
    Forms,
    #[sea_orm(has_many = "super::countdown_settings::Entity")]
    Countdowns,
    #[sea_orm(has_many = "super::announcement_page_pattern::Entity")]
    PatternLinks,
}

impl Related<super::announcement_text::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Texts.def()
    }
}

impl Related<super::background::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Backgrounds.def()
    }
}

impl Related<super::signup_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forms.def()
    }
}

impl Related<super::countdown_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countdowns.def()
    }
}

impl Related<super::announcement_page_pattern::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PatternLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
