//! Call-to-action entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Call-to-action attached to a text block (button or link).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "call_to_action")]
pub struct Model {
    /// Unique CTA ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Owning text block.
    #[sea_orm(indexed)]
    pub text_id: i64,

    /// CTA kind: `button` or `link`.
    pub kind: String,

    /// Visible label.
    pub label: String,

    /// Target URL.
    pub url: String,

    /// Label color (CSS color).
    #[sea_orm(nullable)]
    pub text_color: Option<String>,

    /// Button background color (CSS color).
    #[sea_orm(nullable)]
    pub background_color: Option<String>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::announcement_text::Entity",
        from = "Column::TextId",
        to = "super::announcement_text::Column::Id",
        on_delete = "Cascade"
    )]
    Text,
}

impl Related<super::announcement_text::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Text.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
