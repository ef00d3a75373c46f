//! Page pattern entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A page-matching rule. The reserved value `__global` means "all pages";
/// any other value is treated as a regular expression over the storefront
/// path. Rows are shared across announcements and deduplicated by string.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_pattern")]
pub struct Model {
    /// Unique pattern ID.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// The pattern string.
    #[sea_orm(unique)]
    pub pattern: String,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::announcement_page_pattern::Entity")]
    Links,
}

impl Related<super::announcement_page_pattern::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
