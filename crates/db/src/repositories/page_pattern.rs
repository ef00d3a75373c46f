//! Page pattern repository.

use std::sync::Arc;

use bannerline_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use crate::entities::{PagePattern, page_pattern};

/// Look up a pattern row by string, creating it if absent.
///
/// Patterns are shared across announcements, so writes always go through
/// this instead of inserting blindly. Generic over the connection so it can
/// run inside a write transaction.
pub async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    pattern: &str,
) -> AppResult<page_pattern::Model> {
    let existing = PagePattern::find()
        .filter(page_pattern::Column::Pattern.eq(pattern))
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if let Some(model) = existing {
        return Ok(model);
    }

    let active_model = page_pattern::ActiveModel {
        pattern: Set(pattern.to_string()),
        ..Default::default()
    };

    active_model
        .insert(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Repository for page pattern operations.
#[derive(Clone)]
pub struct PagePatternRepository {
    db: Arc<DatabaseConnection>,
}

impl PagePatternRepository {
    /// Create a new page pattern repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pattern by its string.
    pub async fn find_by_pattern(&self, pattern: &str) -> AppResult<Option<page_pattern::Model>> {
        PagePattern::find()
            .filter(page_pattern::Column::Pattern.eq(pattern))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a pattern by string, creating it if absent.
    pub async fn find_or_create(&self, pattern: &str) -> AppResult<page_pattern::Model> {
        find_or_create(self.db.as_ref(), pattern).await
    }

    /// List all known patterns.
    pub async fn list_all(&self) -> AppResult<Vec<page_pattern::Model>> {
        PagePattern::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_or_create_returns_existing() {
        let existing = page_pattern::Model {
            id: 7,
            pattern: "products/*".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );

        let repo = PagePatternRepository::new(db);
        let found = repo.find_or_create("products/*").await.unwrap();

        assert_eq!(found.id, 7);
        assert_eq!(found.pattern, "products/*");
    }

    #[tokio::test]
    async fn test_find_by_pattern_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<page_pattern::Model>::new()])
                .into_connection(),
        );

        let repo = PagePatternRepository::new(db);
        let found = repo.find_by_pattern("cart").await.unwrap();

        assert!(found.is_none());
    }
}
