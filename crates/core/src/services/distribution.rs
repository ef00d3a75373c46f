//! Edge cache distribution store.
//!
//! The grouped distribution for each shop is written to a Redis-backed edge
//! cache as a single JSON document. Publishing is a full replace of the
//! shop's document, so re-publishing the same state is a no-op for readers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use tracing::{debug, info};

use bannerline_common::{AppError, AppResult};

use crate::grouping::GroupedDistribution;

/// Store holding one published distribution document per shop.
#[async_trait]
pub trait DistributionStore: Send + Sync {
    /// Replace the shop's published document. Idempotent.
    async fn publish(&self, shop: &str, distribution: &GroupedDistribution) -> AppResult<()>;

    /// Fetch the shop's published document, if any.
    async fn fetch(&self, shop: &str) -> AppResult<Option<GroupedDistribution>>;

    /// Delete the shop's published document.
    async fn remove(&self, shop: &str) -> AppResult<()>;
}

/// Redis-backed distribution store.
#[derive(Clone)]
pub struct RedisDistributionStore {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisDistributionStore {
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }

    /// Generate the cache key for a shop's distribution document.
    fn cache_key(&self, shop: &str) -> String {
        format!("{}:distribution:{shop}", self.prefix)
    }
}

#[async_trait]
impl DistributionStore for RedisDistributionStore {
    async fn publish(&self, shop: &str, distribution: &GroupedDistribution) -> AppResult<()> {
        let key = self.cache_key(shop);
        let json_str = serde_json::to_string(distribution)
            .map_err(|e| AppError::Internal(format!("Failed to serialize distribution: {e}")))?;

        // No expiration: the document lives until the next publish or an
        // explicit remove.
        self.redis
            .set::<(), _, _>(key, json_str, None, None, false)
            .await
            .map_err(|e| AppError::PublishFailed(e.to_string()))?;

        info!(
            shop = %shop,
            global = distribution.global.len(),
            patterns = distribution.buckets.len(),
            "Published distribution"
        );

        Ok(())
    }

    async fn fetch(&self, shop: &str) -> AppResult<Option<GroupedDistribution>> {
        let key = self.cache_key(shop);

        let result: Option<String> = self
            .redis
            .get(key)
            .await
            .map_err(|e| AppError::PublishFailed(e.to_string()))?;

        if let Some(json_str) = result {
            let distribution: GroupedDistribution = serde_json::from_str(&json_str)
                .map_err(|e| AppError::Internal(format!("Corrupt distribution document: {e}")))?;

            debug!(shop = %shop, "Cache hit for distribution");
            Ok(Some(distribution))
        } else {
            debug!(shop = %shop, "Cache miss for distribution");
            Ok(None)
        }
    }

    async fn remove(&self, shop: &str) -> AppResult<()> {
        let key = self.cache_key(shop);

        self.redis
            .del::<(), _>(key)
            .await
            .map_err(|e| AppError::PublishFailed(e.to_string()))?;

        info!(shop = %shop, "Removed distribution");

        Ok(())
    }
}

/// In-memory distribution store for tests and local development.
#[derive(Default)]
pub struct MemoryDistributionStore {
    documents: Mutex<HashMap<String, GroupedDistribution>>,
}

impl MemoryDistributionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shops with a published document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DistributionStore for MemoryDistributionStore {
    async fn publish(&self, shop: &str, distribution: &GroupedDistribution) -> AppResult<()> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shop.to_string(), distribution.clone());
        Ok(())
    }

    async fn fetch(&self, shop: &str) -> AppResult<Option<GroupedDistribution>> {
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shop)
            .cloned())
    }

    async fn remove(&self, shop: &str) -> AppResult<()> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(shop);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_includes_prefix_and_shop() {
        let store = RedisDistributionStore {
            redis: Arc::new(RedisClient::default()),
            prefix: "bannerline".to_string(),
        };
        assert_eq!(
            store.cache_key("shop.example.com"),
            "bannerline:distribution:shop.example.com"
        );
    }

    #[tokio::test]
    async fn memory_store_round_trips_and_removes() {
        let store = MemoryDistributionStore::new();
        let shop = "shop.example.com";

        assert!(store.fetch(shop).await.unwrap().is_none());

        let distribution = GroupedDistribution::empty();
        store.publish(shop, &distribution).await.unwrap();
        assert_eq!(store.fetch(shop).await.unwrap(), Some(distribution));
        assert_eq!(store.len(), 1);

        store.remove(shop).await.unwrap();
        assert!(store.fetch(shop).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn publish_replaces_previous_document() {
        let store = MemoryDistributionStore::new();
        let shop = "shop.example.com";

        store
            .publish(shop, &GroupedDistribution::empty())
            .await
            .unwrap();
        store
            .publish(shop, &GroupedDistribution::empty())
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
    }
}
