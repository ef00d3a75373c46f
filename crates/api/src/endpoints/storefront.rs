//! Storefront read path.
//!
//! `GET /storefront/banners` serves the shop's published distribution
//! document, the same flat structure the edge cache holds. `GET
//! /storefront/active` bypasses the cache and reads the live eligible set
//! from the database, optionally narrowed to one page path.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use bannerline_common::AppResult;
use bannerline_core::grouping::GroupedDistribution;
use bannerline_core::record::AnnouncementRecord;
use chrono::Utc;
use serde::Deserialize;

use crate::{extractors::ShopDomain, middleware::AppState, response::ApiResponse};

/// Create storefront router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/banners", get(published_banners))
        .route("/active", get(active_banners))
}

/// Storefront query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontQuery {
    pub path: Option<String>,
}

/// The published distribution document for a shop.
///
/// A shop that has never published resolves to the empty structure, so
/// storefront clients always get the same shape.
async fn published_banners(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<GroupedDistribution>> {
    let distribution = state
        .announcement_service
        .published(&shop)
        .await?
        .unwrap_or_else(GroupedDistribution::empty);

    Ok(ApiResponse::ok(distribution))
}

/// Live eligible announcements straight from the database.
async fn active_banners(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Query(query): Query<StorefrontQuery>,
) -> AppResult<ApiResponse<Vec<AnnouncementRecord>>> {
    let records = state
        .announcement_service
        .active_for_shop(&shop, query.path.as_deref(), Utc::now())
        .await?;

    Ok(ApiResponse::ok(records))
}
