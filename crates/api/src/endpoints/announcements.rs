//! Announcement management endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use bannerline_common::AppResult;
use bannerline_core::grouping::GroupedDistribution;
use bannerline_core::record::AnnouncementRecord;
use bannerline_core::{AnnouncementListPage, BulkOutcome, CreateAnnouncementInput};
use serde::Deserialize;
use tracing::info;

use crate::{extractors::ShopDomain, middleware::AppState, response::ApiResponse};

/// Create announcement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements))
        .route("/", post(create_announcement))
        .route("/bulk", post(bulk_operation))
        .route("/resync", post(resync))
        .route("/{id}", get(get_announcement))
        .route("/{id}", put(update_announcement))
        .route("/{id}", delete(delete_announcement))
        .route("/{id}/toggle", post(toggle_announcement))
}

/// Admin listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_tab")]
    pub tab: String,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_tab() -> String {
    "all".to_string()
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    20
}

/// List announcements for a shop.
///
/// The page already carries its own `data`/`totalPages`/`currentPage` keys,
/// so it goes out as the body itself rather than inside the envelope.
async fn list_announcements(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AnnouncementListPage>> {
    let page = state
        .announcement_service
        .list(
            &shop,
            &query.tab,
            query.search.as_deref(),
            query.sort.as_deref(),
            query.page,
            query.page_size,
        )
        .await?;

    Ok(Json(page))
}

/// Get a single announcement.
async fn get_announcement(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<AnnouncementRecord>> {
    let record = state.announcement_service.get(&shop, id).await?;
    Ok(ApiResponse::ok(record))
}

/// Create an announcement.
async fn create_announcement(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementRecord>> {
    info!(shop = %shop, title = %input.title, "Creating announcement");

    let record = state.announcement_service.create(&shop, input).await?;
    Ok(ApiResponse::ok(record))
}

/// Update an announcement, replacing its whole child set.
async fn update_announcement(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<ApiResponse<AnnouncementRecord>> {
    info!(shop = %shop, announcement_id = id, "Updating announcement");

    let record = state.announcement_service.update(&shop, id, input).await?;
    Ok(ApiResponse::ok(record))
}

/// Delete an announcement.
async fn delete_announcement(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<()>> {
    info!(shop = %shop, announcement_id = id, "Deleting announcement");

    state.announcement_service.delete(&shop, id).await?;
    Ok(ApiResponse::ok(()))
}

/// Bulk operation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub action: String,
    pub ids: Vec<i64>,
}

/// Run a bulk operation over announcement ids.
async fn bulk_operation(
    State(state): State<AppState>,
    Json(req): Json<BulkRequest>,
) -> AppResult<ApiResponse<BulkOutcome>> {
    info!(action = %req.action, count = req.ids.len(), "Running bulk operation");

    let outcome = state.announcement_service.bulk(&req.action, &req.ids).await?;
    Ok(ApiResponse::ok(outcome))
}

/// Toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub is_active: bool,
}

/// Flip the active toggle on an announcement.
async fn toggle_announcement(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<AnnouncementRecord>> {
    info!(shop = %shop, announcement_id = id, is_active = req.is_active, "Toggling announcement");

    let record = state
        .announcement_service
        .toggle_active(&shop, id, req.is_active)
        .await?;
    Ok(ApiResponse::ok(record))
}

/// Rebuild and republish the shop's distribution.
async fn resync(
    ShopDomain(shop): ShopDomain,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<GroupedDistribution>> {
    info!(shop = %shop, "Resyncing distribution");

    let distribution = state.announcement_service.resync(&shop).await?;
    Ok(ApiResponse::ok(distribution))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.tab, "all");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert!(query.search.is_none());
        assert!(query.sort.is_none());
    }

    #[test]
    fn bulk_request_uses_camel_case() {
        let req: BulkRequest =
            serde_json::from_str("{\"action\":\"bulk_delete\",\"ids\":[1,2]}").unwrap();
        assert_eq!(req.action, "bulk_delete");
        assert_eq!(req.ids, vec![1, 2]);
    }

    #[test]
    fn toggle_request_uses_camel_case() {
        let req: ToggleRequest = serde_json::from_str("{\"isActive\":false}").unwrap();
        assert!(!req.is_active);
    }

    #[test]
    fn listing_body_keeps_pagination_fields_at_top_level() {
        let page = AnnouncementListPage {
            data: vec![],
            total_pages: 3,
            current_page: 1,
        };
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["currentPage"], 1);
        assert!(value["data"].as_array().unwrap().is_empty());
        // Not nested inside an envelope's data field
        assert!(value["data"].get("totalPages").is_none());
    }
}
