//! API middleware and shared state.

use bannerline_core::AnnouncementService;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub announcement_service: AnnouncementService,
}
