//! HTTP API layer for bannerline.
//!
//! This crate provides the admin REST API and the storefront read path:
//!
//! - **Endpoints**: announcement management and the published distribution
//! - **Extractors**: shop tenancy from header or query string
//! - **Response**: the standard success/error envelope
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
