//! Request extractors.

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;

/// Shop tenancy extractor.
///
/// Reads the shop domain from the `X-Shop-Domain` header, falling back to
/// the `shop` query parameter. Every admin and storefront route is scoped to
/// exactly one shop.
#[derive(Debug, Clone)]
pub struct ShopDomain(pub String);

#[derive(Deserialize)]
struct ShopQuery {
    shop: Option<String>,
}

impl<S> FromRequestParts<S> for ShopDomain
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get("x-shop-domain") {
            if let Ok(shop) = value.to_str() {
                let shop = shop.trim();
                if !shop.is_empty() {
                    return Ok(Self(shop.to_string()));
                }
            }
        }

        if let Ok(Query(query)) = Query::<ShopQuery>::from_request_parts(parts, state).await {
            if let Some(shop) = query.shop.map(|s| s.trim().to_string()) {
                if !shop.is_empty() {
                    return Ok(Self(shop));
                }
            }
        }

        Err((StatusCode::BAD_REQUEST, "Missing shop domain"))
    }
}
