//! Core business logic for bannerline.
//!
//! The targeting and distribution engine lives here:
//!
//! - [`eligibility`]: pure predicates deciding which announcements are
//!   currently live and whether they match a storefront path
//! - [`grouping`]: the transformer that buckets eligible announcements by
//!   page pattern into a [`grouping::GroupedDistribution`]
//! - [`record`]: the published wire shape
//! - [`services`]: the distribution publisher and the orchestration service

pub mod eligibility;
pub mod grouping;
pub mod record;
pub mod services;

pub use services::*;
