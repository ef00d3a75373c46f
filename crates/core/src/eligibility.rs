//! Eligibility filtering.
//!
//! Pure predicate layer: given "now" and an optional storefront path, decide
//! which announcements are currently live and whether they target a path.
//! Merchant-entered patterns are untrusted regular expressions, so compiled
//! patterns are cached per process keyed by the raw string, and a pattern
//! that fails to compile contributes no match instead of raising.

use std::collections::HashMap;
use std::sync::RwLock;

use bannerline_db::entities::announcement;
use bannerline_db::repositories::announcement::STATUS_PUBLISHED;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Reserved pattern meaning "all pages".
pub const GLOBAL_PATTERN: &str = "__global";

/// Per-process compiled pattern cache keyed by the raw pattern string.
/// `None` marks a pattern that failed to compile, so bad patterns are not
/// recompiled on every match call.
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A parsed page pattern: the exact `__global` sentinel or a compiled
/// regular expression over the storefront path.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Matches every page.
    Global,
    /// Matches pages whose path matches the regex.
    Regex(Regex),
}

impl PathPattern {
    /// Parse a raw pattern string.
    ///
    /// Returns `None` when the pattern is neither `__global` nor a valid
    /// regular expression; the failure is logged, never raised.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == GLOBAL_PATTERN {
            return Some(Self::Global);
        }
        cached_regex(raw).map(Self::Regex)
    }

    /// Whether this pattern matches a storefront path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Regex(re) => re.is_match(path),
        }
    }
}

/// Whether an announcement is currently eligible for display.
///
/// Eligible iff `status == published && is_active && start_date <= now <=
/// end_date`.
#[must_use]
pub fn is_eligible(a: &announcement::Model, now: DateTime<Utc>) -> bool {
    a.status == STATUS_PUBLISHED && a.is_active && a.start_date <= now && a.end_date >= now
}

/// Whether a pattern set targets a storefront path.
///
/// True if the set contains `__global`, or any pattern compiles as a regex
/// and matches the path. An invalid regex contributes no match.
#[must_use]
pub fn matches_path(patterns: &[String], path: &str) -> bool {
    if patterns.iter().any(|p| p == GLOBAL_PATTERN) {
        return true;
    }

    patterns
        .iter()
        .filter_map(|p| PathPattern::parse(p))
        .any(|p| p.matches(path))
}

/// Compile a pattern through the per-process cache.
fn cached_regex(raw: &str) -> Option<Regex> {
    let cache = PATTERN_CACHE
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(entry) = cache.get(raw) {
        return entry.clone();
    }
    drop(cache);

    let entry = match Regex::new(raw) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern = %raw, error = %e, "page pattern failed to compile as a regex");
            None
        }
    };

    PATTERN_CACHE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .insert(raw.to_string(), entry.clone());

    entry
}
