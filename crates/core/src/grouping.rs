//! Pattern-based grouping of eligible announcements.
//!
//! Announcements targeting `__global` land in the `global` bucket and in no
//! other; the rest are bucketed per sanitized pattern key. The serialized
//! shape is a single flat JSON object so the edge cache stores one document
//! per shop:
//!
//! ```json
//! {
//!   "global": [ ... ],
//!   "__patterns": ["cart", "products__sl__.__ast__"],
//!   "cart": [ ... ],
//!   "products__sl__.__ast__": [ ... ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::eligibility::GLOBAL_PATTERN;
use crate::record::AnnouncementRecord;

/// Key of the all-pages bucket in the serialized document.
pub const GLOBAL_KEY: &str = "global";
/// Key listing the pattern bucket names in the serialized document.
pub const PATTERNS_KEY: &str = "__patterns";

/// Replacement for `/` in pattern bucket keys.
pub const SLASH_TOKEN: &str = "__sl__";
/// Replacement for `*` in pattern bucket keys.
pub const WILDCARD_TOKEN: &str = "__ast__";

/// Turn a raw page pattern into a key safe to use in the flat document.
#[must_use]
pub fn sanitize_pattern(pattern: &str) -> String {
    pattern
        .replace('/', SLASH_TOKEN)
        .replace('*', WILDCARD_TOKEN)
}

/// Whether a sanitized pattern key would collide with a structural key of
/// the document. Such patterns are rejected at write time.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key == GLOBAL_KEY || key == PATTERNS_KEY
}

/// Eligible announcements for one shop, bucketed by target pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedDistribution {
    /// Announcements shown on every page.
    pub global: Vec<AnnouncementRecord>,
    /// Pattern buckets keyed by sanitized pattern.
    pub buckets: BTreeMap<String, Vec<AnnouncementRecord>>,
}

impl GroupedDistribution {
    /// The structure published when a shop has no eligible announcements.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorted pattern bucket keys, i.e. the value of `__patterns`.
    #[must_use]
    pub fn pattern_keys(&self) -> Vec<&str> {
        self.buckets.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.buckets.is_empty()
    }
}

impl Serialize for GroupedDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.buckets.len()))?;
        map.serialize_entry(GLOBAL_KEY, &self.global)?;
        map.serialize_entry(PATTERNS_KEY, &self.pattern_keys())?;
        for (key, records) in &self.buckets {
            map.serialize_entry(key, records)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GroupedDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = GroupedDistribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a grouped distribution object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut out = GroupedDistribution::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        GLOBAL_KEY => out.global = map.next_value()?,
                        // Redundant with the bucket keys themselves
                        PATTERNS_KEY => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                        _ => {
                            out.buckets.insert(key, map.next_value()?);
                        }
                    }
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Bucket eligible announcements by their target patterns.
///
/// An announcement with `__global` among its patterns goes into the global
/// bucket only. Others go into one bucket per distinct sanitized pattern,
/// deduplicated by id within each bucket. Records with an empty pattern set
/// are dropped.
#[must_use]
pub fn group(records: &[AnnouncementRecord]) -> GroupedDistribution {
    let mut out = GroupedDistribution::default();

    for record in records {
        if record.patterns.is_empty() {
            continue;
        }

        if record.patterns.iter().any(|p| p == GLOBAL_PATTERN) {
            if !out.global.iter().any(|r| r.id == record.id) {
                out.global.push(record.clone());
            }
            continue;
        }

        for pattern in &record.patterns {
            let key = sanitize_pattern(pattern);
            let bucket = out.buckets.entry(key).or_default();
            if !bucket.iter().any(|r| r.id == record.id) {
                bucket.push(record.clone());
            }
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_record(id: i64, patterns: &[&str]) -> AnnouncementRecord {
        AnnouncementRecord {
            id,
            kind: "basic".to_string(),
            title: format!("Announcement {id}"),
            status: "published".to_string(),
            is_active: true,
            start_type: "now".to_string(),
            start_date: Utc::now(),
            end_type: "until_stop".to_string(),
            end_date: Utc::now(),
            timezone: "UTC".to_string(),
            size: "medium".to_string(),
            custom_height: None,
            custom_width: None,
            show_close_button: true,
            close_button_position: "right".to_string(),
            close_button_color: None,
            show_after_delay_seconds: None,
            show_after_scroll_percent: None,
            stay_closed_hours: None,
            child_announcement_id: None,
            created_at: Utc::now(),
            updated_at: None,
            texts: vec![],
            background: None,
            form: None,
            countdown: None,
            child: None,
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn sanitize_replaces_slashes_and_wildcards() {
        assert_eq!(sanitize_pattern("products/.*"), "products__sl__.__ast__");
        assert_eq!(sanitize_pattern("cart"), "cart");
        assert_eq!(sanitize_pattern("a/b/c"), "a__sl__b__sl__c");
    }

    #[test]
    fn reserved_keys_are_flagged() {
        assert!(is_reserved_key("global"));
        assert!(is_reserved_key("__patterns"));
        assert!(!is_reserved_key("cart"));
        assert!(!is_reserved_key("__global"));
    }

    #[test]
    fn global_announcement_lands_only_in_global_bucket() {
        // A targets __global plus a specific pattern; the specific pattern
        // must not produce a bucket.
        let records = vec![test_record(1, &["__global", "cart"])];
        let grouped = group(&records);

        assert_eq!(grouped.global.len(), 1);
        assert!(grouped.buckets.is_empty());
        assert!(grouped.pattern_keys().is_empty());
    }

    #[test]
    fn distinct_announcements_share_a_pattern_bucket() {
        let records = vec![test_record(3, &["cart"]), test_record(4, &["cart"])];
        let grouped = group(&records);

        assert!(grouped.global.is_empty());
        assert_eq!(grouped.pattern_keys(), vec!["cart"]);
        let ids: Vec<i64> = grouped.buckets["cart"].iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn one_announcement_spans_multiple_buckets() {
        let records = vec![test_record(7, &["cart", "products/.*"])];
        let grouped = group(&records);

        assert_eq!(
            grouped.pattern_keys(),
            vec!["cart", "products__sl__.__ast__"]
        );
        assert_eq!(grouped.buckets["cart"][0].id, 7);
        assert_eq!(grouped.buckets["products__sl__.__ast__"][0].id, 7);
    }

    #[test]
    fn duplicate_patterns_dedup_within_bucket() {
        let records = vec![test_record(9, &["cart", "cart"])];
        let grouped = group(&records);
        assert_eq!(grouped.buckets["cart"].len(), 1);
    }

    #[test]
    fn empty_pattern_set_drops_record() {
        let records = vec![test_record(2, &[])];
        let grouped = group(&records);
        assert!(grouped.is_empty());
    }

    #[test]
    fn every_pattern_key_has_content() {
        let records = vec![
            test_record(1, &["__global"]),
            test_record(2, &["cart"]),
            test_record(3, &["products/.*", "cart"]),
        ];
        let grouped = group(&records);

        for key in grouped.pattern_keys() {
            assert!(!grouped.buckets[key].is_empty());
        }
    }

    #[test]
    fn serialized_shape_is_flat() {
        let records = vec![
            test_record(1, &["__global"]),
            test_record(2, &["products/.*"]),
        ];
        let grouped = group(&records);
        let value = serde_json::to_value(&grouped).unwrap();

        assert_eq!(value["global"][0]["id"], 1);
        assert_eq!(
            value["__patterns"],
            serde_json::json!(["products__sl__.__ast__"])
        );
        assert_eq!(value["products__sl__.__ast__"][0]["id"], 2);
        // No nested "buckets" wrapper
        assert!(value.get("buckets").is_none());
    }

    #[test]
    fn empty_distribution_serializes_with_structural_keys() {
        let value = serde_json::to_value(GroupedDistribution::empty()).unwrap();
        assert_eq!(value, serde_json::json!({"global": [], "__patterns": []}));
    }

    #[test]
    fn deserialize_rebuilds_buckets_from_flat_document() {
        let records = vec![test_record(1, &["__global"]), test_record(2, &["cart"])];
        let grouped = group(&records);

        let json = serde_json::to_string(&grouped).unwrap();
        let back: GroupedDistribution = serde_json::from_str(&json).unwrap();

        assert_eq!(back.global.len(), 1);
        assert_eq!(back.pattern_keys(), vec!["cart"]);
        assert_eq!(back.buckets["cart"][0].id, 2);
    }
}
