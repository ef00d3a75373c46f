//! Announcement service.
//!
//! Validates admin input, drives the repository, and keeps each shop's
//! published distribution in sync with the database. Mutations commit first;
//! the edge cache refresh runs after the commit and a failed publish is
//! logged, never rolled into the mutation result. `resync` exists to repair
//! a shop whose refresh was lost.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use validator::Validate;

use bannerline_common::{AppError, AppResult};
use bannerline_db::repositories::{
    AnnouncementRepository, AnnouncementWithRelations, DateSort, ListTab, NewAnnouncement,
    NewBackground, NewCountdown, NewCta, NewForm, NewText,
};

use crate::eligibility::{GLOBAL_PATTERN, matches_path};
use crate::grouping::{GroupedDistribution, group, is_reserved_key, sanitize_pattern};
use crate::record::AnnouncementRecord;
use crate::services::distribution::DistributionStore;

/// Maximum admin listing page size.
const MAX_PAGE_SIZE: u64 = 100;

/// Maximum follow-up chain length accepted on a write.
const MAX_CHILD_DEPTH: usize = 16;

const KINDS: &[&str] = &["basic", "countdown", "email_signup", "multi_text"];
const STATUSES: &[&str] = &["draft", "published", "paused", "ended"];
const SIZES: &[&str] = &["small", "medium", "large", "custom"];
const CLOSE_POSITIONS: &[&str] = &["left", "right"];
const BACKGROUND_KINDS: &[&str] = &["solid", "gradient", "image"];
const CTA_KINDS: &[&str] = &["button", "link"];
const TIMER_KINDS: &[&str] = &["to_date", "duration"];
const AFTER_END_MODES: &[&str] = &["hide", "show_zeros", "show_child"];

const START_TYPE_NOW: &str = "now";
const START_TYPE_SPECIFIC: &str = "specific";
const END_TYPE_UNTIL_STOP: &str = "until_stop";
const END_TYPE_SPECIFIC: &str = "specific";

const KIND_COUNTDOWN: &str = "countdown";
const KIND_EMAIL_SIGNUP: &str = "email_signup";
const KIND_MULTI_TEXT: &str = "multi_text";

const STATUS_PAUSED: &str = "paused";

/// Sentinel end date for announcements that run until manually stopped.
fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Input for one call-to-action.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CtaInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(min = 1, max = 128))]
    pub label: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

/// Input for one text block.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    #[validate(length(min = 1, max = 1024))]
    pub content: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_font_size")]
    #[validate(range(min = 8, max = 96))]
    pub font_size: i32,
    pub font_family: Option<String>,
    pub custom_font_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub ctas: Vec<CtaInput>,
}

/// Input for the background styling.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(min = 1, max = 32))]
    pub color1: String,
    pub color2: Option<String>,
    pub image_url: Option<String>,
    #[validate(range(min = 0, max = 200))]
    pub padding: Option<i32>,
}

/// Input for one email signup form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    #[validate(length(min = 1, max = 128))]
    pub placeholder: String,
    #[validate(length(min = 1, max = 128))]
    pub button_label: String,
    #[validate(email)]
    pub destination_email: Option<String>,
}

/// Input for countdown settings.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CountdownInput {
    #[serde(rename = "type")]
    pub timer_kind: String,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, max = 365))]
    pub duration_days: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 23))]
    pub duration_hours: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 59))]
    pub duration_minutes: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 59))]
    pub duration_seconds: i32,
    #[serde(default = "default_after_end")]
    pub after_end: String,
}

/// Full create/update payload for one announcement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub start_type: String,
    pub end_type: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_size")]
    pub size: String,
    pub custom_height: Option<i32>,
    pub custom_width: Option<i32>,
    #[serde(default = "default_true")]
    pub show_close_button: bool,
    #[serde(default = "default_close_position")]
    pub close_button_position: String,
    pub close_button_color: Option<String>,
    #[validate(range(min = 0, max = 3600))]
    pub show_after_delay_seconds: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub show_after_scroll_percent: Option<i32>,
    #[validate(range(min = 0, max = 8760))]
    pub stay_closed_hours: Option<i32>,
    pub child_announcement_id: Option<i64>,
    #[serde(default)]
    #[validate(nested)]
    pub texts: Vec<TextInput>,
    #[validate(nested)]
    pub background: Option<BackgroundInput>,
    #[serde(default)]
    #[validate(nested)]
    pub forms: Vec<FormInput>,
    #[validate(nested)]
    pub countdown: Option<CountdownInput>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

const fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_size() -> String {
    "medium".to_string()
}

fn default_close_position() -> String {
    "right".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

const fn default_font_size() -> i32 {
    14
}

fn default_after_end() -> String {
    "hide".to_string()
}

fn require_member(field: &str, value: &str, allowed: &[&str]) -> AppResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid {field}: {value} (expected one of {})",
            allowed.join(", ")
        )))
    }
}

impl CreateAnnouncementInput {
    /// Cross-field checks that the derive cannot express.
    fn check_semantics(&self) -> AppResult<()> {
        require_member("type", &self.kind, KINDS)?;
        require_member("status", &self.status, STATUSES)?;
        require_member("size", &self.size, SIZES)?;
        require_member("startType", &self.start_type, &[
            START_TYPE_NOW,
            START_TYPE_SPECIFIC,
        ])?;
        require_member("endType", &self.end_type, &[
            END_TYPE_UNTIL_STOP,
            END_TYPE_SPECIFIC,
        ])?;
        require_member(
            "closeButtonPosition",
            &self.close_button_position,
            CLOSE_POSITIONS,
        )?;

        if self.start_type == START_TYPE_SPECIFIC && self.start_date.is_none() {
            return Err(AppError::Validation(
                "A specific start requires startDate".to_string(),
            ));
        }
        if self.end_type == END_TYPE_SPECIFIC && self.end_date.is_none() {
            return Err(AppError::Validation(
                "A specific end requires endDate".to_string(),
            ));
        }

        if self.size == "custom" {
            let valid = matches!(self.custom_height, Some(h) if h > 0)
                && matches!(self.custom_width, Some(w) if w > 0);
            if !valid {
                return Err(AppError::Validation(
                    "Custom size requires positive customHeight and customWidth".to_string(),
                ));
            }
        }

        if self.texts.is_empty() && self.kind != KIND_EMAIL_SIGNUP {
            return Err(AppError::Validation(
                "At least one text block is required".to_string(),
            ));
        }
        if self.kind == KIND_MULTI_TEXT && self.texts.len() < 2 {
            return Err(AppError::Validation(
                "A multi-text announcement requires at least two text blocks".to_string(),
            ));
        }
        for text in &self.texts {
            if text.font_family.as_deref() == Some("custom") && text.custom_font_url.is_none() {
                return Err(AppError::Validation(
                    "A custom font requires customFontUrl".to_string(),
                ));
            }
            for cta in &text.ctas {
                require_member("cta type", &cta.kind, CTA_KINDS)?;
            }
        }

        if let Some(bg) = &self.background {
            require_member("background type", &bg.kind, BACKGROUND_KINDS)?;
            if bg.kind == "gradient" && bg.color2.is_none() {
                return Err(AppError::Validation(
                    "A gradient background requires color2".to_string(),
                ));
            }
            if bg.kind == "image" && bg.image_url.is_none() {
                return Err(AppError::Validation(
                    "An image background requires imageUrl".to_string(),
                ));
            }
        }

        if self.kind == KIND_EMAIL_SIGNUP && self.forms.is_empty() {
            return Err(AppError::Validation(
                "An email signup announcement requires a form".to_string(),
            ));
        }

        if self.kind == KIND_COUNTDOWN {
            let Some(cd) = &self.countdown else {
                return Err(AppError::Validation(
                    "A countdown announcement requires countdown settings".to_string(),
                ));
            };
            require_member("countdown type", &cd.timer_kind, TIMER_KINDS)?;
            require_member("afterEnd", &cd.after_end, AFTER_END_MODES)?;

            if cd.timer_kind == "to_date" && cd.ends_at.is_none() {
                return Err(AppError::Validation(
                    "A fixed-date countdown requires endsAt".to_string(),
                ));
            }
            if cd.timer_kind == "duration" {
                let total = cd.duration_days
                    + cd.duration_hours
                    + cd.duration_minutes
                    + cd.duration_seconds;
                if total < 1 {
                    return Err(AppError::Validation(
                        "A duration countdown requires a non-zero duration".to_string(),
                    ));
                }
            }
            if cd.after_end == "show_child" && self.child_announcement_id.is_none() {
                return Err(AppError::Validation(
                    "Showing a follow-up after the countdown requires childAnnouncementId"
                        .to_string(),
                ));
            }
        }

        if self.patterns.is_empty() {
            return Err(AppError::Validation(
                "At least one page pattern is required".to_string(),
            ));
        }
        for pattern in &self.patterns {
            if pattern.trim().is_empty() {
                return Err(AppError::Validation(
                    "Page patterns must not be empty".to_string(),
                ));
            }
            if pattern != GLOBAL_PATTERN && is_reserved_key(&sanitize_pattern(pattern)) {
                return Err(AppError::Validation(format!(
                    "Page pattern collides with a reserved key: {pattern}"
                )));
            }
        }

        Ok(())
    }

    /// Resolve the display window and build the repository payload.
    fn into_new(self, shop: &str) -> AppResult<NewAnnouncement> {
        let now = Utc::now();
        let start_date = if self.start_type == START_TYPE_NOW {
            now
        } else {
            self.start_date
                .ok_or_else(|| AppError::Validation("Missing startDate".to_string()))?
        };
        let end_date = if self.end_type == END_TYPE_UNTIL_STOP {
            far_future()
        } else {
            self.end_date
                .ok_or_else(|| AppError::Validation("Missing endDate".to_string()))?
        };

        if start_date > end_date {
            return Err(AppError::Validation(
                "startDate must not be after endDate".to_string(),
            ));
        }

        Ok(NewAnnouncement {
            shop: shop.to_string(),
            title: self.title,
            kind: self.kind,
            status: self.status,
            is_active: self.is_active,
            start_type: self.start_type,
            end_type: self.end_type,
            start_date,
            end_date,
            timezone: self.timezone,
            size: self.size,
            custom_height: self.custom_height,
            custom_width: self.custom_width,
            show_close_button: self.show_close_button,
            close_button_position: self.close_button_position,
            close_button_color: self.close_button_color,
            show_after_delay_seconds: self.show_after_delay_seconds,
            show_after_scroll_percent: self.show_after_scroll_percent,
            stay_closed_hours: self.stay_closed_hours,
            child_announcement_id: self.child_announcement_id,
            texts: self
                .texts
                .into_iter()
                .map(|t| NewText {
                    content: t.content,
                    text_color: t.text_color,
                    font_size: t.font_size,
                    font_family: t.font_family,
                    custom_font_url: t.custom_font_url,
                    ctas: t
                        .ctas
                        .into_iter()
                        .map(|c| NewCta {
                            kind: c.kind,
                            label: c.label,
                            url: c.url,
                            text_color: c.text_color,
                            background_color: c.background_color,
                        })
                        .collect(),
                })
                .collect(),
            background: self.background.map(|b| NewBackground {
                kind: b.kind,
                color1: b.color1,
                color2: b.color2,
                image_url: b.image_url,
                padding: b.padding,
            }),
            forms: self
                .forms
                .into_iter()
                .map(|f| NewForm {
                    placeholder: f.placeholder,
                    button_label: f.button_label,
                    destination_email: f.destination_email,
                })
                .collect(),
            countdown: self.countdown.map(|c| NewCountdown {
                timer_kind: c.timer_kind,
                ends_at: c.ends_at,
                duration_days: c.duration_days,
                duration_hours: c.duration_hours,
                duration_minutes: c.duration_minutes,
                duration_seconds: c.duration_seconds,
                after_end: c.after_end,
            }),
            patterns: self.patterns,
        })
    }
}

/// Bulk operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Delete the announcements and their children.
    Delete,
    /// Set status to `paused`.
    Pause,
    /// Clone the announcements as drafts.
    Duplicate,
}

impl BulkAction {
    /// Parse a bulk action string from the admin API.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bulk_delete" => Some(Self::Delete),
            "bulk_pause" => Some(Self::Pause),
            "bulk_duplicate" => Some(Self::Duplicate),
            _ => None,
        }
    }
}

/// Result of a bulk operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    /// Number of announcements touched.
    pub affected: usize,
    /// Clones created by a duplicate action, empty otherwise.
    pub duplicated: Vec<AnnouncementRecord>,
}

/// One page of the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementListPage {
    pub data: Vec<AnnouncementRecord>,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Service for announcement management and distribution.
#[derive(Clone)]
pub struct AnnouncementService {
    repo: AnnouncementRepository,
    store: Arc<dyn DistributionStore>,
}

impl AnnouncementService {
    /// Create a new announcement service.
    #[must_use]
    pub fn new(repo: AnnouncementRepository, store: Arc<dyn DistributionStore>) -> Self {
        Self { repo, store }
    }

    /// Get one announcement with ownership check.
    pub async fn get(&self, shop: &str, id: i64) -> AppResult<AnnouncementRecord> {
        let with = self.owned(shop, id).await?;
        Ok(AnnouncementRecord::from(&with))
    }

    /// Admin listing with tab filter, title/type search, start date sort,
    /// and offset pagination.
    pub async fn list(
        &self,
        shop: &str,
        tab: &str,
        search: Option<&str>,
        sort: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<AnnouncementListPage> {
        let tab = ListTab::parse(tab)
            .ok_or_else(|| AppError::Validation(format!("Unknown listing tab: {tab}")))?;
        let sort = match sort {
            None => DateSort::default(),
            Some(s) => DateSort::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown sort order: {s}")))?,
        };

        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let (rows, total) = self
            .repo
            .find_filtered_for_shop(shop, tab, search, sort, Utc::now(), page, page_size)
            .await?;

        Ok(AnnouncementListPage {
            data: rows.iter().map(AnnouncementRecord::from).collect(),
            total_pages: total.div_ceil(page_size),
            current_page: page,
        })
    }

    /// Create an announcement and refresh the shop's distribution.
    pub async fn create(
        &self,
        shop: &str,
        input: CreateAnnouncementInput,
    ) -> AppResult<AnnouncementRecord> {
        input.validate()?;
        input.check_semantics()?;
        self.check_child_chain(shop, None, input.child_announcement_id)
            .await?;

        let with = self
            .repo
            .create_with_children(input.into_new(shop)?)
            .await?;

        self.refresh_shop(shop).await;
        Ok(AnnouncementRecord::from(&with))
    }

    /// Update an announcement, replacing its whole child set, and refresh
    /// the shop's distribution.
    pub async fn update(
        &self,
        shop: &str,
        id: i64,
        input: CreateAnnouncementInput,
    ) -> AppResult<AnnouncementRecord> {
        self.owned(shop, id).await?;

        input.validate()?;
        input.check_semantics()?;
        self.check_child_chain(shop, Some(id), input.child_announcement_id)
            .await?;

        let with = self
            .repo
            .update_with_children(id, input.into_new(shop)?)
            .await?;

        self.refresh_shop(shop).await;
        Ok(AnnouncementRecord::from(&with))
    }

    /// Delete one announcement and refresh the shop's distribution.
    pub async fn delete(&self, shop: &str, id: i64) -> AppResult<()> {
        self.owned(shop, id).await?;
        self.repo.bulk_delete(&[id]).await?;
        self.refresh_shop(shop).await;
        Ok(())
    }

    /// Run a bulk operation over a set of announcement ids.
    ///
    /// The ids may span shops; every distinct shop touched gets its
    /// distribution refreshed once after the transaction commits.
    pub async fn bulk(&self, action: &str, ids: &[i64]) -> AppResult<BulkOutcome> {
        let action = BulkAction::parse(action)
            .ok_or_else(|| AppError::Validation(format!("Unknown bulk action: {action}")))?;

        let (affected, duplicated, shops) = match action {
            BulkAction::Delete => {
                let pairs = self.repo.bulk_delete(ids).await?;
                let shops: BTreeSet<String> = pairs.iter().map(|(_, s)| s.clone()).collect();
                (pairs.len(), Vec::new(), shops)
            }
            BulkAction::Pause => {
                let pairs = self.repo.bulk_set_status(ids, STATUS_PAUSED).await?;
                let shops: BTreeSet<String> = pairs.iter().map(|(_, s)| s.clone()).collect();
                (pairs.len(), Vec::new(), shops)
            }
            BulkAction::Duplicate => {
                let clones = self.repo.duplicate(ids).await?;
                let shops: BTreeSet<String> = clones
                    .iter()
                    .map(|c| c.announcement.shop.clone())
                    .collect();
                let records: Vec<AnnouncementRecord> =
                    clones.iter().map(AnnouncementRecord::from).collect();
                (records.len(), records, shops)
            }
        };

        for shop in shops {
            self.refresh_shop(&shop).await;
        }

        Ok(BulkOutcome {
            affected,
            duplicated,
        })
    }

    /// Flip the independent active toggle and refresh the shop's
    /// distribution.
    pub async fn toggle_active(
        &self,
        shop: &str,
        id: i64,
        is_active: bool,
    ) -> AppResult<AnnouncementRecord> {
        self.owned(shop, id).await?;
        let with = self.repo.toggle_active(id, is_active).await?;
        self.refresh_shop(shop).await;
        Ok(AnnouncementRecord::from(&with))
    }

    /// Announcements currently live for a shop, straight from the database.
    ///
    /// With a path, only announcements whose patterns target that path are
    /// returned.
    pub async fn active_for_shop(
        &self,
        shop: &str,
        path: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AnnouncementRecord>> {
        let rows = self.repo.find_active_for_shop(shop, now).await?;
        let mut records: Vec<AnnouncementRecord> =
            rows.iter().map(AnnouncementRecord::from).collect();

        if let Some(path) = path {
            records.retain(|r| matches_path(&r.patterns, path));
        }

        Ok(records)
    }

    /// The shop's currently published distribution document, if any.
    pub async fn published(&self, shop: &str) -> AppResult<Option<GroupedDistribution>> {
        self.store.fetch(shop).await
    }

    /// Rebuild and publish a shop's distribution, propagating publish
    /// failures to the caller.
    pub async fn resync(&self, shop: &str) -> AppResult<GroupedDistribution> {
        let distribution = self.build_distribution(shop).await?;
        self.store.publish(shop, &distribution).await?;
        Ok(distribution)
    }

    /// Rebuild the grouped distribution for a shop from the database.
    async fn build_distribution(&self, shop: &str) -> AppResult<GroupedDistribution> {
        let rows = self.repo.find_active_for_shop(shop, Utc::now()).await?;
        let records: Vec<AnnouncementRecord> =
            rows.iter().map(AnnouncementRecord::from).collect();
        Ok(group(&records))
    }

    /// Post-commit distribution refresh. Failures are logged and swallowed
    /// so they never undo a committed mutation.
    async fn refresh_shop(&self, shop: &str) {
        let result = match self.build_distribution(shop).await {
            Ok(distribution) => self.store.publish(shop, &distribution).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(
                shop = %shop,
                error = %e,
                "Failed to refresh shop distribution, resync required"
            );
        }
    }

    /// Fetch with ownership check. A cross-shop id reads as not found.
    async fn owned(&self, shop: &str, id: i64) -> AppResult<AnnouncementWithRelations> {
        let with = self
            .repo
            .find_by_id_with_relations(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))?;

        if with.announcement.shop != shop {
            return Err(AppError::NotFound(format!("Announcement not found: {id}")));
        }

        Ok(with)
    }

    /// Walk the proposed follow-up chain and reject cycles, cross-shop
    /// references, and dangling ids before anything is written.
    async fn check_child_chain(
        &self,
        shop: &str,
        self_id: Option<i64>,
        child_id: Option<i64>,
    ) -> AppResult<()> {
        let Some(first) = child_id else {
            return Ok(());
        };

        let mut visited = BTreeSet::new();
        if let Some(id) = self_id {
            visited.insert(id);
        }

        let mut current = first;
        for _ in 0..MAX_CHILD_DEPTH {
            if !visited.insert(current) {
                return Err(AppError::Validation(format!(
                    "Follow-up announcement chain forms a cycle at {current}"
                )));
            }

            let with = self
                .repo
                .find_by_id_with_relations(current)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("Follow-up announcement not found: {current}"))
                })?;

            if with.announcement.shop != shop {
                return Err(AppError::Validation(format!(
                    "Follow-up announcement belongs to a different shop: {current}"
                )));
            }

            match with.announcement.child_announcement_id {
                Some(next) => current = next,
                None => return Ok(()),
            }
        }

        Err(AppError::Validation(
            "Follow-up announcement chain is too deep".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::distribution::MemoryDistributionStore;
    use async_trait::async_trait;
    use bannerline_db::entities::announcement;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    struct FailingStore;

    #[async_trait]
    impl DistributionStore for FailingStore {
        async fn publish(&self, _: &str, _: &GroupedDistribution) -> AppResult<()> {
            Err(AppError::PublishFailed("edge cache offline".to_string()))
        }

        async fn fetch(&self, _: &str) -> AppResult<Option<GroupedDistribution>> {
            Ok(None)
        }

        async fn remove(&self, _: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn valid_input() -> CreateAnnouncementInput {
        CreateAnnouncementInput {
            title: "Summer sale".to_string(),
            kind: "basic".to_string(),
            status: "published".to_string(),
            is_active: true,
            start_type: "now".to_string(),
            end_type: "until_stop".to_string(),
            start_date: None,
            end_date: None,
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
            texts: vec![TextInput {
                content: "20% off everything".to_string(),
                text_color: "#ffffff".to_string(),
                font_size: 14,
                font_family: None,
                custom_font_url: None,
                ctas: vec![],
            }],
            background: None,
            forms: vec![],
            countdown: None,
            patterns: vec!["__global".to_string()],
        }
    }

    fn test_model(id: i64, shop: &str) -> announcement::Model {
        announcement::Model {
            id,
            shop: shop.to_string(),
            title: format!("Announcement {id}"),
            kind: "basic".to_string(),
            status: "published".to_string(),
            is_active: true,
            start_type: "specific".to_string(),
            end_type: "specific".to_string(),
            start_date: Utc::now(),
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
        }
    }

    #[test]
    fn bulk_action_parse() {
        assert_eq!(BulkAction::parse("bulk_delete"), Some(BulkAction::Delete));
        assert_eq!(BulkAction::parse("bulk_pause"), Some(BulkAction::Pause));
        assert_eq!(
            BulkAction::parse("bulk_duplicate"),
            Some(BulkAction::Duplicate)
        );
        assert_eq!(BulkAction::parse("bulk_archive"), None);
    }

    #[test]
    fn valid_input_passes_checks() {
        let input = valid_input();
        assert!(input.validate().is_ok());
        assert!(input.check_semantics().is_ok());
    }

    #[test]
    fn specific_start_requires_date() {
        let mut input = valid_input();
        input.start_type = "specific".to_string();
        input.start_date = None;
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn start_after_end_is_rejected() {
        let mut input = valid_input();
        input.start_type = "specific".to_string();
        input.end_type = "specific".to_string();
        input.start_date = Some(Utc::now() + chrono::Duration::days(7));
        input.end_date = Some(Utc::now());
        assert!(input.check_semantics().is_ok());
        assert!(input.into_new("shop.example.com").is_err());
    }

    #[test]
    fn now_and_until_stop_resolve_dates() {
        let input = valid_input();
        let new = input.into_new("shop.example.com").unwrap();
        assert!(new.start_date <= Utc::now());
        assert!(new.end_date > Utc::now() + chrono::Duration::days(365 * 100));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut input = valid_input();
        input.kind = "marquee".to_string();
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn reserved_pattern_keys_are_rejected() {
        let mut input = valid_input();
        input.patterns = vec!["global".to_string()];
        assert!(input.check_semantics().is_err());

        let mut input = valid_input();
        input.patterns = vec!["__patterns".to_string()];
        assert!(input.check_semantics().is_err());

        // __global itself is fine
        let mut input = valid_input();
        input.patterns = vec!["__global".to_string()];
        assert!(input.check_semantics().is_ok());
    }

    #[test]
    fn empty_pattern_set_is_rejected() {
        let mut input = valid_input();
        input.patterns = vec![];
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn countdown_kind_requires_settings() {
        let mut input = valid_input();
        input.kind = "countdown".to_string();
        input.countdown = None;
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn duration_countdown_requires_nonzero_duration() {
        let mut input = valid_input();
        input.kind = "countdown".to_string();
        input.countdown = Some(CountdownInput {
            timer_kind: "duration".to_string(),
            ends_at: None,
            duration_days: 0,
            duration_hours: 0,
            duration_minutes: 0,
            duration_seconds: 0,
            after_end: "hide".to_string(),
        });
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn gradient_background_requires_second_color() {
        let mut input = valid_input();
        input.background = Some(BackgroundInput {
            kind: "gradient".to_string(),
            color1: "#000000".to_string(),
            color2: None,
            image_url: None,
            padding: None,
        });
        assert!(input.check_semantics().is_err());
    }

    #[test]
    fn email_signup_requires_a_form() {
        let mut input = valid_input();
        input.kind = "email_signup".to_string();
        input.texts = vec![];
        input.forms = vec![];
        assert!(input.check_semantics().is_err());
    }

    #[tokio::test]
    async fn cross_shop_bulk_delete_refreshes_each_shop_once() {
        let a = test_model(1, "shop-x.example.com");
        let b = test_model(2, "shop-y.example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // delete targets
                .append_query_results([vec![a, b]])
                // text ids of the deleted rows
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                // post-commit active set per shop, in sorted shop order
                .append_query_results([Vec::<announcement::Model>::new()])
                .append_query_results([Vec::<announcement::Model>::new()])
                .append_exec_results([
                    // clear dangling follow-up references
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // pattern links
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // texts
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // background
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // forms
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // countdown settings
                    MockExecResult { last_insert_id: 0, rows_affected: 0 },
                    // announcements
                    MockExecResult { last_insert_id: 0, rows_affected: 2 },
                ])
                .into_connection(),
        );

        let store = Arc::new(MemoryDistributionStore::new());
        let service = AnnouncementService::new(AnnouncementRepository::new(db), store.clone());

        let outcome = service.bulk("bulk_delete", &[1, 2]).await.unwrap();

        assert_eq!(outcome.affected, 2);
        assert!(outcome.duplicated.is_empty());

        // One empty document published per touched shop
        assert_eq!(store.len(), 2);
        let doc = store.fetch("shop-x.example.com").await.unwrap().unwrap();
        assert!(doc.is_empty());
        let doc = store.fetch("shop-y.example.com").await.unwrap().unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn publish_failure_does_not_undo_the_mutation() {
        let shop = "shop.example.com";
        let before = test_model(7, shop);
        let mut after = before.clone();
        after.is_active = false;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // ownership check: announcement + its children
                .append_query_results([vec![before.clone()]])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                // toggle: find, update returning, reload children
                .append_query_results([vec![before]])
                .append_query_results([vec![after]])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                // post-commit active set
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let service =
            AnnouncementService::new(AnnouncementRepository::new(db), Arc::new(FailingStore));

        let record = service.toggle_active(shop, 7, false).await.unwrap();
        assert!(!record.is_active);
    }

    #[tokio::test]
    async fn resync_publishes_an_empty_document_when_nothing_is_live() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let store = Arc::new(MemoryDistributionStore::new());
        let service = AnnouncementService::new(AnnouncementRepository::new(db), store.clone());

        let distribution = service.resync("shop.example.com").await.unwrap();
        assert!(distribution.is_empty());
        assert_eq!(
            store.fetch("shop.example.com").await.unwrap(),
            Some(GroupedDistribution::empty())
        );
    }

    #[tokio::test]
    async fn cross_shop_ids_read_as_not_found() {
        let other = test_model(3, "other.example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![other]])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                .into_connection(),
        );

        let service = AnnouncementService::new(
            AnnouncementRepository::new(db),
            Arc::new(MemoryDistributionStore::new()),
        );

        let result = service.get("shop.example.com", 3).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unknown_bulk_action_is_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = AnnouncementService::new(
            AnnouncementRepository::new(db),
            Arc::new(MemoryDistributionStore::new()),
        );

        let result = service.bulk("bulk_archive", &[1]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_listing_tab_is_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = AnnouncementService::new(
            AnnouncementRepository::new(db),
            Arc::new(MemoryDistributionStore::new()),
        );

        let result = service.list("shop.example.com", "archived", None, None, 1, 20).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn listing_rounds_page_count_up_for_uneven_totals() {
        // 5 matches at 2 per page: 3 pages, the last holding the remainder.
        let last = test_model(5, "shop.example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(5))
                }]])
                .append_query_results([vec![last]])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                .into_connection(),
        );

        let service = AnnouncementService::new(
            AnnouncementRepository::new(db),
            Arc::new(MemoryDistributionStore::new()),
        );

        let page = service
            .list("shop.example.com", "all", None, None, 3, 2)
            .await
            .unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn listing_page_count_is_exact_for_divisible_totals() {
        let a = test_model(3, "shop.example.com");
        let b = test_model(4, "shop.example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .append_query_results([vec![a, b]])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_text::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::background::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::signup_form::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::countdown_settings::Model>::new()])
                .append_query_results([Vec::<bannerline_db::entities::announcement_page_pattern::Model>::new()])
                .into_connection(),
        );

        let service = AnnouncementService::new(
            AnnouncementRepository::new(db),
            Arc::new(MemoryDistributionStore::new()),
        );

        let page = service
            .list("shop.example.com", "all", None, None, 2, 2)
            .await
            .unwrap();

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.data.len(), 2);
    }
}
