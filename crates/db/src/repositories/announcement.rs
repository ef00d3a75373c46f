//! Announcement repository.
//!
//! All writes that touch an announcement's children run inside a single
//! transaction, so a partially written child set is never observable. Bulk
//! operations are one transaction per call, not one per id.

use std::collections::HashMap;
use std::sync::Arc;

use bannerline_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;

use crate::entities::{
    Announcement, AnnouncementPagePattern, AnnouncementText, Background, CallToAction,
    CountdownSettings, PagePattern, SignupForm, announcement, announcement_page_pattern,
    announcement_text, background, call_to_action, countdown_settings, signup_form,
};
use crate::repositories::page_pattern;

/// Published lifecycle status.
pub const STATUS_PUBLISHED: &str = "published";
/// Draft lifecycle status.
pub const STATUS_DRAFT: &str = "draft";

/// Admin listing tab filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTab {
    /// No status filter.
    All,
    /// Published and not yet past its end date.
    Active,
    /// Past its end date, regardless of status.
    Ended,
    /// Exact status `draft`.
    Draft,
    /// Exact status `paused`.
    Paused,
    /// Exact status `published`.
    Published,
}

impl ListTab {
    /// Parse a tab string from the admin listing query.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "ended" => Some(Self::Ended),
            "draft" => Some(Self::Draft),
            "paused" => Some(Self::Paused),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

/// Admin listing sort order over `start_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSort {
    /// Oldest start date first.
    Asc,
    /// Newest start date first (default).
    #[default]
    Desc,
}

impl DateSort {
    /// Parse a sort string (`"date asc"` / `"date desc"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "date asc" => Some(Self::Asc),
            "date desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A text block together with its call-to-actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWithCtas {
    /// The text block.
    pub text: announcement_text::Model,
    /// Its CTAs, in insertion order.
    pub ctas: Vec<call_to_action::Model>,
}

/// An announcement with every owned child collection loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementWithRelations {
    /// The announcement row.
    pub announcement: announcement::Model,
    /// Text blocks with their CTAs.
    pub texts: Vec<TextWithCtas>,
    /// Background styling, if configured.
    pub background: Option<background::Model>,
    /// Email signup forms.
    pub forms: Vec<signup_form::Model>,
    /// Countdown settings, if configured.
    pub countdown: Option<countdown_settings::Model>,
    /// Resolved pattern strings (deduplicated, link order).
    pub patterns: Vec<String>,
    /// Follow-up announcement, one level deep.
    pub child: Option<Box<AnnouncementWithRelations>>,
}

/// New text block for a write.
#[derive(Debug, Clone)]
pub struct NewText {
    pub content: String,
    pub text_color: String,
    pub font_size: i32,
    pub font_family: Option<String>,
    pub custom_font_url: Option<String>,
    pub ctas: Vec<NewCta>,
}

/// New call-to-action for a write.
#[derive(Debug, Clone)]
pub struct NewCta {
    pub kind: String,
    pub label: String,
    pub url: String,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

/// New background for a write.
#[derive(Debug, Clone)]
pub struct NewBackground {
    pub kind: String,
    pub color1: String,
    pub color2: Option<String>,
    pub image_url: Option<String>,
    pub padding: Option<i32>,
}

/// New signup form for a write.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub placeholder: String,
    pub button_label: String,
    pub destination_email: Option<String>,
}

/// New countdown settings for a write.
#[derive(Debug, Clone)]
pub struct NewCountdown {
    pub timer_kind: String,
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: i32,
    pub duration_hours: i32,
    pub duration_minutes: i32,
    pub duration_seconds: i32,
    pub after_end: String,
}

/// Full announcement payload for create/update.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub shop: String,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub is_active: bool,
    pub start_type: String,
    pub end_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    pub size: String,
    pub custom_height: Option<i32>,
    pub custom_width: Option<i32>,
    pub show_close_button: bool,
    pub close_button_position: String,
    pub close_button_color: Option<String>,
    pub show_after_delay_seconds: Option<i32>,
    pub show_after_scroll_percent: Option<i32>,
    pub stay_closed_hours: Option<i32>,
    pub child_announcement_id: Option<i64>,
    pub texts: Vec<NewText>,
    pub background: Option<NewBackground>,
    pub forms: Vec<NewForm>,
    pub countdown: Option<NewCountdown>,
    pub patterns: Vec<String>,
}

/// Repository for announcement operations.
#[derive(Clone)]
pub struct AnnouncementRepository {
    db: Arc<DatabaseConnection>,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an announcement by ID with all children and one level of
    /// child-announcement nesting.
    pub async fn find_by_id_with_relations(
        &self,
        id: i64,
    ) -> AppResult<Option<AnnouncementWithRelations>> {
        let Some(model) = Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        Ok(Some(Self::load_full(self.db.as_ref(), model).await?))
    }

    /// Find all announcements currently eligible for display for a shop.
    ///
    /// Pushes the eligibility predicate (`is_active`, `status = published`,
    /// `start_date <= now <= end_date`) to SQL. Rows with zero resolvable
    /// page patterns are excluded with a warning rather than an error, so a
    /// single malformed row never fails the read path.
    pub async fn find_active_for_shop(
        &self,
        shop: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AnnouncementWithRelations>> {
        let rows = Announcement::find()
            .filter(announcement::Column::Shop.eq(shop))
            .filter(announcement::Column::IsActive.eq(true))
            .filter(announcement::Column::Status.eq(STATUS_PUBLISHED))
            .filter(announcement::Column::StartDate.lte(now))
            .filter(announcement::Column::EndDate.gte(now))
            .order_by(announcement::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let with = Self::load_full(self.db.as_ref(), row).await?;
            if with.patterns.is_empty() {
                warn!(
                    announcement_id = with.announcement.id,
                    shop = %with.announcement.shop,
                    "announcement has no resolvable page patterns, excluding from active set"
                );
                continue;
            }
            results.push(with);
        }

        Ok(results)
    }

    /// Admin listing query: tab filter, search, sort, offset pagination.
    ///
    /// Returns the page of rows plus the total count over the filtered set
    /// before pagination.
    pub async fn find_filtered_for_shop(
        &self,
        shop: &str,
        tab: ListTab,
        search: Option<&str>,
        sort: DateSort,
        now: DateTime<Utc>,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<AnnouncementWithRelations>, u64)> {
        let mut cond = Condition::all().add(announcement::Column::Shop.eq(shop));

        cond = match tab {
            ListTab::All => cond,
            ListTab::Active => cond
                .add(announcement::Column::Status.eq(STATUS_PUBLISHED))
                .add(announcement::Column::EndDate.gte(now)),
            ListTab::Ended => cond.add(announcement::Column::EndDate.lte(now)),
            ListTab::Draft => cond.add(announcement::Column::Status.eq("draft")),
            ListTab::Paused => cond.add(announcement::Column::Status.eq("paused")),
            ListTab::Published => cond.add(announcement::Column::Status.eq(STATUS_PUBLISHED)),
        };

        if let Some(q) = search.map(str::trim).filter(|q| !q.is_empty()) {
            let pat = format!("%{q}%");
            cond = cond.add(
                Condition::any()
                    .add(Expr::col(announcement::Column::Title).ilike(pat.clone()))
                    .add(Expr::col(announcement::Column::Kind).ilike(pat)),
            );
        }

        let query = Announcement::find().filter(cond);

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let order = match sort {
            DateSort::Asc => Order::Asc,
            DateSort::Desc => Order::Desc,
        };

        let page = page.max(1);
        let rows = query
            .order_by(announcement::Column::StartDate, order)
            .offset((page - 1) * page_size)
            .limit(page_size)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(Self::load_shallow(self.db.as_ref(), row).await?);
        }

        Ok((results, total))
    }

    /// Create an announcement with all children in one transaction.
    pub async fn create_with_children(
        &self,
        new: NewAnnouncement,
    ) -> AppResult<AnnouncementWithRelations> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let now = Utc::now();
        let model = announcement::ActiveModel {
            shop: Set(new.shop.clone()),
            title: Set(new.title.clone()),
            kind: Set(new.kind.clone()),
            status: Set(new.status.clone()),
            is_active: Set(new.is_active),
            start_type: Set(new.start_type.clone()),
            end_type: Set(new.end_type.clone()),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            timezone: Set(new.timezone.clone()),
            size: Set(new.size.clone()),
            custom_height: Set(new.custom_height),
            custom_width: Set(new.custom_width),
            show_close_button: Set(new.show_close_button),
            close_button_position: Set(new.close_button_position.clone()),
            close_button_color: Set(new.close_button_color.clone()),
            show_after_delay_seconds: Set(new.show_after_delay_seconds),
            show_after_scroll_percent: Set(new.show_after_scroll_percent),
            stay_closed_hours: Set(new.stay_closed_hours),
            child_announcement_id: Set(new.child_announcement_id),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Self::insert_children(
            &txn,
            model.id,
            &new.texts,
            new.background.as_ref(),
            &new.forms,
            new.countdown.as_ref(),
            &new.patterns,
        )
        .await?;

        let with = Self::load_full(&txn, model).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(with)
    }

    /// Update an announcement, replacing its whole child set, in one
    /// transaction.
    pub async fn update_with_children(
        &self,
        id: i64,
        new: NewAnnouncement,
    ) -> AppResult<AnnouncementWithRelations> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = Announcement::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))?;

        let mut active: announcement::ActiveModel = existing.into();
        active.title = Set(new.title.clone());
        active.kind = Set(new.kind.clone());
        active.status = Set(new.status.clone());
        active.is_active = Set(new.is_active);
        active.start_type = Set(new.start_type.clone());
        active.end_type = Set(new.end_type.clone());
        active.start_date = Set(new.start_date);
        active.end_date = Set(new.end_date);
        active.timezone = Set(new.timezone.clone());
        active.size = Set(new.size.clone());
        active.custom_height = Set(new.custom_height);
        active.custom_width = Set(new.custom_width);
        active.show_close_button = Set(new.show_close_button);
        active.close_button_position = Set(new.close_button_position.clone());
        active.close_button_color = Set(new.close_button_color.clone());
        active.show_after_delay_seconds = Set(new.show_after_delay_seconds);
        active.show_after_scroll_percent = Set(new.show_after_scroll_percent);
        active.stay_closed_hours = Set(new.stay_closed_hours);
        active.child_announcement_id = Set(new.child_announcement_id);
        active.updated_at = Set(Some(Utc::now()));

        let model = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::delete_children(&txn, &[id]).await?;
        Self::insert_children(
            &txn,
            id,
            &new.texts,
            new.background.as_ref(),
            &new.forms,
            new.countdown.as_ref(),
            &new.patterns,
        )
        .await?;

        let with = Self::load_full(&txn, model).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(with)
    }

    /// Delete a set of announcements in one transaction.
    ///
    /// Returns the `(id, shop)` pairs of the rows actually deleted so the
    /// caller can refresh each touched shop's distribution.
    pub async fn bulk_delete(&self, ids: &[i64]) -> AppResult<Vec<(i64, String)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let targets = Announcement::find()
            .filter(announcement::Column::Id.is_in(ids.to_vec()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found_ids: Vec<i64> = targets.iter().map(|m| m.id).collect();
        if found_ids.is_empty() {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(Vec::new());
        }

        // Clear follow-up references pointing at the rows being deleted
        Announcement::update_many()
            .col_expr(
                announcement::Column::ChildAnnouncementId,
                Expr::value(Option::<i64>::None),
            )
            .filter(announcement::Column::ChildAnnouncementId.is_in(found_ids.clone()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::delete_children(&txn, &found_ids).await?;

        Announcement::delete_many()
            .filter(announcement::Column::Id.is_in(found_ids))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(targets.into_iter().map(|m| (m.id, m.shop)).collect())
    }

    /// Set the status on a set of announcements in one transaction.
    ///
    /// Returns the `(id, shop)` pairs of the rows actually updated.
    pub async fn bulk_set_status(
        &self,
        ids: &[i64],
        status: &str,
    ) -> AppResult<Vec<(i64, String)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let targets = Announcement::find()
            .filter(announcement::Column::Id.is_in(ids.to_vec()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found_ids: Vec<i64> = targets.iter().map(|m| m.id).collect();
        if !found_ids.is_empty() {
            Announcement::update_many()
                .col_expr(announcement::Column::Status, Expr::value(status))
                .col_expr(
                    announcement::Column::UpdatedAt,
                    Expr::value(Some(Utc::now())),
                )
                .filter(announcement::Column::Id.is_in(found_ids))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(targets.into_iter().map(|m| (m.id, m.shop)).collect())
    }

    /// Duplicate a set of announcements in one transaction.
    ///
    /// Clones copy all child text/CTA entries, background, forms, countdown
    /// settings, and page-pattern links. Status is reset to `draft` and the
    /// title gets a `" (copy)"` suffix, so clones never silently go live.
    pub async fn duplicate(&self, ids: &[i64]) -> AppResult<Vec<AnnouncementWithRelations>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut clones = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(model) = Announcement::find_by_id(id)
                .one(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
            else {
                warn!(announcement_id = id, "skipping duplicate of missing announcement");
                continue;
            };

            let source = Self::load_shallow(&txn, model).await?;
            let src = &source.announcement;

            let clone_model = announcement::ActiveModel {
                shop: Set(src.shop.clone()),
                title: Set(format!("{} (copy)", src.title)),
                kind: Set(src.kind.clone()),
                status: Set(STATUS_DRAFT.to_string()),
                is_active: Set(src.is_active),
                start_type: Set(src.start_type.clone()),
                end_type: Set(src.end_type.clone()),
                start_date: Set(src.start_date),
                end_date: Set(src.end_date),
                timezone: Set(src.timezone.clone()),
                size: Set(src.size.clone()),
                custom_height: Set(src.custom_height),
                custom_width: Set(src.custom_width),
                show_close_button: Set(src.show_close_button),
                close_button_position: Set(src.close_button_position.clone()),
                close_button_color: Set(src.close_button_color.clone()),
                show_after_delay_seconds: Set(src.show_after_delay_seconds),
                show_after_scroll_percent: Set(src.show_after_scroll_percent),
                stay_closed_hours: Set(src.stay_closed_hours),
                child_announcement_id: Set(src.child_announcement_id),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            let texts: Vec<NewText> = source
                .texts
                .iter()
                .map(|t| NewText {
                    content: t.text.content.clone(),
                    text_color: t.text.text_color.clone(),
                    font_size: t.text.font_size,
                    font_family: t.text.font_family.clone(),
                    custom_font_url: t.text.custom_font_url.clone(),
                    ctas: t
                        .ctas
                        .iter()
                        .map(|c| NewCta {
                            kind: c.kind.clone(),
                            label: c.label.clone(),
                            url: c.url.clone(),
                            text_color: c.text_color.clone(),
                            background_color: c.background_color.clone(),
                        })
                        .collect(),
                })
                .collect();
            let bg = source.background.as_ref().map(|b| NewBackground {
                kind: b.kind.clone(),
                color1: b.color1.clone(),
                color2: b.color2.clone(),
                image_url: b.image_url.clone(),
                padding: b.padding,
            });
            let forms: Vec<NewForm> = source
                .forms
                .iter()
                .map(|f| NewForm {
                    placeholder: f.placeholder.clone(),
                    button_label: f.button_label.clone(),
                    destination_email: f.destination_email.clone(),
                })
                .collect();
            let countdown = source.countdown.as_ref().map(|c| NewCountdown {
                timer_kind: c.timer_kind.clone(),
                ends_at: c.ends_at,
                duration_days: c.duration_days,
                duration_hours: c.duration_hours,
                duration_minutes: c.duration_minutes,
                duration_seconds: c.duration_seconds,
                after_end: c.after_end.clone(),
            });

            Self::insert_children(
                &txn,
                clone_model.id,
                &texts,
                bg.as_ref(),
                &forms,
                countdown.as_ref(),
                &source.patterns,
            )
            .await?;

            clones.push(Self::load_shallow(&txn, clone_model).await?);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(clones)
    }

    /// Flip the independent active toggle on one announcement.
    pub async fn toggle_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> AppResult<AnnouncementWithRelations> {
        let existing = Announcement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Announcement not found: {id}")))?;

        let mut active: announcement::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Some(Utc::now()));

        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Self::load_full(self.db.as_ref(), model).await
    }

    /// Distinct shops owning the given announcement ids.
    pub async fn shops_for_ids(&self, ids: &[i64]) -> AppResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Announcement::find()
            .filter(announcement::Column::Id.is_in(ids.to_vec()))
            .select_only()
            .column(announcement::Column::Shop)
            .distinct()
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // === helpers ===

    /// Load all owned children of one announcement. No child-announcement
    /// nesting.
    async fn load_shallow<C: ConnectionTrait>(
        conn: &C,
        model: announcement::Model,
    ) -> AppResult<AnnouncementWithRelations> {
        let text_models = AnnouncementText::find()
            .filter(announcement_text::Column::AnnouncementId.eq(model.id))
            .order_by(announcement_text::Column::Id, Order::Asc)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut ctas_by_text: HashMap<i64, Vec<call_to_action::Model>> = HashMap::new();
        if !text_models.is_empty() {
            let text_ids: Vec<i64> = text_models.iter().map(|t| t.id).collect();
            let ctas = CallToAction::find()
                .filter(call_to_action::Column::TextId.is_in(text_ids))
                .order_by(call_to_action::Column::Id, Order::Asc)
                .all(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            for cta in ctas {
                ctas_by_text.entry(cta.text_id).or_default().push(cta);
            }
        }

        let texts = text_models
            .into_iter()
            .map(|text| {
                let ctas = ctas_by_text.remove(&text.id).unwrap_or_default();
                TextWithCtas { text, ctas }
            })
            .collect();

        let bg = Background::find()
            .filter(background::Column::AnnouncementId.eq(model.id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let forms = SignupForm::find()
            .filter(signup_form::Column::AnnouncementId.eq(model.id))
            .order_by(signup_form::Column::Id, Order::Asc)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let countdown = CountdownSettings::find()
            .filter(countdown_settings::Column::AnnouncementId.eq(model.id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let links = AnnouncementPagePattern::find()
            .filter(announcement_page_pattern::Column::AnnouncementId.eq(model.id))
            .find_also_related(PagePattern)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut patterns: Vec<String> = Vec::with_capacity(links.len());
        for (link, pattern) in links {
            match pattern {
                Some(p) => {
                    if !patterns.contains(&p.pattern) {
                        patterns.push(p.pattern);
                    }
                }
                None => {
                    // Malformed link rows are excluded, never fatal
                    warn!(
                        announcement_id = model.id,
                        link_id = link.id,
                        "page pattern link has no resolvable pattern row"
                    );
                }
            }
        }

        Ok(AnnouncementWithRelations {
            announcement: model,
            texts,
            background: bg,
            forms,
            countdown,
            patterns,
            child: None,
        })
    }

    /// Load children plus one level of child-announcement nesting.
    async fn load_full<C: ConnectionTrait>(
        conn: &C,
        model: announcement::Model,
    ) -> AppResult<AnnouncementWithRelations> {
        let child_id = model.child_announcement_id;
        let mut with = Self::load_shallow(conn, model).await?;

        if let Some(child_id) = child_id {
            let child = Announcement::find_by_id(child_id)
                .one(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            match child {
                Some(child_model) => {
                    with.child = Some(Box::new(Self::load_shallow(conn, child_model).await?));
                }
                None => {
                    warn!(
                        announcement_id = with.announcement.id,
                        child_announcement_id = child_id,
                        "child announcement reference is dangling"
                    );
                }
            }
        }

        Ok(with)
    }

    /// Insert all children for one announcement.
    async fn insert_children<C: ConnectionTrait>(
        conn: &C,
        announcement_id: i64,
        texts: &[NewText],
        bg: Option<&NewBackground>,
        forms: &[NewForm],
        countdown: Option<&NewCountdown>,
        patterns: &[String],
    ) -> AppResult<()> {
        for text in texts {
            let text_model = announcement_text::ActiveModel {
                announcement_id: Set(announcement_id),
                content: Set(text.content.clone()),
                text_color: Set(text.text_color.clone()),
                font_size: Set(text.font_size),
                font_family: Set(text.font_family.clone()),
                custom_font_url: Set(text.custom_font_url.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            for cta in &text.ctas {
                call_to_action::ActiveModel {
                    text_id: Set(text_model.id),
                    kind: Set(cta.kind.clone()),
                    label: Set(cta.label.clone()),
                    url: Set(cta.url.clone()),
                    text_color: Set(cta.text_color.clone()),
                    background_color: Set(cta.background_color.clone()),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            }
        }

        if let Some(bg) = bg {
            background::ActiveModel {
                announcement_id: Set(announcement_id),
                kind: Set(bg.kind.clone()),
                color1: Set(bg.color1.clone()),
                color2: Set(bg.color2.clone()),
                image_url: Set(bg.image_url.clone()),
                padding: Set(bg.padding),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        for form in forms {
            signup_form::ActiveModel {
                announcement_id: Set(announcement_id),
                placeholder: Set(form.placeholder.clone()),
                button_label: Set(form.button_label.clone()),
                destination_email: Set(form.destination_email.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if let Some(cd) = countdown {
            countdown_settings::ActiveModel {
                announcement_id: Set(announcement_id),
                timer_kind: Set(cd.timer_kind.clone()),
                ends_at: Set(cd.ends_at),
                duration_days: Set(cd.duration_days),
                duration_hours: Set(cd.duration_hours),
                duration_minutes: Set(cd.duration_minutes),
                duration_seconds: Set(cd.duration_seconds),
                after_end: Set(cd.after_end.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let mut seen: Vec<&str> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if seen.contains(&pattern.as_str()) {
                continue;
            }
            seen.push(pattern.as_str());

            let pattern_model = page_pattern::find_or_create(conn, pattern).await?;
            announcement_page_pattern::ActiveModel {
                announcement_id: Set(announcement_id),
                pattern_id: Set(pattern_model.id),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        Ok(())
    }

    /// Delete every child row of the given announcements.
    ///
    /// Order respects foreign keys: pattern links, CTAs, texts, background,
    /// forms, countdown settings. Atomicity comes from the surrounding
    /// transaction, not from this ordering.
    async fn delete_children<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> AppResult<()> {
        AnnouncementPagePattern::delete_many()
            .filter(announcement_page_pattern::Column::AnnouncementId.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let text_ids: Vec<i64> = AnnouncementText::find()
            .filter(announcement_text::Column::AnnouncementId.is_in(ids.to_vec()))
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if !text_ids.is_empty() {
            CallToAction::delete_many()
                .filter(call_to_action::Column::TextId.is_in(text_ids))
                .exec(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        AnnouncementText::delete_many()
            .filter(announcement_text::Column::AnnouncementId.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Background::delete_many()
            .filter(background::Column::AnnouncementId.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        SignupForm::delete_many()
            .filter(signup_form::Column::AnnouncementId.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        CountdownSettings::delete_many()
            .filter(countdown_settings::Column::AnnouncementId.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_announcement(id: i64, shop: &str, title: &str) -> announcement::Model {
        announcement::Model {
            id,
            shop: shop.to_string(),
            title: title.to_string(),
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
    fn test_list_tab_parse() {
        assert_eq!(ListTab::parse("all"), Some(ListTab::All));
        assert_eq!(ListTab::parse("active"), Some(ListTab::Active));
        assert_eq!(ListTab::parse("ended"), Some(ListTab::Ended));
        assert_eq!(ListTab::parse("draft"), Some(ListTab::Draft));
        assert_eq!(ListTab::parse("paused"), Some(ListTab::Paused));
        assert_eq!(ListTab::parse("published"), Some(ListTab::Published));
        assert_eq!(ListTab::parse("bogus"), None);
    }

    #[test]
    fn test_date_sort_parse() {
        assert_eq!(DateSort::parse("date asc"), Some(DateSort::Asc));
        assert_eq!(DateSort::parse("date desc"), Some(DateSort::Desc));
        assert_eq!(DateSort::parse("title asc"), None);
        assert_eq!(DateSort::default(), DateSort::Desc);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<announcement::Model>::new()])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let result = repo.find_by_id_with_relations(99).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_loads_texts_and_ctas() {
        let ann = test_announcement(1, "shop.example.com", "Summer sale");
        let text = announcement_text::Model {
            id: 10,
            announcement_id: 1,
            content: "20% off everything".to_string(),
            text_color: "#ffffff".to_string(),
            font_size: 14,
            font_family: None,
            custom_font_url: None,
        };
        let cta = call_to_action::Model {
            id: 100,
            text_id: 10,
            kind: "button".to_string(),
            label: "Shop now".to_string(),
            url: "/collections/sale".to_string(),
            text_color: None,
            background_color: None,
        };
        let bg = background::Model {
            id: 20,
            announcement_id: 1,
            kind: "solid".to_string(),
            color1: "#000000".to_string(),
            color2: None,
            image_url: None,
            padding: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[ann]])
                .append_query_results([[text]])
                .append_query_results([[cta]])
                .append_query_results([[bg]])
                .append_query_results([Vec::<signup_form::Model>::new()])
                .append_query_results([Vec::<countdown_settings::Model>::new()])
                .append_query_results([Vec::<announcement_page_pattern::Model>::new()])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let result = repo.find_by_id_with_relations(1).await.unwrap().unwrap();

        assert_eq!(result.announcement.title, "Summer sale");
        assert_eq!(result.texts.len(), 1);
        assert_eq!(result.texts[0].ctas.len(), 1);
        assert_eq!(result.texts[0].ctas[0].label, "Shop now");
        assert!(result.background.is_some());
        assert!(result.countdown.is_none());
        assert!(result.patterns.is_empty());
        assert!(result.child.is_none());
    }

    #[tokio::test]
    async fn test_bulk_set_status_returns_touched_pairs() {
        let a = test_announcement(1, "shop-x.example.com", "A");
        let b = test_announcement(2, "shop-y.example.com", "B");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a, b]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let pairs = repo.bulk_set_status(&[1, 2], "paused").await.unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (1, "shop-x.example.com".to_string()));
        assert_eq!(pairs[1], (2, "shop-y.example.com".to_string()));
    }

    #[tokio::test]
    async fn test_bulk_delete_empty_ids_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = AnnouncementRepository::new(db);
        let pairs = repo.bulk_delete(&[]).await.unwrap();

        assert!(pairs.is_empty());
    }
}
