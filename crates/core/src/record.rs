//! Published announcement record shapes.
//!
//! This is the field-preserving wire shape used both for the admin listing
//! and for the grouped distribution published to the edge cache. The
//! merchant's destination email on signup forms is deliberately left out of
//! the published form object.

use bannerline_db::repositories::AnnouncementWithRelations;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call-to-action record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub url: String,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

/// Text block record with its CTAs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub id: i64,
    pub content: String,
    pub text_color: String,
    pub font_size: i32,
    pub font_family: Option<String>,
    pub custom_font_url: Option<String>,
    pub ctas: Vec<CtaRecord>,
}

/// Background record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub color1: String,
    pub color2: Option<String>,
    pub image_url: Option<String>,
    pub padding: Option<i32>,
}

/// Email signup form record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub placeholder: String,
    pub button_label: String,
}

/// Countdown settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownRecord {
    #[serde(rename = "type")]
    pub timer_kind: String,
    pub ends_at: Option<DateTime<Utc>>,
    pub duration_days: i32,
    pub duration_hours: i32,
    pub duration_minutes: i32,
    pub duration_seconds: i32,
    pub after_end: String,
}

/// Full announcement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: String,
    pub is_active: bool,
    pub start_type: String,
    pub start_date: DateTime<Utc>,
    pub end_type: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub texts: Vec<TextRecord>,
    pub background: Option<BackgroundRecord>,
    pub form: Option<FormRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownRecord>,
    /// One level of follow-up announcement nesting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<AnnouncementRecord>>,
    /// Raw target patterns. Grouping input only; not part of the published
    /// record shape.
    #[serde(skip)]
    pub patterns: Vec<String>,
}

impl From<&AnnouncementWithRelations> for AnnouncementRecord {
    fn from(with: &AnnouncementWithRelations) -> Self {
        let a = &with.announcement;

        Self {
            id: a.id,
            kind: a.kind.clone(),
            title: a.title.clone(),
            status: a.status.clone(),
            is_active: a.is_active,
            start_type: a.start_type.clone(),
            start_date: a.start_date,
            end_type: a.end_type.clone(),
            end_date: a.end_date,
            timezone: a.timezone.clone(),
            size: a.size.clone(),
            custom_height: a.custom_height,
            custom_width: a.custom_width,
            show_close_button: a.show_close_button,
            close_button_position: a.close_button_position.clone(),
            close_button_color: a.close_button_color.clone(),
            show_after_delay_seconds: a.show_after_delay_seconds,
            show_after_scroll_percent: a.show_after_scroll_percent,
            stay_closed_hours: a.stay_closed_hours,
            child_announcement_id: a.child_announcement_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
            texts: with
                .texts
                .iter()
                .map(|t| TextRecord {
                    id: t.text.id,
                    content: t.text.content.clone(),
                    text_color: t.text.text_color.clone(),
                    font_size: t.text.font_size,
                    font_family: t.text.font_family.clone(),
                    custom_font_url: t.text.custom_font_url.clone(),
                    ctas: t
                        .ctas
                        .iter()
                        .map(|c| CtaRecord {
                            id: c.id,
                            kind: c.kind.clone(),
                            label: c.label.clone(),
                            url: c.url.clone(),
                            text_color: c.text_color.clone(),
                            background_color: c.background_color.clone(),
                        })
                        .collect(),
                })
                .collect(),
            background: with.background.as_ref().map(|b| BackgroundRecord {
                kind: b.kind.clone(),
                color1: b.color1.clone(),
                color2: b.color2.clone(),
                image_url: b.image_url.clone(),
                padding: b.padding,
            }),
            form: with.forms.first().map(|f| FormRecord {
                placeholder: f.placeholder.clone(),
                button_label: f.button_label.clone(),
            }),
            countdown: with.countdown.as_ref().map(|c| CountdownRecord {
                timer_kind: c.timer_kind.clone(),
                ends_at: c.ends_at,
                duration_days: c.duration_days,
                duration_hours: c.duration_hours,
                duration_minutes: c.duration_minutes,
                duration_seconds: c.duration_seconds,
                after_end: c.after_end.clone(),
            }),
            child: with
                .child
                .as_deref()
                .map(|child| Box::new(Self::from(child))),
            patterns: with.patterns.clone(),
        }
    }
}
