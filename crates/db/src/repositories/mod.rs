//! Repository layer.

pub mod announcement;
pub mod page_pattern;

pub use announcement::{
    AnnouncementRepository, AnnouncementWithRelations, DateSort, ListTab, NewAnnouncement,
    NewBackground, NewCountdown, NewCta, NewForm, NewText, TextWithCtas,
};
pub use page_pattern::PagePatternRepository;
