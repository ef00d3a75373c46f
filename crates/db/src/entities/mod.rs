//! Database entities.

#![allow(missing_docs)]

pub mod announcement;
pub mod announcement_page_pattern;
pub mod announcement_text;
pub mod background;
pub mod call_to_action;
pub mod countdown_settings;
pub mod page_pattern;
pub mod signup_form;

pub use announcement::Entity as Announcement;
pub use announcement_page_pattern::Entity as AnnouncementPagePattern;
pub use announcement_text::Entity as AnnouncementText;
pub use background::Entity as Background;
pub use call_to_action::Entity as CallToAction;
pub use countdown_settings::Entity as CountdownSettings;
pub use page_pattern::Entity as PagePattern;
pub use signup_form::Entity as SignupForm;
