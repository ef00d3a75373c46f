//! Service layer.

pub mod announcement;
pub mod distribution;

pub use announcement::{
    AnnouncementListPage, AnnouncementService, BackgroundInput, BulkAction, BulkOutcome,
    CountdownInput, CreateAnnouncementInput, CtaInput, FormInput, TextInput,
};
pub use distribution::{DistributionStore, MemoryDistributionStore, RedisDistributionStore};
