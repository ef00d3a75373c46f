//! Create announcement table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcement::Shop).string_len(256).not_null())
                    .col(ColumnDef::new(Announcement::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Announcement::Kind).string_len(32).not_null().default("basic"))
                    .col(ColumnDef::new(Announcement::Status).string_len(16).not_null().default("draft"))
                    .col(ColumnDef::new(Announcement::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Announcement::StartType).string_len(16).not_null().default("now"))
                    .col(ColumnDef::new(Announcement::EndType).string_len(16).not_null().default("until_stop"))
                    .col(ColumnDef::new(Announcement::StartDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Announcement::EndDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Announcement::Timezone).string_len(64).not_null().default("UTC"))
                    .col(ColumnDef::new(Announcement::Size).string_len(16).not_null().default("medium"))
                    .col(ColumnDef::new(Announcement::CustomHeight).integer())
                    .col(ColumnDef::new(Announcement::CustomWidth).integer())
                    .col(ColumnDef::new(Announcement::ShowCloseButton).boolean().not_null().default(true))
                    .col(ColumnDef::new(Announcement::CloseButtonPosition).string_len(16).not_null().default("right"))
                    .col(ColumnDef::new(Announcement::CloseButtonColor).string_len(32))
                    .col(ColumnDef::new(Announcement::ShowAfterDelaySeconds).integer())
                    .col(ColumnDef::new(Announcement::ShowAfterScrollPercent).integer())
                    .col(ColumnDef::new(Announcement::StayClosedHours).integer())
                    .col(ColumnDef::new(Announcement::ChildAnnouncementId).big_integer())
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Announcement::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Composite index: (shop, status, is_active) for the active-set query
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_shop_status_active")
                    .table(Announcement::Table)
                    .col(Announcement::Shop)
                    .col(Announcement::Status)
                    .col(Announcement::IsActive)
                    .to_owned(),
            )
            .await?;

        // Index: (shop, start_date) for admin listing sort
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_shop_start_date")
                    .table(Announcement::Table)
                    .col(Announcement::Shop)
                    .col(Announcement::StartDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    Shop,
    Title,
    Kind,
    Status,
    IsActive,
    StartType,
    EndType,
    StartDate,
    EndDate,
    Timezone,
    Size,
    CustomHeight,
    CustomWidth,
    ShowCloseButton,
    CloseButtonPosition,
    CloseButtonColor,
    ShowAfterDelaySeconds,
    ShowAfterScrollPercent,
    StayClosedHours,
    ChildAnnouncementId,
    CreatedAt,
    UpdatedAt,
}
