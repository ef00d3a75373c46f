//! Create `background`, `signup_form`, and `countdown_settings` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create background table
        manager
            .create_table(
                Table::create()
                    .table(Background::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Background::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Background::AnnouncementId).big_integer().not_null())
                    .col(ColumnDef::new(Background::Kind).string_len(16).not_null().default("solid"))
                    .col(ColumnDef::new(Background::Color1).string_len(32).not_null())
                    .col(ColumnDef::new(Background::Color2).string_len(32))
                    .col(ColumnDef::new(Background::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Background::Padding).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_background_announcement")
                            .from(Background::Table, Background::AnnouncementId)
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: announcement_id (1:1)
        manager
            .create_index(
                Index::create()
                    .name("idx_background_announcement_id")
                    .table(Background::Table)
                    .col(Background::AnnouncementId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create signup_form table
        manager
            .create_table(
                Table::create()
                    .table(SignupForm::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SignupForm::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SignupForm::AnnouncementId).big_integer().not_null())
                    .col(ColumnDef::new(SignupForm::Placeholder).string_len(256).not_null())
                    .col(ColumnDef::new(SignupForm::ButtonLabel).string_len(256).not_null())
                    .col(ColumnDef::new(SignupForm::DestinationEmail).string_len(256))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_signup_form_announcement")
                            .from(SignupForm::Table, SignupForm::AnnouncementId)
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: announcement_id
        manager
            .create_index(
                Index::create()
                    .name("idx_signup_form_announcement_id")
                    .table(SignupForm::Table)
                    .col(SignupForm::AnnouncementId)
                    .to_owned(),
            )
            .await?;

        // Create countdown_settings table
        manager
            .create_table(
                Table::create()
                    .table(CountdownSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CountdownSettings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CountdownSettings::AnnouncementId).big_integer().not_null())
                    .col(ColumnDef::new(CountdownSettings::TimerKind).string_len(16).not_null().default("to_date"))
                    .col(ColumnDef::new(CountdownSettings::EndsAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CountdownSettings::DurationDays).integer().not_null().default(0))
                    .col(ColumnDef::new(CountdownSettings::DurationHours).integer().not_null().default(0))
                    .col(ColumnDef::new(CountdownSettings::DurationMinutes).integer().not_null().default(0))
                    .col(ColumnDef::new(CountdownSettings::DurationSeconds).integer().not_null().default(0))
                    .col(ColumnDef::new(CountdownSettings::AfterEnd).string_len(16).not_null().default("hide"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_countdown_settings_announcement")
                            .from(CountdownSettings::Table, CountdownSettings::AnnouncementId)
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: announcement_id (1:1)
        manager
            .create_index(
                Index::create()
                    .name("idx_countdown_settings_announcement_id")
                    .table(CountdownSettings::Table)
                    .col(CountdownSettings::AnnouncementId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CountdownSettings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SignupForm::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Background::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
}

#[derive(Iden)]
enum Background {
    Table,
    Id,
    AnnouncementId,
    Kind,
    Color1,
    Color2,
    ImageUrl,
    Padding,
}

#[derive(Iden)]
enum SignupForm {
    Table,
    Id,
    AnnouncementId,
    Placeholder,
    ButtonLabel,
    DestinationEmail,
}

#[derive(Iden)]
enum CountdownSettings {
    Table,
    Id,
    AnnouncementId,
    TimerKind,
    EndsAt,
    DurationDays,
    DurationHours,
    DurationMinutes,
    DurationSeconds,
    AfterEnd,
}
