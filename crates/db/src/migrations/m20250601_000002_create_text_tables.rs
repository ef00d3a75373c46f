//! Create `announcement_text` and `call_to_action` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create announcement_text table
        manager
            .create_table(
                Table::create()
                    .table(AnnouncementText::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnnouncementText::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnnouncementText::AnnouncementId).big_integer().not_null())
                    .col(ColumnDef::new(AnnouncementText::Content).text().not_null())
                    .col(ColumnDef::new(AnnouncementText::TextColor).string_len(32).not_null().default("#ffffff"))
                    .col(ColumnDef::new(AnnouncementText::FontSize).integer().not_null().default(14))
                    .col(ColumnDef::new(AnnouncementText::FontFamily).string_len(64))
                    .col(ColumnDef::new(AnnouncementText::CustomFontUrl).string_len(1024))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_text_announcement")
                            .from(AnnouncementText::Table, AnnouncementText::AnnouncementId)
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
                    .name("idx_announcement_text_announcement_id")
                    .table(AnnouncementText::Table)
                    .col(AnnouncementText::AnnouncementId)
                    .to_owned(),
            )
            .await?;

        // Create call_to_action table
        manager
            .create_table(
                Table::create()
                    .table(CallToAction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CallToAction::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CallToAction::TextId).big_integer().not_null())
                    .col(ColumnDef::new(CallToAction::Kind).string_len(16).not_null().default("button"))
                    .col(ColumnDef::new(CallToAction::Label).string_len(256).not_null())
                    .col(ColumnDef::new(CallToAction::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(CallToAction::TextColor).string_len(32))
                    .col(ColumnDef::new(CallToAction::BackgroundColor).string_len(32))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_call_to_action_text")
                            .from(CallToAction::Table, CallToAction::TextId)
                            .to(AnnouncementText::Table, AnnouncementText::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: text_id
        manager
            .create_index(
                Index::create()
                    .name("idx_call_to_action_text_id")
                    .table(CallToAction::Table)
                    .col(CallToAction::TextId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CallToAction::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AnnouncementText::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
}

#[derive(Iden)]
enum AnnouncementText {
    Table,
    Id,
    AnnouncementId,
    Content,
    TextColor,
    FontSize,
    FontFamily,
    CustomFontUrl,
}

#[derive(Iden)]
enum CallToAction {
    Table,
    Id,
    TextId,
    Kind,
    Label,
    Url,
    TextColor,
    BackgroundColor,
}
