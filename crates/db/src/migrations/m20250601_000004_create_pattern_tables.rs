//! Create `page_pattern` and `announcement_page_pattern` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create page_pattern table
        manager
            .create_table(
                Table::create()
                    .table(PagePattern::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PagePattern::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PagePattern::Pattern).string_len(512).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique index: pattern (patterns are shared/deduplicated)
        manager
            .create_index(
                Index::create()
                    .name("idx_page_pattern_pattern")
                    .table(PagePattern::Table)
                    .col(PagePattern::Pattern)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create announcement_page_pattern link table
        manager
            .create_table(
                Table::create()
                    .table(AnnouncementPagePattern::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnnouncementPagePattern::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnnouncementPagePattern::AnnouncementId).big_integer().not_null())
                    .col(ColumnDef::new(AnnouncementPagePattern::PatternId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_page_pattern_announcement")
                            .from(
                                AnnouncementPagePattern::Table,
                                AnnouncementPagePattern::AnnouncementId,
                            )
                            .to(Announcement::Table, Announcement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_page_pattern_pattern")
                            .from(
                                AnnouncementPagePattern::Table,
                                AnnouncementPagePattern::PatternId,
                            )
                            .to(PagePattern::Table, PagePattern::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (announcement_id, pattern_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_page_pattern_unique")
                    .table(AnnouncementPagePattern::Table)
                    .col(AnnouncementPagePattern::AnnouncementId)
                    .col(AnnouncementPagePattern::PatternId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: pattern_id
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_page_pattern_pattern_id")
                    .table(AnnouncementPagePattern::Table)
                    .col(AnnouncementPagePattern::PatternId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AnnouncementPagePattern::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PagePattern::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
}

#[derive(Iden)]
enum PagePattern {
    Table,
    Id,
    Pattern,
}

#[derive(Iden)]
enum AnnouncementPagePattern {
    Table,
    Id,
    AnnouncementId,
    PatternId,
}
