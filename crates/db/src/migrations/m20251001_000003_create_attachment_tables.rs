//! Create `media` and `attachment` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Media::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Media::Height).integer())
                    .col(ColumnDef::new(Media::Width).integer())
                    .col(ColumnDef::new(Media::Src).string_len(2083))
                    .to_owned(),
            )
            .await?;

        // The parent is a (parent_type, parent_id) pair pointing at either a
        // post or a comment, so it has no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Attachment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attachment::ParentType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attachment::ParentId)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachment::Url).string_len(2083))
                    .col(ColumnDef::new(Attachment::Title).string_len(255))
                    .col(ColumnDef::new(Attachment::Description).text())
                    .col(ColumnDef::new(Attachment::Type).string_len(30))
                    .col(ColumnDef::new(Attachment::MediaId).string_len(32))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachment_media")
                            .from(Attachment::Table, Attachment::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachment_parent")
                    .table(Attachment::Table)
                    .col(Attachment::ParentType)
                    .col(Attachment::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
    Height,
    Width,
    Src,
}

#[derive(Iden)]
enum Attachment {
    Table,
    Id,
    ParentType,
    ParentId,
    Url,
    Title,
    Description,
    Type,
    MediaId,
}
