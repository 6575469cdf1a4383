//! Create the `month_post` and `month_comment` shadow tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonthPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthPost::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonthPost::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthPost::GroupId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(MonthPost::PostId)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_month_post_group")
                            .from(MonthPost::Table, MonthPost::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_month_post_post")
                            .from(MonthPost::Table, MonthPost::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (group_id, created_time) drives the retention sweep
        manager
            .create_index(
                Index::create()
                    .name("idx_month_post_group_created")
                    .table(MonthPost::Table)
                    .col(MonthPost::GroupId)
                    .col(MonthPost::CreatedTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthComment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonthComment::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthComment::GroupId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthComment::CommentId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_month_comment_group")
                            .from(MonthComment::Table, MonthComment::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_month_comment_comment")
                            .from(MonthComment::Table, MonthComment::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_month_comment_group_created")
                    .table(MonthComment::Table)
                    .col(MonthComment::GroupId)
                    .col(MonthComment::CreatedTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthPost::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MonthPost {
    Table,
    Id,
    CreatedTime,
    GroupId,
    PostId,
}

#[derive(Iden)]
enum MonthComment {
    Table,
    Id,
    CreatedTime,
    GroupId,
    CommentId,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}
