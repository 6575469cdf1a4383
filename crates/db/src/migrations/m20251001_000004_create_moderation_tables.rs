//! Create `blacklist`, `report`, `deleted_post`, `deleted_comment`, and
//! `ward` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create blacklist table
        manager
            .create_table(
                Table::create()
                    .table(Blacklist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blacklist::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blacklist::GroupId).string_len(20).not_null())
                    .col(ColumnDef::new(Blacklist::UserId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Blacklist::Count)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Blacklist::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blacklist_group")
                            .from(Blacklist::Table, Blacklist::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blacklist_user")
                            .from(Blacklist::Table, Blacklist::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one entry per (group, user)
        manager
            .create_index(
                Index::create()
                    .name("idx_blacklist_group_user")
                    .table(Blacklist::Table)
                    .col(Blacklist::GroupId)
                    .col(Blacklist::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create report table
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::TargetType).string_len(10).not_null())
                    .col(ColumnDef::new(Report::TargetId).string_len(50).not_null())
                    .col(ColumnDef::new(Report::GroupId).string_len(20).not_null())
                    .col(ColumnDef::new(Report::UserId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Report::Status)
                            .string_len(30)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Report::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_group")
                            .from(Report::Table, Report::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_user")
                            .from(Report::Table, Report::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_group_status")
                    .table(Report::Table)
                    .col(Report::GroupId)
                    .col(Report::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_target")
                    .table(Report::Table)
                    .col(Report::TargetType)
                    .col(Report::TargetId)
                    .to_owned(),
            )
            .await?;

        // Create deleted_post table
        manager
            .create_table(
                Table::create()
                    .table(DeletedPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeletedPost::Id)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeletedPost::UserId).string_len(20).not_null())
                    .col(ColumnDef::new(DeletedPost::GroupId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(DeletedPost::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedPost::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeletedPost::Message).text())
                    .col(ColumnDef::new(DeletedPost::Picture).string_len(2083))
                    .col(
                        ColumnDef::new(DeletedPost::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeletedPost::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeletedPost::ShareCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deleted_post_user")
                            .from(DeletedPost::Table, DeletedPost::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deleted_post_group")
                            .from(DeletedPost::Table, DeletedPost::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deleted_post_group_id")
                    .table(DeletedPost::Table)
                    .col(DeletedPost::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create deleted_comment table (post_id and parent_id are snapshots,
        // not foreign keys)
        manager
            .create_table(
                Table::create()
                    .table(DeletedComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeletedComment::Id)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeletedComment::UserId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedComment::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeletedComment::Message).text())
                    .col(
                        ColumnDef::new(DeletedComment::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeletedComment::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeletedComment::PostId)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeletedComment::ParentId).string_len(20))
                    .col(
                        ColumnDef::new(DeletedComment::GroupId)
                            .string_len(20)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deleted_comment_user")
                            .from(DeletedComment::Table, DeletedComment::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deleted_comment_group")
                            .from(DeletedComment::Table, DeletedComment::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deleted_comment_group_id")
                    .table(DeletedComment::Table)
                    .col(DeletedComment::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create ward table
        manager
            .create_table(
                Table::create()
                    .table(Ward::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ward::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ward::AccountId).string_len(32).not_null())
                    .col(ColumnDef::new(Ward::GroupId).string_len(20).not_null())
                    .col(ColumnDef::new(Ward::TargetType).string_len(10).not_null())
                    .col(ColumnDef::new(Ward::TargetId).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Ward::CreatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Ward::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ward_group")
                            .from(Ward::Table, Ward::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ward_account_id")
                    .table(Ward::Table)
                    .col(Ward::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ward_target")
                    .table(Ward::Table)
                    .col(Ward::TargetType)
                    .col(Ward::TargetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ward::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeletedComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeletedPost::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blacklist::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Blacklist {
    Table,
    Id,
    GroupId,
    UserId,
    Count,
    UpdatedTime,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    TargetType,
    TargetId,
    GroupId,
    UserId,
    Status,
    UpdatedTime,
}

#[derive(Iden)]
enum DeletedPost {
    Table,
    Id,
    UserId,
    GroupId,
    CreatedTime,
    UpdatedTime,
    Message,
    Picture,
    CommentCount,
    LikeCount,
    ShareCount,
}

#[derive(Iden)]
enum DeletedComment {
    Table,
    Id,
    UserId,
    CreatedTime,
    Message,
    LikeCount,
    CommentCount,
    PostId,
    ParentId,
    GroupId,
}

#[derive(Iden)]
enum Ward {
    Table,
    Id,
    AccountId,
    GroupId,
    TargetType,
    TargetId,
    CreatedTime,
    UpdatedTime,
}

#[derive(Iden)]
enum FbUser {
    Table,
    Id,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
}
