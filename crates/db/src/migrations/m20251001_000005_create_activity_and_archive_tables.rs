//! Create `user_activity`, `group_store_list`, `group_archive_error_list`,
//! and `interest_group_list` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create user_activity table
        manager
            .create_table(
                Table::create()
                    .table(UserActivity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserActivity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserActivity::UserId).string_len(20).not_null())
                    .col(ColumnDef::new(UserActivity::GroupId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(UserActivity::PostCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserActivity::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .check(Expr::col(UserActivity::PostCount).gte(0))
                    .check(Expr::col(UserActivity::CommentCount).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_activity_user")
                            .from(UserActivity::Table, UserActivity::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_activity_group")
                            .from(UserActivity::Table, UserActivity::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, group_id) is the upsert conflict target
        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_user_group")
                    .table(UserActivity::Table)
                    .col(UserActivity::UserId)
                    .col(UserActivity::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_activity_group_id")
                    .table(UserActivity::Table)
                    .col(UserActivity::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create group_store_list table
        manager
            .create_table(
                Table::create()
                    .table(GroupStoreList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupStoreList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupStoreList::GroupId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GroupStoreList::StartTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GroupStoreList::EndTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(GroupStoreList::Query).string_len(2083))
                    .col(
                        ColumnDef::new(GroupStoreList::Status)
                            .string_len(30)
                            .not_null()
                            .default("new"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_store_list_group")
                            .from(GroupStoreList::Table, GroupStoreList::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create group_archive_error_list table
        manager
            .create_table(
                Table::create()
                    .table(GroupArchiveErrorList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupArchiveErrorList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupArchiveErrorList::GroupId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GroupArchiveErrorList::ErrorCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(GroupArchiveErrorList::Query).string_len(2083))
                    .col(ColumnDef::new(GroupArchiveErrorList::Message).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_archive_error_list_group")
                            .from(GroupArchiveErrorList::Table, GroupArchiveErrorList::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create interest_group_list table
        manager
            .create_table(
                Table::create()
                    .table(InterestGroupList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InterestGroupList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InterestGroupList::AccountId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InterestGroupList::GroupId)
                            .string_len(20)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interest_group_list_group")
                            .from(InterestGroupList::Table, InterestGroupList::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_interest_group_list_account_group")
                    .table(InterestGroupList::Table)
                    .col(InterestGroupList::AccountId)
                    .col(InterestGroupList::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InterestGroupList::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupArchiveErrorList::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupStoreList::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserActivity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserActivity {
    Table,
    Id,
    UserId,
    GroupId,
    PostCount,
    CommentCount,
}

#[derive(Iden)]
enum GroupStoreList {
    Table,
    Id,
    GroupId,
    StartTime,
    EndTime,
    Query,
    Status,
}

#[derive(Iden)]
enum GroupArchiveErrorList {
    Table,
    Id,
    GroupId,
    ErrorCount,
    Query,
    Message,
}

#[derive(Iden)]
enum InterestGroupList {
    Table,
    Id,
    AccountId,
    GroupId,
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
