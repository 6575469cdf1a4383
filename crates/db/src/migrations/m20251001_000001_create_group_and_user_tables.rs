//! Create `fb_user`, `group`, and `fb_user_group` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FbUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FbUser::Id)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FbUser::Name).string_len(50).not_null())
                    .col(ColumnDef::new(FbUser::Picture).string_len(2083))
                    .col(
                        ColumnDef::new(FbUser::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Group::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Group::Id)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Group::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Group::Description).text())
                    .col(
                        ColumnDef::new(Group::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Group::Privacy).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Group::IsStored)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Group::PostCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Group::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Group::OwnerId).string_len(20))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_owner")
                            .from(Group::Table, Group::OwnerId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_owner_id")
                    .table(Group::Table)
                    .col(Group::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FbUserGroup::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FbUserGroup::UserId).string_len(20).not_null())
                    .col(ColumnDef::new(FbUserGroup::GroupId).string_len(20).not_null())
                    .primary_key(
                        Index::create()
                            .col(FbUserGroup::UserId)
                            .col(FbUserGroup::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fb_user_group_user")
                            .from(FbUserGroup::Table, FbUserGroup::UserId)
                            .to(FbUser::Table, FbUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fb_user_group_group")
                            .from(FbUserGroup::Table, FbUserGroup::GroupId)
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: group_id (for listing members)
        manager
            .create_index(
                Index::create()
                    .name("idx_fb_user_group_group_id")
                    .table(FbUserGroup::Table)
                    .col(FbUserGroup::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FbUserGroup::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Group::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FbUser::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FbUser {
    Table,
    Id,
    Name,
    Picture,
    UpdatedTime,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
    Name,
    Description,
    UpdatedTime,
    Privacy,
    IsStored,
    PostCount,
    CommentCount,
    OwnerId,
}

#[derive(Iden)]
enum FbUserGroup {
    Table,
    UserId,
    GroupId,
}
