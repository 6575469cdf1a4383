//! Create `group_statistics_update_list` and the memoized statistics tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Memo tables whose `time` column is a bucket start timestamp.
const TIMESTAMP_BUCKET_TABLES: [&str; 3] = [
    "year_group_statistics",
    "month_group_statistics",
    "day_group_statistics",
];

/// Memo table whose `time` column is an hour of day.
const TIME_OVERVIEW_TABLE: &str = "time_overview_group_statistics";

fn memo_table(name: &str, hour_bucket: bool) -> TableCreateStatement {
    let table = Alias::new(name);
    let mut time = ColumnDef::new(MemoColumn::Time);
    if hour_bucket {
        time.integer().not_null().default(0);
    } else {
        time.timestamp_with_time_zone().not_null();
    }

    Table::create()
        .table(table.clone())
        .if_not_exists()
        .col(
            ColumnDef::new(MemoColumn::Id)
                .string_len(32)
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(MemoColumn::GroupId).string_len(20).not_null())
        .col(&mut time)
        .col(ColumnDef::new(MemoColumn::Model).string_len(10).not_null())
        .col(
            ColumnDef::new(MemoColumn::Count)
                .integer()
                .not_null()
                .default(0),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_group"))
                .from(table, MemoColumn::GroupId)
                .to(Group::Table, Group::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn memo_key_index(name: &str) -> IndexCreateStatement {
    Index::create()
        .name(format!("idx_{name}_group_time_model"))
        .table(Alias::new(name))
        .col(MemoColumn::GroupId)
        .col(MemoColumn::Time)
        .col(MemoColumn::Model)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GroupStatisticsUpdateList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupStatisticsUpdateList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupStatisticsUpdateList::GroupId)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupStatisticsUpdateList::Method)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupStatisticsUpdateList::UpdatedTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_statistics_update_list_group")
                            .from(
                                GroupStatisticsUpdateList::Table,
                                GroupStatisticsUpdateList::GroupId,
                            )
                            .to(Group::Table, Group::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (group_id, method) is the gate key
        manager
            .create_index(
                Index::create()
                    .name("idx_group_statistics_update_list_group_method")
                    .table(GroupStatisticsUpdateList::Table)
                    .col(GroupStatisticsUpdateList::GroupId)
                    .col(GroupStatisticsUpdateList::Method)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for name in TIMESTAMP_BUCKET_TABLES {
            manager.create_table(memo_table(name, false)).await?;
            manager.create_index(memo_key_index(name)).await?;
        }

        manager
            .create_table(memo_table(TIME_OVERVIEW_TABLE, true))
            .await?;
        manager
            .create_index(memo_key_index(TIME_OVERVIEW_TABLE))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new(TIME_OVERVIEW_TABLE)).to_owned())
            .await?;
        for name in TIMESTAMP_BUCKET_TABLES.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*name)).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(GroupStatisticsUpdateList::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GroupStatisticsUpdateList {
    Table,
    Id,
    GroupId,
    Method,
    UpdatedTime,
}

/// Columns shared by every memo table.
#[derive(Iden)]
enum MemoColumn {
    Id,
    GroupId,
    Time,
    Model,
    Count,
}

#[derive(Iden)]
enum Group {
    Table,
    Id,
}
