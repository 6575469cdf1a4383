//! Archive bookkeeping lists: store progress, archive errors and
//! account interest.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    prelude::DateTimeWithTimeZone,
};

use crate::entities::{
    GroupArchiveErrorList, GroupStoreList, InterestGroupList, group_archive_error_list,
    group_store_list::{self, StoreStatus},
    interest_group_list,
};

/// Repository for the group store, error and interest lists.
#[derive(Clone)]
pub struct GroupListRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl GroupListRepository {
    /// Create a new group list repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Store list ==========

    /// Mark a group as being archived. Restarting resets the end time.
    pub async fn start_store(
        &self,
        group_id: &str,
        query: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let model = group_store_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            start_time: Set(now.into()),
            end_time: Set(None),
            query: Set(query),
            status: Set(StoreStatus::Storing),
        };

        GroupStoreList::insert(model)
            .on_conflict(
                OnConflict::column(group_store_list::Column::GroupId)
                    .update_columns([
                        group_store_list::Column::StartTime,
                        group_store_list::Column::EndTime,
                        group_store_list::Column::Query,
                        group_store_list::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Mark the archive of a group as finished.
    pub async fn finish_store(&self, group_id: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.end_store(group_id, StoreStatus::Stored, now).await
    }

    /// Mark the archive of a group as failed.
    pub async fn fail_store(&self, group_id: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.end_store(group_id, StoreStatus::Failed, now).await
    }

    async fn end_store(
        &self,
        group_id: &str,
        status: StoreStatus,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let end_time: DateTimeWithTimeZone = now.into();
        let result = GroupStoreList::update_many()
            .col_expr(group_store_list::Column::Status, Expr::value(status))
            .col_expr(group_store_list::Column::EndTime, Expr::value(end_time))
            .filter(group_store_list::Column::GroupId.eq(group_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "Store list entry for group {group_id}"
            )));
        }

        Ok(())
    }

    /// Find the store list entry of a group.
    pub async fn find_store(&self, group_id: &str) -> AppResult<Option<group_store_list::Model>> {
        GroupStoreList::find()
            .filter(group_store_list::Column::GroupId.eq(group_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store list entries with the given status, oldest start first.
    pub async fn find_store_by_status(
        &self,
        status: StoreStatus,
    ) -> AppResult<Vec<group_store_list::Model>> {
        GroupStoreList::find()
            .filter(group_store_list::Column::Status.eq(status))
            .order_by_asc(group_store_list::Column::StartTime)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Error list ==========

    /// Record an archive failure. Repeated failures bump `error_count` and
    /// keep the latest query and message.
    pub async fn record_error(
        &self,
        group_id: &str,
        query: Option<String>,
        message: Option<String>,
    ) -> AppResult<()> {
        let model = group_archive_error_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            error_count: Set(1),
            query: Set(query),
            message: Set(message),
        };

        GroupArchiveErrorList::insert(model)
            .on_conflict(
                OnConflict::column(group_archive_error_list::Column::GroupId)
                    .value(
                        group_archive_error_list::Column::ErrorCount,
                        Expr::col((
                            GroupArchiveErrorList,
                            group_archive_error_list::Column::ErrorCount,
                        ))
                        .add(1),
                    )
                    .update_columns([
                        group_archive_error_list::Column::Query,
                        group_archive_error_list::Column::Message,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::warn!(group_id, "Recorded archive error");
        Ok(())
    }

    /// Forget the archive errors of a group.
    pub async fn clear_error(&self, group_id: &str) -> AppResult<()> {
        GroupArchiveErrorList::delete_many()
            .filter(group_archive_error_list::Column::GroupId.eq(group_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Find the error list entry of a group.
    pub async fn find_error(
        &self,
        group_id: &str,
    ) -> AppResult<Option<group_archive_error_list::Model>> {
        GroupArchiveErrorList::find()
            .filter(group_archive_error_list::Column::GroupId.eq(group_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Interest list ==========

    /// Register an account's interest in a group. Registering twice is a
    /// no-op.
    pub async fn add_interest(&self, account_id: &str, group_id: &str) -> AppResult<()> {
        let model = interest_group_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            account_id: Set(account_id.to_string()),
            group_id: Set(group_id.to_string()),
        };

        InterestGroupList::insert(model)
            .on_conflict(
                OnConflict::columns([
                    interest_group_list::Column::AccountId,
                    interest_group_list::Column::GroupId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove an account's interest in a group.
    pub async fn remove_interest(&self, account_id: &str, group_id: &str) -> AppResult<()> {
        InterestGroupList::delete_many()
            .filter(interest_group_list::Column::AccountId.eq(account_id))
            .filter(interest_group_list::Column::GroupId.eq(group_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Groups an account is interested in.
    pub async fn find_interests(
        &self,
        account_id: &str,
    ) -> AppResult<Vec<interest_group_list::Model>> {
        InterestGroupList::find()
            .filter(interest_group_list::Column::AccountId.eq(account_id))
            .order_by_asc(interest_group_list::Column::GroupId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_start_store_resets_on_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = GroupListRepository::new(db.clone());
        repo.start_store("g1", Some("since=2015".to_string()), Utc::now())
            .await
            .unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("ON CONFLICT (\"group_id\") DO UPDATE"));
        assert!(sql.contains("\"end_time\" = \"excluded\".\"end_time\""));
    }

    #[tokio::test]
    async fn test_finish_store_without_entry() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = GroupListRepository::new(db);
        let result = repo.finish_store("g1", Utc::now()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_error_increments() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .into_connection(),
        );

        let repo = GroupListRepository::new(db.clone());
        repo.record_error("g1", None, Some("rate limited".to_string()))
            .await
            .unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("\"group_archive_error_list\".\"error_count\" + "));
        assert!(sql.contains("\"message\" = \"excluded\".\"message\""));
    }

    #[tokio::test]
    async fn test_add_interest_is_idempotent_statement() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(0)])
                .into_connection(),
        );

        let repo = GroupListRepository::new(db);
        repo.add_interest("acc1", "g1").await.unwrap();
        repo.add_interest("acc1", "g1").await.unwrap();
    }
}
