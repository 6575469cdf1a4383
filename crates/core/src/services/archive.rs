//! Archive status tracking.

use chrono::Utc;
use fbarchive_common::AppResult;
use fbarchive_db::{
    entities::group_store_list::{self, StoreStatus},
    repositories::{GroupListRepository, GroupRepository},
};

/// Archive service for business logic.
#[derive(Clone)]
pub struct ArchiveService {
    list_repo: GroupListRepository,
    group_repo: GroupRepository,
}

impl ArchiveService {
    /// Create a new archive service.
    #[must_use]
    pub const fn new(list_repo: GroupListRepository, group_repo: GroupRepository) -> Self {
        Self {
            list_repo,
            group_repo,
        }
    }

    /// Record that archiving of a group has started.
    pub async fn begin(&self, group_id: &str, query: Option<String>) -> AppResult<()> {
        self.group_repo.get_by_id(group_id).await?;
        self.list_repo
            .start_store(group_id, query, Utc::now())
            .await?;

        tracing::info!(group_id, "Archive started");
        Ok(())
    }

    /// Record a finished archive: the group is marked stored and earlier
    /// errors are forgotten.
    pub async fn complete(&self, group_id: &str) -> AppResult<()> {
        self.list_repo.finish_store(group_id, Utc::now()).await?;
        self.group_repo.set_stored(group_id, true).await?;
        self.list_repo.clear_error(group_id).await?;

        tracing::info!(group_id, "Archive completed");
        Ok(())
    }

    /// Record a failed archive attempt.
    pub async fn fail(
        &self,
        group_id: &str,
        query: Option<String>,
        message: impl Into<String>,
    ) -> AppResult<()> {
        let message = message.into();
        self.list_repo.fail_store(group_id, Utc::now()).await?;
        self.list_repo
            .record_error(group_id, query, Some(message.clone()))
            .await?;

        tracing::warn!(group_id, %message, "Archive failed");
        Ok(())
    }

    /// Current store list status of a group, if it was ever queued.
    pub async fn status(&self, group_id: &str) -> AppResult<Option<StoreStatus>> {
        Ok(self
            .list_repo
            .find_store(group_id)
            .await?
            .map(|entry| entry.status))
    }

    /// Archives currently running.
    pub async fn in_progress(&self) -> AppResult<Vec<group_store_list::Model>> {
        self.list_repo
            .find_store_by_status(StoreStatus::Storing)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fbarchive_common::AppError;
    use fbarchive_db::entities::{group, group::GroupPrivacy};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_group(is_stored: bool) -> group::Model {
        group::Model {
            id: "g1".to_string(),
            name: "Rust Korea".to_string(),
            description: None,
            updated_time: Utc::now().into(),
            privacy: GroupPrivacy::Open,
            is_stored,
            post_count: 0,
            comment_count: 0,
            owner_id: None,
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> ArchiveService {
        ArchiveService::new(
            GroupListRepository::new(Arc::clone(db)),
            GroupRepository::new(Arc::clone(db)),
        )
    }

    #[tokio::test]
    async fn test_begin_unknown_group() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<group::Model>::new()])
                .into_connection(),
        );

        let result = service(&db).begin("g404", None).await;
        assert!(matches!(result, Err(AppError::GroupNotFound(_))));
    }

    #[tokio::test]
    async fn test_complete_marks_group_stored() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_group(false)], [create_test_group(true)]])
                .append_exec_results([exec(1), exec(1), exec(1)])
                .into_connection(),
        );

        service(&db).complete("g1").await.unwrap();

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql: Vec<_> = log
            .iter()
            .map(|txn| txn.statements()[0].sql.clone())
            .collect();
        assert!(sql[0].starts_with("UPDATE \"group_store_list\""));
        assert!(sql.iter().any(|s| s.starts_with("UPDATE \"group\"")));
        assert!(
            sql.last()
                .unwrap()
                .starts_with("DELETE FROM \"group_archive_error_list\"")
        );
    }

    #[tokio::test]
    async fn test_fail_records_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        service(&db)
            .fail("g1", Some("until=2015".to_string()), "token expired")
            .await
            .unwrap();

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(
            log[1].statements()[0]
                .sql
                .starts_with("INSERT INTO \"group_archive_error_list\"")
        );
    }
}
