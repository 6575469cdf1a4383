//! Moderation repository for blacklists and reports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, prelude::DateTimeWithTimeZone,
};

use crate::entities::{
    Blacklist, ContentRef, Report, blacklist,
    report::{self, ReportStatus},
};

/// Moderation repository for database operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Blacklist ==========

    /// Count one more spam strike for a user in a group.
    pub async fn add_to_blacklist(
        &self,
        group_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let model = blacklist::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            user_id: Set(user_id.to_string()),
            count: Set(1),
            updated_time: Set(now.into()),
        };

        Blacklist::insert(model)
            .on_conflict(
                OnConflict::columns([blacklist::Column::GroupId, blacklist::Column::UserId])
                    .value(
                        blacklist::Column::Count,
                        Expr::col((Blacklist, blacklist::Column::Count)).add(1),
                    )
                    .update_column(blacklist::Column::UpdatedTime)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(group_id, user_id, "Blacklist strike recorded");
        Ok(())
    }

    /// Find the blacklist entry of a user in a group.
    pub async fn find_blacklist(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> AppResult<Option<blacklist::Model>> {
        Blacklist::find()
            .filter(blacklist::Column::GroupId.eq(group_id))
            .filter(blacklist::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Remove a user from a group's blacklist.
    pub async fn remove_from_blacklist(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        Blacklist::delete_many()
            .filter(blacklist::Column::GroupId.eq(group_id))
            .filter(blacklist::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Blacklist of a group, worst offenders first.
    pub async fn list_blacklist(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<blacklist::Model>> {
        Blacklist::find()
            .filter(blacklist::Column::GroupId.eq(group_id))
            .order_by_desc(blacklist::Column::Count)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Reports ==========

    /// Create a report against a post or comment.
    pub async fn create_report(
        &self,
        target: ContentRef,
        group_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<report::Model> {
        let (target_type, target_id) = target.into_parts();
        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            target_type: Set(target_type),
            target_id: Set(target_id),
            group_id: Set(group_id.to_string()),
            user_id: Set(user_id.to_string()),
            status: Set(ReportStatus::New),
            updated_time: Set(now.into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: &str) -> AppResult<report::Model> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Reports of a group with the given status, most recent first.
    pub async fn find_reports_by_status(
        &self,
        group_id: &str,
        status: ReportStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::GroupId.eq(group_id))
            .filter(report::Column::Status.eq(status))
            .order_by_desc(report::Column::UpdatedTime)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count open reports in a group.
    pub async fn count_new_reports(&self, group_id: &str) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::GroupId.eq(group_id))
            .filter(report::Column::Status.eq(ReportStatus::New))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Change the status of a report.
    pub async fn set_report_status(
        &self,
        id: &str,
        status: ReportStatus,
        now: DateTime<Utc>,
    ) -> AppResult<report::Model> {
        let report = self.get_report(id).await?;
        let mut active: report::ActiveModel = report.into();
        active.status = Set(status);
        active.updated_time = Set(now.into());

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve every open report against `target` on the given connection.
    pub async fn resolve_reports_for_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        target: &ContentRef,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let updated_time: DateTimeWithTimeZone = now.into();
        let result = Report::update_many()
            .col_expr(report::Column::Status, Expr::value(ReportStatus::Resolved))
            .col_expr(report::Column::UpdatedTime, Expr::value(updated_time))
            .filter(report::Column::TargetType.eq(target.kind()))
            .filter(report::Column::TargetId.eq(target.id()))
            .filter(report::Column::Status.eq(ReportStatus::New))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::ContentKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_report(id: &str, status: ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            target_type: ContentKind::Post,
            target_id: "p1".to_string(),
            group_id: "g1".to_string(),
            user_id: "u1".to_string(),
            status,
            updated_time: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_to_blacklist_increments_on_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db.clone());
        repo.add_to_blacklist("g1", "spammer", Utc::now())
            .await
            .unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("ON CONFLICT (\"group_id\", \"user_id\") DO UPDATE"));
        assert!(sql.contains("\"blacklist\".\"count\" + "));
    }

    #[tokio::test]
    async fn test_create_report() {
        let report = create_test_report("r1", ReportStatus::New);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let created = repo
            .create_report(ContentRef::Post("p1".to_string()), "g1", "u1", Utc::now())
            .await
            .unwrap();

        assert_eq!(created.status, ReportStatus::New);
        assert_eq!(created.target(), ContentRef::Post("p1".to_string()));
    }

    #[tokio::test]
    async fn test_set_report_status() {
        let report = create_test_report("r1", ReportStatus::New);
        let dismissed = create_test_report("r1", ReportStatus::Dismissed);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report], [dismissed]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let updated = repo
            .set_report_status("r1", ReportStatus::Dismissed, Utc::now())
            .await
            .unwrap();

        assert_eq!(updated.status, ReportStatus::Dismissed);
    }

    #[tokio::test]
    async fn test_get_report_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.get_report("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
