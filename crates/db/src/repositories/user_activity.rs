//! Per-(user, group) activity counters.
//!
//! Every counter change is a single `INSERT ... ON CONFLICT DO UPDATE`
//! statement against the `(user_id, group_id)` unique index, so concurrent
//! calls never lose an update and a missing row is created on the fly.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IdenStatic, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{UserActivity, user_activity};

#[derive(Clone, Copy)]
enum Counter {
    Post,
    Comment,
}

impl Counter {
    const fn column(self) -> user_activity::Column {
        match self {
            Self::Post => user_activity::Column::PostCount,
            Self::Comment => user_activity::Column::CommentCount,
        }
    }
}

#[derive(Clone, Copy)]
enum Step {
    Add,
    Sub,
}

/// Repository for user activity counters.
#[derive(Clone)]
pub struct UserActivityRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl UserActivityRepository {
    /// Create a new user activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find the counters of a user in a group.
    pub async fn find(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<Option<user_activity::Model>> {
        UserActivity::find()
            .filter(user_activity::Column::UserId.eq(user_id))
            .filter(user_activity::Column::GroupId.eq(group_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count one more post by the user in the group.
    pub async fn add_post_count(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        self.apply(self.db.as_ref(), user_id, group_id, Counter::Post, Step::Add)
            .await
    }

    /// Count one more comment by the user in the group.
    pub async fn add_comment_count(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        self.apply(self.db.as_ref(), user_id, group_id, Counter::Comment, Step::Add)
            .await
    }

    /// Count one post less, stopping at zero.
    pub async fn sub_post_count(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        self.sub_post_count_with(self.db.as_ref(), user_id, group_id)
            .await
    }

    /// [`Self::sub_post_count`] on the given connection or transaction.
    pub async fn sub_post_count_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<()> {
        self.apply(conn, user_id, group_id, Counter::Post, Step::Sub)
            .await
    }

    /// Count one comment less, stopping at zero.
    pub async fn sub_comment_count(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        self.sub_comment_count_with(self.db.as_ref(), user_id, group_id)
            .await
    }

    /// [`Self::sub_comment_count`] on the given connection or transaction.
    pub async fn sub_comment_count_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        group_id: &str,
    ) -> AppResult<()> {
        self.apply(conn, user_id, group_id, Counter::Comment, Step::Sub)
            .await
    }

    /// Most active posters of a group.
    pub async fn top_posters(
        &self,
        group_id: &str,
        limit: u64,
    ) -> AppResult<Vec<user_activity::Model>> {
        UserActivity::find()
            .filter(user_activity::Column::GroupId.eq(group_id))
            .order_by(user_activity::Column::PostCount, Order::Desc)
            .order_by(user_activity::Column::CommentCount, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn apply<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        group_id: &str,
        counter: Counter,
        step: Step,
    ) -> AppResult<()> {
        let initial = match step {
            Step::Add => 1,
            Step::Sub => 0,
        };
        let (post_count, comment_count) = match counter {
            Counter::Post => (initial, 0),
            Counter::Comment => (0, initial),
        };

        let column = counter.column();
        let update: SimpleExpr = match step {
            Step::Add => Expr::col((UserActivity, column)).add(1),
            Step::Sub => Expr::cust(format!(
                "GREATEST(\"user_activity\".\"{}\" - 1, 0)",
                column.as_str()
            )),
        };

        let model = user_activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            group_id: Set(group_id.to_string()),
            post_count: Set(post_count),
            comment_count: Set(comment_count),
        };

        UserActivity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    user_activity::Column::UserId,
                    user_activity::Column::GroupId,
                ])
                .value(column, update)
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(user_id, group_id, "Updated user activity counter");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn logged_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_add_post_count_is_single_upsert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let repo = UserActivityRepository::new(db.clone());
        repo.add_post_count("u1", "g1").await.unwrap();
        drop(repo);

        let sql = logged_sql(db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with("INSERT INTO \"user_activity\""));
        assert!(sql[0].contains("ON CONFLICT (\"user_id\", \"group_id\") DO UPDATE"));
        assert!(sql[0].contains("\"user_activity\".\"post_count\" + "));
    }

    #[tokio::test]
    async fn test_sub_comment_count_is_floored() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let repo = UserActivityRepository::new(db.clone());
        repo.sub_comment_count("u1", "g1").await.unwrap();
        drop(repo);

        let sql = logged_sql(db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains("GREATEST(\"user_activity\".\"comment_count\" - 1, 0)"));
        assert!(!sql[0].contains("\"post_count\" = "));
    }

    #[tokio::test]
    async fn test_counter_upserts_seed_and_update_the_right_column() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results((0..4).map(|_| exec_ok()))
                .into_connection(),
        );

        let repo = UserActivityRepository::new(db.clone());
        repo.add_post_count("u1", "g1").await.unwrap();
        repo.sub_post_count("u1", "g1").await.unwrap();
        repo.add_comment_count("u1", "g1").await.unwrap();
        repo.sub_comment_count("u1", "g1").await.unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statements: Vec<_> = log.iter().flat_map(|txn| txn.statements().to_vec()).collect();
        assert_eq!(statements.len(), 4);

        // (post_count, comment_count) bound for a row that does not exist yet.
        let seeds = [(1, 0), (0, 0), (0, 1), (0, 0)];
        let updates = [
            "DO UPDATE SET \"post_count\" = \"user_activity\".\"post_count\" + $6",
            "DO UPDATE SET \"post_count\" = GREATEST(\"user_activity\".\"post_count\" - 1, 0)",
            "DO UPDATE SET \"comment_count\" = \"user_activity\".\"comment_count\" + $6",
            "DO UPDATE SET \"comment_count\" = GREATEST(\"user_activity\".\"comment_count\" - 1, 0)",
        ];

        for ((stmt, (post, comment)), update) in statements.iter().zip(seeds).zip(updates) {
            assert!(stmt.sql.ends_with(update), "{}", stmt.sql);

            let values = &stmt.values.as_ref().unwrap().0;
            assert_eq!(values[1], Value::from("u1"));
            assert_eq!(values[2], Value::from("g1"));
            assert_eq!(values[3], Value::Int(Some(post)));
            assert_eq!(values[4], Value::Int(Some(comment)));
        }
    }

    #[tokio::test]
    async fn test_find() {
        let activity = user_activity::Model {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            group_id: "g1".to_string(),
            post_count: 3,
            comment_count: 7,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[activity.clone()]])
                .into_connection(),
        );

        let repo = UserActivityRepository::new(db);
        let found = repo.find("u1", "g1").await.unwrap();

        assert_eq!(found, Some(activity));
    }

    #[tokio::test]
    async fn test_database_error_is_mapped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_errors([sea_orm::DbErr::Custom("boom".to_string())])
                .into_connection(),
        );

        let repo = UserActivityRepository::new(db);
        let result = repo.add_comment_count("u1", "g1").await;

        assert!(matches!(result, Err(AppError::Database(msg)) if msg.contains("boom")));
    }
}
