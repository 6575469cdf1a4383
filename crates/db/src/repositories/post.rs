//! Post repository.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::DateTimeWithTimeZone,
};

use crate::entities::{Post, post};

/// Repository for post operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get post by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a post or refresh the mutable fields of an archived one.
    pub async fn upsert(&self, model: post::ActiveModel) -> AppResult<()> {
        Post::insert(model)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::UpdatedTime,
                        post::Column::Message,
                        post::Column::Picture,
                        post::Column::CommentCount,
                        post::Column::LikeCount,
                        post::Column::ShareCount,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.delete_with(self.db.as_ref(), id).await
    }

    /// Delete a post on the given connection or transaction.
    pub async fn delete_with<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Show or hide a post.
    pub async fn set_visibility(&self, id: &str, is_show: bool) -> AppResult<()> {
        Post::update_many()
            .col_expr(post::Column::IsShow, Expr::value(is_show))
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Visible posts of a group, newest first, optionally created before `before`.
    pub async fn find_by_group(
        &self,
        group_id: &str,
        limit: u64,
        before: Option<DateTimeWithTimeZone>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .filter(post::Column::IsShow.eq(true));

        if let Some(before) = before {
            query = query.filter(post::Column::CreatedTime.lt(before));
        }

        query
            .order_by_desc(post::Column::CreatedTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Posts written by a user in a group, newest first.
    pub async fn find_by_user_in_group(
        &self,
        user_id: &str,
        group_id: &str,
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::GroupId.eq(group_id))
            .order_by_desc(post::Column::CreatedTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts in a group.
    pub async fn count_by_group(&self, group_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: &str, hours_ago: i64) -> post::Model {
        let created = Utc::now() - Duration::hours(hours_ago);
        post::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            group_id: "g1".to_string(),
            created_time: created.into(),
            updated_time: created.into(),
            message: Some(format!("post {id}")),
            picture: None,
            comment_count: 0,
            like_count: 0,
            share_count: 0,
            is_show: true,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("p404").await;

        assert!(matches!(result, Err(AppError::PostNotFound(id)) if id == "p404"));
    }

    #[tokio::test]
    async fn test_find_by_group_newest_first() {
        let posts = vec![create_test_post("p2", 1), create_test_post("p1", 5)];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([posts])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        let result = repo.find_by_group("g1", 20, None).await.unwrap();
        drop(repo);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "p2");

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(sql.contains("ORDER BY \"post\".\"created_time\" DESC"));
        assert!(sql.contains("\"post\".\"is_show\" = "));
    }

    #[tokio::test]
    async fn test_set_visibility() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        repo.set_visibility("p1", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        repo.delete("p1").await.unwrap();
    }
}
