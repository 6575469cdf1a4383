//! Comment repository.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{Comment, comment};

/// Repository for comment operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get comment by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a comment or refresh the mutable fields of an archived one.
    pub async fn upsert(&self, model: comment::ActiveModel) -> AppResult<()> {
        Comment::insert(model)
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([
                        comment::Column::Message,
                        comment::Column::LikeCount,
                        comment::Column::CommentCount,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment. Replies are removed with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.delete_with(self.db.as_ref(), id).await
    }

    /// Delete a comment on the given connection or transaction.
    pub async fn delete_with<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// IDs of every comment under a post, replies included, hidden or not.
    pub async fn find_ids_by_post_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: &str,
    ) -> AppResult<Vec<String>> {
        let comments = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(comments.into_iter().map(|c| c.id).collect())
    }

    /// IDs of every reply below a comment, at any depth.
    pub async fn find_descendant_ids_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        comment_id: &str,
    ) -> AppResult<Vec<String>> {
        let mut descendants = Vec::new();
        let mut level = vec![comment_id.to_string()];

        while !level.is_empty() {
            let replies = Comment::find()
                .filter(comment::Column::ParentId.is_in(level))
                .all(conn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            level = replies.into_iter().map(|c| c.id).collect();
            descendants.extend(level.iter().cloned());
        }

        Ok(descendants)
    }

    /// Show or hide a comment.
    pub async fn set_visibility(&self, id: &str, is_show: bool) -> AppResult<()> {
        Comment::update_many()
            .col_expr(comment::Column::IsShow, Expr::value(is_show))
            .filter(comment::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Top-level comments of a post, oldest first.
    pub async fn find_by_post(&self, post_id: &str, limit: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::ParentId.is_null())
            .filter(comment::Column::IsShow.eq(true))
            .order_by_asc(comment::Column::CreatedTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replies to a comment, oldest first.
    pub async fn find_replies(&self, parent_id: &str, limit: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentId.eq(parent_id))
            .filter(comment::Column::IsShow.eq(true))
            .order_by_asc(comment::Column::CreatedTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments of a group, newest first.
    pub async fn find_by_group(&self, group_id: &str, limit: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::GroupId.eq(group_id))
            .filter(comment::Column::IsShow.eq(true))
            .order_by_desc(comment::Column::CreatedTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments in a group.
    pub async fn count_by_group(&self, group_id: &str) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: &str, parent_id: Option<&str>) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            parent_id: parent_id.map(str::to_string),
            group_id: "g1".to_string(),
            created_time: Utc::now().into(),
            message: Some("nice".to_string()),
            like_count: 0,
            comment_count: 0,
            is_show: true,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_by_id("c404").await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_descendant_ids_walks_every_level() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    create_test_comment("c2", Some("c1")),
                    create_test_comment("c3", Some("c1")),
                ]])
                .append_query_results([vec![create_test_comment("c4", Some("c2"))]])
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(Arc::clone(&db));
        let ids = repo
            .find_descendant_ids_with(db.as_ref(), "c1")
            .await
            .unwrap();
        drop(repo);

        assert_eq!(ids, vec!["c2", "c3", "c4"]);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 3);
        assert!(log[1].statements()[0].sql.contains("\"comment\".\"parent_id\" IN"));
    }

    #[tokio::test]
    async fn test_find_replies() {
        let replies = vec![
            create_test_comment("c2", Some("c1")),
            create_test_comment("c3", Some("c1")),
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([replies])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_replies("c1", 50).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(comment::Model::is_reply));
    }

    #[tokio::test]
    async fn test_find_by_post_only_top_level() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_comment("c1", None)]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db.clone());
        let result = repo.find_by_post("p1", 50).await.unwrap();
        drop(repo);

        assert_eq!(result.len(), 1);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(
            log[0].statements()[0]
                .sql
                .contains("\"comment\".\"parent_id\" IS NULL")
        );
    }
}
