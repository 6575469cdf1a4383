//! Tombstones of deleted posts and comments.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::{DeletedComment, DeletedPost, comment, deleted_comment, deleted_post, post};

/// Repository for deleted post and comment snapshots.
#[derive(Clone)]
pub struct TombstoneRepository {
    db: Arc<DatabaseConnection>,
}

impl TombstoneRepository {
    /// Create a new tombstone repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Snapshot a post. An existing tombstone for the same post is kept.
    pub async fn insert_post(&self, post: &post::Model) -> AppResult<()> {
        self.insert_post_with(self.db.as_ref(), post).await
    }

    /// [`Self::insert_post`] on the given connection or transaction.
    pub async fn insert_post_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        post: &post::Model,
    ) -> AppResult<()> {
        DeletedPost::insert(deleted_post::ActiveModel::from_post(post))
            .on_conflict(
                OnConflict::column(deleted_post::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Snapshot a comment. An existing tombstone for the same comment is kept.
    pub async fn insert_comment(&self, comment: &comment::Model) -> AppResult<()> {
        self.insert_comment_with(self.db.as_ref(), comment).await
    }

    /// [`Self::insert_comment`] on the given connection or transaction.
    pub async fn insert_comment_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        comment: &comment::Model,
    ) -> AppResult<()> {
        DeletedComment::insert(deleted_comment::ActiveModel::from_comment(comment))
            .on_conflict(
                OnConflict::column(deleted_comment::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Find the tombstone of a post.
    pub async fn find_post(&self, id: &str) -> AppResult<Option<deleted_post::Model>> {
        DeletedPost::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the tombstone of a comment.
    pub async fn find_comment(&self, id: &str) -> AppResult<Option<deleted_comment::Model>> {
        DeletedComment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Deleted posts of a group, newest first.
    pub async fn find_posts_by_group(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<deleted_post::Model>> {
        DeletedPost::find()
            .filter(deleted_post::Column::GroupId.eq(group_id))
            .order_by_desc(deleted_post::Column::CreatedTime)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Deleted comments of a group, newest first.
    pub async fn find_comments_by_group(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<deleted_comment::Model>> {
        DeletedComment::find()
            .filter(deleted_comment::Column::GroupId.eq(group_id))
            .order_by_desc(deleted_comment::Column::CreatedTime)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
