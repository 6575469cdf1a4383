//! Recent-activity shadow index.
//!
//! `month_post` and `month_comment` hold one row per post or comment created
//! inside the retention window. Rows are inserted once and purged by the
//! retention sweep.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    prelude::DateTimeWithTimeZone,
};

use crate::entities::{MonthComment, MonthPost, comment, month_comment, month_post, post};

/// Repository for the month shadow tables.
#[derive(Clone)]
pub struct MonthContentRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl MonthContentRepository {
    /// Create a new month content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Shadow a post unless it is already shadowed.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_post_if_absent(&self, post: &post::Model) -> AppResult<bool> {
        let model = month_post::ActiveModel {
            id: Set(self.id_gen.generate()),
            created_time: Set(post.created_time),
            group_id: Set(post.group_id.clone()),
            post_id: Set(post.id.clone()),
        };

        let inserted = MonthPost::insert(model)
            .on_conflict(
                OnConflict::column(month_post::Column::PostId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Shadow a comment unless it is already shadowed.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn insert_comment_if_absent(&self, comment: &comment::Model) -> AppResult<bool> {
        let model = month_comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            created_time: Set(comment.created_time),
            group_id: Set(comment.group_id.clone()),
            comment_id: Set(comment.id.clone()),
        };

        let inserted = MonthComment::insert(model)
            .on_conflict(
                OnConflict::column(month_comment::Column::CommentId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Delete the post shadows of a group created strictly before `cutoff`.
    pub async fn purge_posts_older_than(
        &self,
        group_id: &str,
        cutoff: DateTimeWithTimeZone,
    ) -> AppResult<u64> {
        let result = MonthPost::delete_many()
            .filter(month_post::Column::GroupId.eq(group_id))
            .filter(month_post::Column::CreatedTime.lt(cutoff))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete the comment shadows of a group created strictly before `cutoff`.
    pub async fn purge_comments_older_than(
        &self,
        group_id: &str,
        cutoff: DateTimeWithTimeZone,
    ) -> AppResult<u64> {
        let result = MonthComment::delete_many()
            .filter(month_comment::Column::GroupId.eq(group_id))
            .filter(month_comment::Column::CreatedTime.lt(cutoff))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Number of recent posts of a group.
    pub async fn count_posts(&self, group_id: &str) -> AppResult<u64> {
        MonthPost::find()
            .filter(month_post::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of recent comments of a group.
    pub async fn count_comments(&self, group_id: &str) -> AppResult<u64> {
        MonthComment::find()
            .filter(month_comment::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a post is shadowed.
    pub async fn post_exists(&self, post_id: &str) -> AppResult<bool> {
        let found = MonthPost::find()
            .filter(month_post::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }

    /// Check whether a comment is shadowed.
    pub async fn comment_exists(&self, comment_id: &str) -> AppResult<bool> {
        let found = MonthComment::find()
            .filter(month_comment::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(found.is_some())
    }
}
