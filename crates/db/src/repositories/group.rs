//! Group repository.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{Group, group};

/// Repository for group operations.
#[derive(Clone)]
pub struct GroupRepository {
    db: Arc<DatabaseConnection>,
}

impl GroupRepository {
    /// Create a new group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Find group by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<group::Model>> {
        Group::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get group by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<group::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(id.to_string()))
    }

    /// Create a new group.
    pub async fn create(&self, model: group::ActiveModel) -> AppResult<group::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a group fetched from Facebook, or refresh its descriptive
    /// fields if it is already archived. Counters and `is_stored` are kept.
    pub async fn upsert(&self, model: group::ActiveModel) -> AppResult<()> {
        Group::insert(model)
            .on_conflict(
                OnConflict::column(group::Column::Id)
                    .update_columns([
                        group::Column::Name,
                        group::Column::Description,
                        group::Column::UpdatedTime,
                        group::Column::Privacy,
                        group::Column::OwnerId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Update a group.
    pub async fn update(&self, model: group::ActiveModel) -> AppResult<group::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List groups whose archive is complete, largest first.
    pub async fn find_stored(&self, limit: u64, offset: u64) -> AppResult<Vec<group::Model>> {
        Group::find()
            .filter(group::Column::IsStored.eq(true))
            .order_by(group::Column::PostCount, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark whether the group's archive is complete.
    pub async fn set_stored(&self, id: &str, is_stored: bool) -> AppResult<group::Model> {
        let group = self.get_by_id(id).await?;
        let mut active: group::ActiveModel = group.into();
        active.is_stored = Set(is_stored);

        self.update(active).await
    }

    /// Increment post count atomically.
    pub async fn increment_post_count(&self, id: &str) -> AppResult<()> {
        Group::update_many()
            .col_expr(
                group::Column::PostCount,
                Expr::col(group::Column::PostCount).add(1),
            )
            .filter(group::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement post count atomically, never below zero.
    pub async fn decrement_post_count(&self, id: &str) -> AppResult<()> {
        self.decrement_post_count_with(self.db.as_ref(), id).await
    }

    /// [`Self::decrement_post_count`] on the given connection or transaction.
    pub async fn decrement_post_count_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        Group::update_many()
            .col_expr(
                group::Column::PostCount,
                Expr::cust("GREATEST(post_count - 1, 0)"),
            )
            .filter(group::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment comment count atomically.
    pub async fn increment_comment_count(&self, id: &str) -> AppResult<()> {
        Group::update_many()
            .col_expr(
                group::Column::CommentCount,
                Expr::col(group::Column::CommentCount).add(1),
            )
            .filter(group::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement comment count atomically, never below zero.
    pub async fn decrement_comment_count(&self, id: &str) -> AppResult<()> {
        self.decrement_comment_count_with(self.db.as_ref(), id).await
    }

    /// [`Self::decrement_comment_count`] on the given connection or transaction.
    pub async fn decrement_comment_count_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        Group::update_many()
            .col_expr(
                group::Column::CommentCount,
                Expr::cust("GREATEST(comment_count - 1, 0)"),
            )
            .filter(group::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
