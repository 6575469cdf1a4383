//! Facebook user repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, prelude::DateTimeWithTimeZone,
};

use crate::entities::{FbUser, FbUserGroup, Group, fb_user, fb_user_group, group};

/// Repository for Facebook user operations.
#[derive(Clone)]
pub struct FbUserRepository {
    db: Arc<DatabaseConnection>,
}

impl FbUserRepository {
    /// Create a new Facebook user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<fb_user::Model>> {
        FbUser::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get user by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<fb_user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User: {id}")))
    }

    /// Insert a user or refresh the name and picture of an existing one.
    pub async fn upsert(&self, model: fb_user::ActiveModel) -> AppResult<()> {
        FbUser::insert(model)
            .on_conflict(
                OnConflict::column(fb_user::Column::Id)
                    .update_columns([
                        fb_user::Column::Name,
                        fb_user::Column::Picture,
                        fb_user::Column::UpdatedTime,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Record that the profile was fetched at `now`.
    pub async fn mark_refreshed(&self, id: &str, now: DateTime<Utc>) -> AppResult<()> {
        let updated_time: DateTimeWithTimeZone = now.into();

        FbUser::update_many()
            .col_expr(fb_user::Column::UpdatedTime, Expr::value(updated_time))
            .filter(fb_user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Add the user to a group. Joining twice is a no-op.
    pub async fn join_group(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        let model = fb_user_group::ActiveModel {
            user_id: Set(user_id.to_string()),
            group_id: Set(group_id.to_string()),
        };

        FbUserGroup::insert(model)
            .on_conflict(
                OnConflict::columns([fb_user_group::Column::UserId, fb_user_group::Column::GroupId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Remove the user from a group.
    pub async fn leave_group(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        FbUserGroup::delete_by_id((user_id.to_string(), group_id.to_string()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Groups the user belongs to.
    pub async fn find_groups(&self, user_id: &str) -> AppResult<Vec<group::Model>> {
        Group::find()
            .join(JoinType::InnerJoin, group::Relation::Members.def())
            .filter(fb_user_group::Column::UserId.eq(user_id))
            .order_by_asc(group::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Members of a group.
    pub async fn find_members(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<fb_user::Model>> {
        FbUser::find()
            .join(JoinType::InnerJoin, fb_user::Relation::Memberships.def())
            .filter(fb_user_group::Column::GroupId.eq(group_id))
            .order_by_asc(fb_user::Column::Name)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
