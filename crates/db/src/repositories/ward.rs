//! Watched posts and comments of site accounts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{ContentRef, Ward, ward};

/// Repository for wards.
#[derive(Clone)]
pub struct WardRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl WardRepository {
    /// Create a new ward repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Start watching a post or comment. `updated_time` is the target's last
    /// known update time.
    pub async fn create(
        &self,
        account_id: &str,
        group_id: &str,
        target: ContentRef,
        updated_time: DateTime<Utc>,
    ) -> AppResult<ward::Model> {
        if self.find(account_id, &target).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Account {account_id} already watches {}",
                target.id()
            )));
        }

        let (target_type, target_id) = target.into_parts();
        let model = ward::ActiveModel {
            id: Set(self.id_gen.generate()),
            account_id: Set(account_id.to_string()),
            group_id: Set(group_id.to_string()),
            target_type: Set(target_type),
            target_id: Set(target_id),
            created_time: Set(Utc::now().into()),
            updated_time: Set(updated_time.into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the ward of an account on a target.
    pub async fn find(&self, account_id: &str, target: &ContentRef) -> AppResult<Option<ward::Model>> {
        Ward::find()
            .filter(ward::Column::AccountId.eq(account_id))
            .filter(ward::Column::TargetType.eq(target.kind()))
            .filter(ward::Column::TargetId.eq(target.id()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Wards of an account, most recent first.
    pub async fn find_for_account(
        &self,
        account_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ward::Model>> {
        Ward::find()
            .filter(ward::Column::AccountId.eq(account_id))
            .order_by_desc(ward::Column::CreatedTime)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stop watching. Only the owning account may delete its ward.
    pub async fn delete(&self, account_id: &str, id: &str) -> AppResult<()> {
        let result = Ward::delete_many()
            .filter(ward::Column::Id.eq(id))
            .filter(ward::Column::AccountId.eq(account_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Ward {id} not found")));
        }

        Ok(())
    }

    /// Delete every ward on `target` on the given connection.
    pub async fn delete_by_target_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        target: &ContentRef,
    ) -> AppResult<u64> {
        let result = Ward::delete_many()
            .filter(ward::Column::TargetType.eq(target.kind()))
            .filter(ward::Column::TargetId.eq(target.id()))
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

    fn create_test_ward(id: &str) -> ward::Model {
        ward::Model {
            id: id.to_string(),
            account_id: "acc1".to_string(),
            group_id: "g1".to_string(),
            target_type: ContentKind::Post,
            target_id: "p1".to_string(),
            created_time: Utc::now().into(),
            updated_time: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_ward("w1")]])
                .into_connection(),
        );

        let repo = WardRepository::new(db);
        let result = repo
            .create("acc1", "g1", ContentRef::Post("p1".to_string()), Utc::now())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<ward::Model>::new()])
                .append_query_results([[create_test_ward("w1")]])
                .into_connection(),
        );

        let repo = WardRepository::new(db);
        let ward = repo
            .create("acc1", "g1", ContentRef::Post("p1".to_string()), Utc::now())
            .await
            .unwrap();

        assert_eq!(ward.target(), ContentRef::Post("p1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = WardRepository::new(db);
        let result = repo.delete("acc1", "w404").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
