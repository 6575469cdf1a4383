//! Activity service.
//!
//! Keeps the per-user activity counters and the group totals in step with
//! archived posts and comments.

use fbarchive_common::AppResult;
use fbarchive_db::{
    entities::{comment, post, user_activity},
    repositories::{GroupRepository, UserActivityRepository},
};

/// Activity service for business logic.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: UserActivityRepository,
    group_repo: GroupRepository,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: UserActivityRepository, group_repo: GroupRepository) -> Self {
        Self {
            activity_repo,
            group_repo,
        }
    }

    /// Count a newly archived post.
    pub async fn on_post_archived(&self, post: &post::Model) -> AppResult<()> {
        self.activity_repo
            .add_post_count(&post.user_id, &post.group_id)
            .await?;
        self.group_repo.increment_post_count(&post.group_id).await
    }

    /// Count a newly archived comment.
    pub async fn on_comment_archived(&self, comment: &comment::Model) -> AppResult<()> {
        self.activity_repo
            .add_comment_count(&comment.user_id, &comment.group_id)
            .await?;
        self.group_repo
            .increment_comment_count(&comment.group_id)
            .await
    }

    /// Uncount a post that left the archive.
    pub async fn on_post_removed(&self, post: &post::Model) -> AppResult<()> {
        self.activity_repo
            .sub_post_count(&post.user_id, &post.group_id)
            .await?;
        self.group_repo.decrement_post_count(&post.group_id).await
    }

    /// Uncount a comment that left the archive.
    pub async fn on_comment_removed(&self, comment: &comment::Model) -> AppResult<()> {
        self.activity_repo
            .sub_comment_count(&comment.user_id, &comment.group_id)
            .await?;
        self.group_repo
            .decrement_comment_count(&comment.group_id)
            .await
    }

    /// Counters of one user in one group. A user with no recorded activity
    /// has zero posts and zero comments.
    pub async fn get(&self, user_id: &str, group_id: &str) -> AppResult<(i32, i32)> {
        Ok(self
            .activity_repo
            .find(user_id, group_id)
            .await?
            .map_or((0, 0), |a| (a.post_count, a.comment_count)))
    }

    /// Most active posters of a group.
    pub async fn top_posters(
        &self,
        group_id: &str,
        limit: u64,
    ) -> AppResult<Vec<user_activity::Model>> {
        self.activity_repo.top_posters(group_id, limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn create_test_comment() -> comment::Model {
        comment::Model {
            id: "c1".to_string(),
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            parent_id: None,
            group_id: "g1".to_string(),
            created_time: Utc::now().into(),
            message: None,
            like_count: 0,
            comment_count: 0,
            is_show: true,
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> ActivityService {
        ActivityService::new(
            UserActivityRepository::new(Arc::clone(db)),
            GroupRepository::new(Arc::clone(db)),
        )
    }

    #[tokio::test]
    async fn test_on_comment_removed_updates_user_and_group() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );

        service(&db)
            .on_comment_removed(&create_test_comment())
            .await
            .unwrap();

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(log[0].statements()[0].sql.contains("GREATEST("));
        assert!(
            log[1].statements()[0]
                .sql
                .contains("GREATEST(comment_count - 1, 0)")
        );
    }

    #[tokio::test]
    async fn test_get_without_activity_is_zero() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_activity::Model>::new()])
                .into_connection(),
        );

        let counts = service(&db).get("u1", "g1").await.unwrap();
        assert_eq!(counts, (0, 0));
    }

    #[tokio::test]
    async fn test_get_returns_counters() {
        let activity = user_activity::Model {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            group_id: "g1".to_string(),
            post_count: 4,
            comment_count: 9,
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[activity]])
                .into_connection(),
        );

        let counts = service(&db).get("u1", "g1").await.unwrap();
        assert_eq!(counts, (4, 9));
    }
}
