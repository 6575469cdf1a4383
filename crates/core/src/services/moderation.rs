//! Moderation service: deletion with tombstones, reports and blacklists.

use std::sync::Arc;

use chrono::Utc;
use fbarchive_common::{AppError, AppResult};
use fbarchive_db::{
    entities::{ContentRef, blacklist, report, report::ReportStatus},
    repositories::{
        AttachmentRepository, CommentRepository, GroupRepository, ModerationRepository,
        PostRepository, TombstoneRepository, UserActivityRepository, WardRepository,
    },
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Repositories used by [`ModerationService`].
#[derive(Clone)]
pub struct ModerationRepositories {
    /// Posts.
    pub posts: PostRepository,
    /// Comments.
    pub comments: CommentRepository,
    /// Tombstones.
    pub tombstones: TombstoneRepository,
    /// Attachments.
    pub attachments: AttachmentRepository,
    /// Wards.
    pub wards: WardRepository,
    /// Reports and blacklists.
    pub moderation: ModerationRepository,
    /// Activity counters.
    pub activity: UserActivityRepository,
    /// Groups.
    pub groups: GroupRepository,
}

impl ModerationRepositories {
    /// Build every repository on one connection.
    #[must_use]
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            posts: PostRepository::new(Arc::clone(db)),
            comments: CommentRepository::new(Arc::clone(db)),
            tombstones: TombstoneRepository::new(Arc::clone(db)),
            attachments: AttachmentRepository::new(Arc::clone(db)),
            wards: WardRepository::new(Arc::clone(db)),
            moderation: ModerationRepository::new(Arc::clone(db)),
            activity: UserActivityRepository::new(Arc::clone(db)),
            groups: GroupRepository::new(Arc::clone(db)),
        }
    }
}

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    db: Arc<DatabaseConnection>,
    repos: ModerationRepositories,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, repos: ModerationRepositories) -> Self {
        Self { db, repos }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Clear the tagged references to `target` inside `txn`: attachments and
    /// wards are deleted, open reports are resolved.
    async fn detach(&self, txn: &DatabaseTransaction, target: &ContentRef) -> AppResult<()> {
        self.repos
            .attachments
            .delete_by_parent_with(txn, target)
            .await?;
        self.repos.wards.delete_by_target_with(txn, target).await?;
        self.repos
            .moderation
            .resolve_reports_for_with(txn, target, Utc::now())
            .await?;
        Ok(())
    }

    /// [`Self::detach`] for comments removed by the foreign-key cascade.
    async fn detach_comments(&self, txn: &DatabaseTransaction, ids: Vec<String>) -> AppResult<()> {
        for id in ids {
            self.detach(txn, &ContentRef::Comment(id)).await?;
        }
        Ok(())
    }

    /// Delete a post, keeping a tombstone of it.
    pub async fn delete_post(&self, post_id: &str) -> AppResult<()> {
        let post = self.repos.posts.get_by_id(post_id).await?;
        let target = ContentRef::Post(post.id.clone());

        let txn = self.begin().await?;
        self.repos.tombstones.insert_post_with(&txn, &post).await?;
        let children = self
            .repos
            .comments
            .find_ids_by_post_with(&txn, &post.id)
            .await?;
        self.detach_comments(&txn, children).await?;
        self.detach(&txn, &target).await?;
        self.repos.posts.delete_with(&txn, &post.id).await?;
        self.repos
            .activity
            .sub_post_count_with(&txn, &post.user_id, &post.group_id)
            .await?;
        self.repos
            .groups
            .decrement_post_count_with(&txn, &post.group_id)
            .await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(post_id, group_id = %post.group_id, "Deleted post");
        Ok(())
    }

    /// Delete a comment, keeping a tombstone of it.
    pub async fn delete_comment(&self, comment_id: &str) -> AppResult<()> {
        let comment = self.repos.comments.get_by_id(comment_id).await?;
        let target = ContentRef::Comment(comment.id.clone());

        let txn = self.begin().await?;
        self.repos
            .tombstones
            .insert_comment_with(&txn, &comment)
            .await?;
        let replies = self
            .repos
            .comments
            .find_descendant_ids_with(&txn, &comment.id)
            .await?;
        self.detach_comments(&txn, replies).await?;
        self.detach(&txn, &target).await?;
        self.repos.comments.delete_with(&txn, &comment.id).await?;
        self.repos
            .activity
            .sub_comment_count_with(&txn, &comment.user_id, &comment.group_id)
            .await?;
        self.repos
            .groups
            .decrement_comment_count_with(&txn, &comment.group_id)
            .await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(comment_id, group_id = %comment.group_id, "Deleted comment");
        Ok(())
    }

    /// Report a post or comment; the report is filed against its author.
    pub async fn report(&self, target: ContentRef) -> AppResult<report::Model> {
        let (group_id, author_id) = match &target {
            ContentRef::Post(id) => {
                let post = self.repos.posts.get_by_id(id).await?;
                (post.group_id, post.user_id)
            }
            ContentRef::Comment(id) => {
                let comment = self.repos.comments.get_by_id(id).await?;
                (comment.group_id, comment.user_id)
            }
        };

        let report = self
            .repos
            .moderation
            .create_report(target, &group_id, &author_id, Utc::now())
            .await?;

        tracing::debug!(report_id = %report.id, %group_id, %author_id, "Report created");
        Ok(report)
    }

    /// Dismiss a report without acting on it.
    pub async fn dismiss_report(&self, report_id: &str) -> AppResult<report::Model> {
        self.repos
            .moderation
            .set_report_status(report_id, ReportStatus::Dismissed, Utc::now())
            .await
    }

    /// Open reports of a group.
    pub async fn pending_reports(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.repos
            .moderation
            .find_reports_by_status(group_id, ReportStatus::New, limit, offset)
            .await
    }

    /// Record one more spam strike for a user and return the updated entry.
    pub async fn blacklist(&self, group_id: &str, user_id: &str) -> AppResult<blacklist::Model> {
        self.repos
            .moderation
            .add_to_blacklist(group_id, user_id, Utc::now())
            .await?;

        self.repos
            .moderation
            .find_blacklist(group_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Blacklist entry vanished: {group_id}/{user_id}"))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fbarchive_db::entities::{ContentKind, comment, post};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_post() -> post::Model {
        post::Model {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            group_id: "g1".to_string(),
            created_time: Utc::now().into(),
            updated_time: Utc::now().into(),
            message: Some("spam".to_string()),
            picture: None,
            comment_count: 0,
            like_count: 0,
            share_count: 0,
            is_show: true,
        }
    }

    fn create_test_comment() -> comment::Model {
        comment::Model {
            id: "c1".to_string(),
            user_id: "u2".to_string(),
            post_id: "p1".to_string(),
            parent_id: None,
            group_id: "g1".to_string(),
            created_time: Utc::now().into(),
            message: Some("spam".to_string()),
            like_count: 0,
            comment_count: 0,
            is_show: true,
        }
    }

    fn service(db: Arc<DatabaseConnection>) -> ModerationService {
        let repos = ModerationRepositories::new(&db);
        ModerationService::new(db, repos)
    }

    fn logged_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    fn logged_statements(db: Arc<DatabaseConnection>) -> Vec<(String, String)> {
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| {
                txn.statements()
                    .iter()
                    .map(|stmt| (stmt.sql.clone(), format!("{:?}", stmt.values)))
            })
            .collect()
    }

    fn position(sql: &[String], prefix: &str) -> usize {
        sql.iter().position(|s| s.starts_with(prefix)).unwrap()
    }

    #[tokio::test]
    async fn test_delete_post_tombstones_before_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post()]])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_exec_results((0..7).map(|_| exec(1)))
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        svc.delete_post("p1").await.unwrap();
        drop(svc);

        let sql = logged_sql(db);
        let tombstone = position(&sql, "INSERT INTO \"deleted_post\"");
        let delete = position(&sql, "DELETE FROM \"post\"");
        let activity = position(&sql, "INSERT INTO \"user_activity\"");
        assert!(tombstone < delete);
        assert!(delete < activity);
        assert!(sql.iter().any(|s| s.starts_with("DELETE FROM \"attachment\"")));
        assert!(sql.iter().any(|s| s.starts_with("DELETE FROM \"ward\"")));
        assert!(sql.iter().any(|s| s.starts_with("UPDATE \"report\"")));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(db).delete_post("p404").await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_comment_decrements_comment_counters() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment()]])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_exec_results((0..7).map(|_| exec(1)))
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        svc.delete_comment("c1").await.unwrap();
        drop(svc);

        let sql = logged_sql(db);
        assert!(sql.iter().any(|s| s.starts_with("INSERT INTO \"deleted_comment\"")));
        assert!(sql.iter().any(|s| s.contains("GREATEST(\"user_activity\".\"comment_count\" - 1, 0)")));
        assert!(sql.iter().any(|s| s.contains("GREATEST(comment_count - 1, 0)")));
    }

    #[tokio::test]
    async fn test_delete_post_detaches_cascaded_comments() {
        let mut reply = create_test_comment();
        reply.id = "c2".to_string();
        reply.parent_id = Some("c1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post()]])
                .append_query_results([vec![create_test_comment(), reply]])
                .append_exec_results((0..13).map(|_| exec(1)))
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        svc.delete_post("p1").await.unwrap();
        drop(svc);

        let statements = logged_statements(db);
        let attachment_deletes: Vec<&String> = statements
            .iter()
            .filter(|(sql, _)| sql.starts_with("DELETE FROM \"attachment\""))
            .map(|(_, values)| values)
            .collect();
        assert_eq!(attachment_deletes.len(), 3);
        assert!(attachment_deletes.iter().any(|v| v.contains("\"c1\"")));
        assert!(attachment_deletes.iter().any(|v| v.contains("\"c2\"")));
        assert!(attachment_deletes.iter().any(|v| v.contains("\"p1\"")));

        let report_updates = statements
            .iter()
            .filter(|(sql, _)| sql.starts_with("UPDATE \"report\""))
            .count();
        assert_eq!(report_updates, 3);

        let sql: Vec<String> = statements.into_iter().map(|(sql, _)| sql).collect();
        assert!(position(&sql, "DELETE FROM \"ward\"") < position(&sql, "DELETE FROM \"post\""));
    }

    #[tokio::test]
    async fn test_delete_comment_detaches_nested_replies() {
        let mut reply = create_test_comment();
        reply.id = "c2".to_string();
        reply.parent_id = Some("c1".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment()]])
                .append_query_results([[reply]])
                .append_query_results([Vec::<comment::Model>::new()])
                .append_exec_results((0..10).map(|_| exec(1)))
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        svc.delete_comment("c1").await.unwrap();
        drop(svc);

        let statements = logged_statements(db);
        assert!(statements.iter().any(|(sql, values)| {
            sql.starts_with("DELETE FROM \"ward\"") && values.contains("\"c2\"")
        }));
        assert!(statements.iter().any(|(sql, values)| {
            sql.starts_with("UPDATE \"report\"") && values.contains("\"c2\"")
        }));
    }

    #[tokio::test]
    async fn test_report_files_against_content_author() {
        let report = report::Model {
            id: "r1".to_string(),
            target_type: ContentKind::Comment,
            target_id: "c1".to_string(),
            group_id: "g1".to_string(),
            user_id: "u2".to_string(),
            status: ReportStatus::New,
            updated_time: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment()]])
                .append_query_results([[report]])
                .into_connection(),
        );

        let svc = service(Arc::clone(&db));
        let created = svc
            .report(ContentRef::Comment("c1".to_string()))
            .await
            .unwrap();
        drop(svc);

        assert_eq!(created.group_id, "g1");
        assert_eq!(created.user_id, "u2");
        assert_eq!(created.target(), ContentRef::Comment("c1".to_string()));

        let statements = logged_statements(db);
        let (_, values) = statements
            .iter()
            .find(|(sql, _)| sql.starts_with("INSERT INTO \"report\""))
            .unwrap();
        assert!(values.contains("\"u2\""));
        assert!(values.contains("\"g1\""));
    }

    #[tokio::test]
    async fn test_blacklist_returns_entry() {
        let entry = blacklist::Model {
            id: "b1".to_string(),
            group_id: "g1".to_string(),
            user_id: "spammer".to_string(),
            count: 3,
            updated_time: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1)])
                .append_query_results([[entry]])
                .into_connection(),
        );

        let result = service(db).blacklist("g1", "spammer").await.unwrap();
        assert_eq!(result.count, 3);
    }
}
