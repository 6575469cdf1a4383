//! Month-window retention of the recent-activity shadow index.
//!
//! Every group has a `month_content` refresh gate. A sweep runs at most once
//! per cooldown and deletes shadow rows older than the retention window.

use chrono::{DateTime, Duration, Utc};
use fbarchive_common::{AppResult, ArchiveConfig, time};
use fbarchive_db::{
    entities::{comment, group_statistics_update_list::MONTH_CONTENT, post},
    repositories::{MonthContentRepository, StatisticsRepository},
};
use serde::Serialize;

/// Retention window and sweep cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Shadow rows created earlier than `now - window` are purged.
    pub window: Duration,
    /// Minimum time between two sweeps of the same group.
    pub cooldown: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            window: time::month_window(),
            cooldown: time::refresh_cooldown(),
        }
    }
}

impl RetentionPolicy {
    /// Build the policy from the `archive` configuration section.
    #[must_use]
    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self {
            window: Duration::days(config.month_window_days),
            cooldown: Duration::hours(config.refresh_cooldown_hours),
        }
    }
}

/// What a call to [`RetentionService::check_at`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// The group had no gate yet; it was created and nothing was purged.
    Started,
    /// The cooldown has not elapsed.
    NotDue,
    /// A sweep ran.
    Purged {
        /// Post shadows deleted.
        posts: u64,
        /// Comment shadows deleted.
        comments: u64,
    },
}

/// Retention service for the month shadow tables.
#[derive(Clone)]
pub struct RetentionService {
    statistics_repo: StatisticsRepository,
    month_repo: MonthContentRepository,
    policy: RetentionPolicy,
}

impl RetentionService {
    /// Create a new retention service.
    #[must_use]
    pub const fn new(
        statistics_repo: StatisticsRepository,
        month_repo: MonthContentRepository,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            statistics_repo,
            month_repo,
            policy,
        }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Sweep the shadow tables of a group if its gate is due.
    pub async fn check(&self, group_id: &str) -> AppResult<SweepOutcome> {
        self.check_at(group_id, Utc::now()).await
    }

    /// [`Self::check`] against a supplied clock.
    pub async fn check_at(&self, group_id: &str, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let Some(gate) = self
            .statistics_repo
            .find_gate(group_id, MONTH_CONTENT)
            .await?
        else {
            self.statistics_repo
                .touch(group_id, MONTH_CONTENT, now)
                .await?;
            tracing::debug!(group_id, "Created month content gate");
            return Ok(SweepOutcome::Started);
        };

        if !gate.is_due_at(now, self.policy.cooldown) {
            return Ok(SweepOutcome::NotDue);
        }

        let cutoff = (now - self.policy.window).into();
        let posts = self
            .month_repo
            .purge_posts_older_than(group_id, cutoff)
            .await?;
        let comments = self
            .month_repo
            .purge_comments_older_than(group_id, cutoff)
            .await?;
        self.statistics_repo
            .touch(group_id, MONTH_CONTENT, now)
            .await?;

        tracing::info!(group_id, posts, comments, "Purged month content");
        Ok(SweepOutcome::Purged { posts, comments })
    }

    /// Shadow a post after sweeping its group. Returns `true` if a new shadow
    /// row was written.
    pub async fn create_month_post(&self, post: &post::Model) -> AppResult<bool> {
        self.create_month_post_at(post, Utc::now()).await
    }

    /// [`Self::create_month_post`] against a supplied clock.
    pub async fn create_month_post_at(
        &self,
        post: &post::Model,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.check_at(&post.group_id, now).await?;
        self.month_repo.insert_post_if_absent(post).await
    }

    /// Shadow a comment after sweeping its group. Returns `true` if a new
    /// shadow row was written.
    pub async fn create_month_comment(&self, comment: &comment::Model) -> AppResult<bool> {
        self.create_month_comment_at(comment, Utc::now()).await
    }

    /// [`Self::create_month_comment`] against a supplied clock.
    pub async fn create_month_comment_at(
        &self,
        comment: &comment::Model,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.check_at(&comment.group_id, now).await?;
        self.month_repo.insert_comment_if_absent(comment).await
    }
}
