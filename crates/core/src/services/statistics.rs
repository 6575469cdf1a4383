//! Statistics service: gated recomputation and hour-of-day distribution.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fbarchive_common::{AppResult, ArchiveConfig};
use fbarchive_db::{entities::ContentKind, repositories::StatisticsRepository};

/// A statistic that is recomputed at most once per cooldown.
#[async_trait]
pub trait StatisticsJob: Send + Sync {
    /// Gate name, unique per statistic.
    fn method(&self) -> &str;

    /// Recompute the statistic for a group.
    async fn run(&self, group_id: &str) -> AppResult<()>;
}

/// Statistics service for business logic.
#[derive(Clone)]
pub struct StatisticsService {
    statistics_repo: StatisticsRepository,
    cooldown: Duration,
}

impl StatisticsService {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(statistics_repo: StatisticsRepository, cooldown: Duration) -> Self {
        Self {
            statistics_repo,
            cooldown,
        }
    }

    /// Create a statistics service with the configured cooldown.
    #[must_use]
    pub fn from_config(statistics_repo: StatisticsRepository, config: &ArchiveConfig) -> Self {
        Self::new(
            statistics_repo,
            Duration::hours(config.refresh_cooldown_hours),
        )
    }

    /// Run `job` for a group unless it already ran within the cooldown.
    ///
    /// Returns `true` if the job ran.
    pub async fn refresh_if_due(&self, group_id: &str, job: &dyn StatisticsJob) -> AppResult<bool> {
        self.refresh_if_due_at(group_id, job, Utc::now()).await
    }

    /// [`Self::refresh_if_due`] against a supplied clock.
    pub async fn refresh_if_due_at(
        &self,
        group_id: &str,
        job: &dyn StatisticsJob,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let method = job.method();
        let due = self
            .statistics_repo
            .find_gate(group_id, method)
            .await?
            .is_none_or(|gate| gate.is_due_at(now, self.cooldown));

        if !due {
            tracing::debug!(group_id, method, "Statistics still fresh");
            return Ok(false);
        }

        job.run(group_id).await?;
        self.statistics_repo.touch(group_id, method, now).await?;

        tracing::info!(group_id, method, "Statistics refreshed");
        Ok(true)
    }

    /// Items created per hour of the day, indexed 0 to 23. Hours without a
    /// stored count are zero.
    pub async fn hourly_distribution(
        &self,
        group_id: &str,
        model: ContentKind,
    ) -> AppResult<[i32; 24]> {
        let rows = self
            .statistics_repo
            .time_overview_counts(group_id, model)
            .await?;

        let mut hours = [0; 24];
        for row in rows {
            if let Some(slot) = usize::try_from(row.time)
                .ok()
                .and_then(|hour| hours.get_mut(hour))
            {
                *slot = row.count;
            }
        }
        Ok(hours)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fbarchive_db::entities::{group_statistics_update_list, time_overview_group_statistics};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl StatisticsJob for CountingJob {
        fn method(&self) -> &str {
            "day_post"
        }

        async fn run(&self, _group_id: &str) -> AppResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 10, 1, 12, 0, 0).unwrap()
    }

    fn gate_at(at: DateTime<Utc>) -> group_statistics_update_list::Model {
        group_statistics_update_list::Model {
            id: "s1".to_string(),
            group_id: "g1".to_string(),
            method: "day_post".to_string(),
            updated_time: at.into(),
        }
    }

    fn service(db: MockDatabase) -> StatisticsService {
        StatisticsService::new(
            StatisticsRepository::new(Arc::new(db.into_connection())),
            Duration::days(1),
        )
    }

    #[tokio::test]
    async fn test_runs_when_gate_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<group_statistics_update_list::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let job = CountingJob {
            runs: AtomicUsize::new(0),
        };

        let ran = service(db).refresh_if_due_at("g1", &job, t0()).await.unwrap();

        assert!(ran);
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_skips_within_cooldown() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[gate_at(t0())]]);
        let job = CountingJob {
            runs: AtomicUsize::new(0),
        };

        let ran = service(db)
            .refresh_if_due_at("g1", &job, t0() + Duration::hours(12))
            .await
            .unwrap();

        assert!(!ran);
        assert_eq!(job.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runs_after_cooldown() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[gate_at(t0())]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let job = CountingJob {
            runs: AtomicUsize::new(0),
        };

        let ran = service(db)
            .refresh_if_due_at("g1", &job, t0() + Duration::hours(25))
            .await
            .unwrap();

        assert!(ran);
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hourly_distribution_fills_gaps() {
        let rows = vec![
            time_overview_group_statistics::Model {
                id: "t1".to_string(),
                group_id: "g1".to_string(),
                time: 9,
                model: ContentKind::Post,
                count: 12,
            },
            time_overview_group_statistics::Model {
                id: "t2".to_string(),
                group_id: "g1".to_string(),
                time: 23,
                model: ContentKind::Post,
                count: 4,
            },
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([rows]);

        let hours = service(db)
            .hourly_distribution("g1", ContentKind::Post)
            .await
            .unwrap();

        assert_eq!(hours[9], 12);
        assert_eq!(hours[23], 4);
        assert_eq!(hours.iter().sum::<i32>(), 16);
    }
}
