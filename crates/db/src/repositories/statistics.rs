//! Statistics refresh gates and memoized counts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, prelude::DateTimeWithTimeZone,
};

use crate::entities::{
    ContentKind, DayGroupStatistics, GroupStatisticsUpdateList, MonthGroupStatistics,
    TimeOverviewGroupStatistics, YearGroupStatistics, day_group_statistics,
    group_statistics_update_list, month_group_statistics, time_overview_group_statistics,
    year_group_statistics,
};

/// Repository for statistics gates and memo tables.
#[derive(Clone)]
pub struct StatisticsRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl StatisticsRepository {
    /// Create a new statistics repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find the refresh gate of `method` for a group.
    pub async fn find_gate(
        &self,
        group_id: &str,
        method: &str,
    ) -> AppResult<Option<group_statistics_update_list::Model>> {
        GroupStatisticsUpdateList::find()
            .filter(group_statistics_update_list::Column::GroupId.eq(group_id))
            .filter(group_statistics_update_list::Column::Method.eq(method))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stamp the gate of `method` with `now`, creating it if absent.
    pub async fn touch(&self, group_id: &str, method: &str, now: DateTime<Utc>) -> AppResult<()> {
        let model = group_statistics_update_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            method: Set(method.to_string()),
            updated_time: Set(now.into()),
        };

        GroupStatisticsUpdateList::insert(model)
            .on_conflict(
                OnConflict::columns([
                    group_statistics_update_list::Column::GroupId,
                    group_statistics_update_list::Column::Method,
                ])
                .update_column(group_statistics_update_list::Column::UpdatedTime)
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(group_id, method, "Touched statistics gate");
        Ok(())
    }

    /// Store the yearly count of `model` items starting at `time`.
    pub async fn store_year_count(
        &self,
        group_id: &str,
        time: DateTimeWithTimeZone,
        model: ContentKind,
        count: i32,
    ) -> AppResult<()> {
        let row = year_group_statistics::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            time: Set(time),
            model: Set(model),
            count: Set(count),
        };

        self.upsert_memo(
            row,
            [
                year_group_statistics::Column::GroupId,
                year_group_statistics::Column::Time,
                year_group_statistics::Column::Model,
            ],
            year_group_statistics::Column::Count,
        )
        .await
    }

    /// Store the monthly count of `model` items starting at `time`.
    pub async fn store_month_count(
        &self,
        group_id: &str,
        time: DateTimeWithTimeZone,
        model: ContentKind,
        count: i32,
    ) -> AppResult<()> {
        let row = month_group_statistics::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            time: Set(time),
            model: Set(model),
            count: Set(count),
        };

        self.upsert_memo(
            row,
            [
                month_group_statistics::Column::GroupId,
                month_group_statistics::Column::Time,
                month_group_statistics::Column::Model,
            ],
            month_group_statistics::Column::Count,
        )
        .await
    }

    /// Store the daily count of `model` items starting at `time`.
    pub async fn store_day_count(
        &self,
        group_id: &str,
        time: DateTimeWithTimeZone,
        model: ContentKind,
        count: i32,
    ) -> AppResult<()> {
        let row = day_group_statistics::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            time: Set(time),
            model: Set(model),
            count: Set(count),
        };

        self.upsert_memo(
            row,
            [
                day_group_statistics::Column::GroupId,
                day_group_statistics::Column::Time,
                day_group_statistics::Column::Model,
            ],
            day_group_statistics::Column::Count,
        )
        .await
    }

    /// Store the count of `model` items created during hour-of-day `hour`.
    pub async fn store_time_overview_count(
        &self,
        group_id: &str,
        hour: i32,
        model: ContentKind,
        count: i32,
    ) -> AppResult<()> {
        if !(0..24).contains(&hour) {
            return Err(AppError::Validation(format!(
                "hour of day out of range: {hour}"
            )));
        }

        let row = time_overview_group_statistics::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            time: Set(hour),
            model: Set(model),
            count: Set(count),
        };

        self.upsert_memo(
            row,
            [
                time_overview_group_statistics::Column::GroupId,
                time_overview_group_statistics::Column::Time,
                time_overview_group_statistics::Column::Model,
            ],
            time_overview_group_statistics::Column::Count,
        )
        .await
    }

    /// Yearly counts of a group, oldest first.
    pub async fn year_counts(
        &self,
        group_id: &str,
        model: ContentKind,
    ) -> AppResult<Vec<year_group_statistics::Model>> {
        YearGroupStatistics::find()
            .filter(year_group_statistics::Column::GroupId.eq(group_id))
            .filter(year_group_statistics::Column::Model.eq(model))
            .order_by_asc(year_group_statistics::Column::Time)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Monthly counts of a group, oldest first.
    pub async fn month_counts(
        &self,
        group_id: &str,
        model: ContentKind,
    ) -> AppResult<Vec<month_group_statistics::Model>> {
        MonthGroupStatistics::find()
            .filter(month_group_statistics::Column::GroupId.eq(group_id))
            .filter(month_group_statistics::Column::Model.eq(model))
            .order_by_asc(month_group_statistics::Column::Time)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Daily counts of a group within `[from, to)`, oldest first.
    pub async fn day_counts(
        &self,
        group_id: &str,
        model: ContentKind,
        from: DateTimeWithTimeZone,
        to: DateTimeWithTimeZone,
    ) -> AppResult<Vec<day_group_statistics::Model>> {
        DayGroupStatistics::find()
            .filter(day_group_statistics::Column::GroupId.eq(group_id))
            .filter(day_group_statistics::Column::Model.eq(model))
            .filter(day_group_statistics::Column::Time.gte(from))
            .filter(day_group_statistics::Column::Time.lt(to))
            .order_by_asc(day_group_statistics::Column::Time)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hour-of-day distribution of a group, from hour 0 to 23.
    pub async fn time_overview_counts(
        &self,
        group_id: &str,
        model: ContentKind,
    ) -> AppResult<Vec<time_overview_group_statistics::Model>> {
        TimeOverviewGroupStatistics::find()
            .filter(time_overview_group_statistics::Column::GroupId.eq(group_id))
            .filter(time_overview_group_statistics::Column::Model.eq(model))
            .order_by_asc(time_overview_group_statistics::Column::Time)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_memo<A>(
        &self,
        row: A,
        key: [<A::Entity as EntityTrait>::Column; 3],
        count: <A::Entity as EntityTrait>::Column,
    ) -> AppResult<()>
    where
        A: ActiveModelTrait + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        <A::Entity as EntityTrait>::insert(row)
            .on_conflict(OnConflict::columns(key).update_column(count).to_owned())
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
