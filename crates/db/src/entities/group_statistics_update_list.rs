//! Refresh gate for expensive group statistics.

use chrono::{DateTime, Duration, Utc};
use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gate method guarding the month shadow-index sweep.
pub const MONTH_CONTENT: &str = "month_content";

/// Last refresh of one statistic, unique per (group, method).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_statistics_update_list")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub group_id: String,

    /// Name of the guarded computation, e.g. [`MONTH_CONTENT`].
    pub method: String,

    /// When the computation last ran.
    pub updated_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the guarded computation may run again (once per day).
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.is_due_at(Utc::now(), time::refresh_cooldown())
    }

    /// Whether `cooldown` has passed since the last run, as of `now`.
    #[must_use]
    pub fn is_due_at(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        time::is_due(self.updated_time, now, cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(updated: DateTime<Utc>) -> Model {
        Model {
            id: "gate1".to_string(),
            group_id: "g1".to_string(),
            method: MONTH_CONTENT.to_string(),
            updated_time: updated.into(),
        }
    }

    #[test]
    fn test_not_due_right_after_touch() {
        let now = Utc::now();
        assert!(!gate(now).is_update());
    }

    #[test]
    fn test_due_after_a_day() {
        let t0 = Utc::now();
        let g = gate(t0);
        let cooldown = time::refresh_cooldown();
        assert!(!g.is_due_at(t0 + Duration::hours(12), cooldown));
        assert!(g.is_due_at(t0 + Duration::hours(25), cooldown));
        assert!(gate(t0 - Duration::hours(25)).is_update());
    }
}
