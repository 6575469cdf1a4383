//! Recent-activity shadow of a post.

use chrono::{DateTime, Utc};
use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shadow row of a post younger than the retention window.
///
/// Rows are purged lazily by the retention sweep, so an old row may linger
/// for up to a day after it falls out of the window.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "month_post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Copy of the post's `created_time`.
    pub created_time: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub group_id: String,

    #[sea_orm(unique)]
    pub post_id: String,
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
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the row is more than 30 whole days old.
    #[must_use]
    pub fn is_overtime(&self) -> bool {
        self.is_overtime_at(Utc::now())
    }

    /// [`Self::is_overtime`] against a supplied clock.
    #[must_use]
    pub fn is_overtime_at(&self, now: DateTime<Utc>) -> bool {
        time::is_older_than_days(self.created_time, now, time::MONTH_WINDOW_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_overtime() {
        let now = Utc::now();
        let mut row = Model {
            id: "m1".to_string(),
            created_time: (now - Duration::days(10)).into(),
            group_id: "g1".to_string(),
            post_id: "g1_p1".to_string(),
        };
        assert!(!row.is_overtime_at(now));

        row.created_time = (now - Duration::days(31)).into();
        assert!(row.is_overtime_at(now));
        assert!(row.is_overtime());
    }
}
