//! Recent-activity shadow of a comment.

use chrono::{DateTime, Utc};
use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shadow row of a comment younger than the retention window.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "month_comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub created_time: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub group_id: String,

    #[sea_orm(unique)]
    pub comment_id: String,
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
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_delete = "Cascade"
    )]
    Comment,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
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
