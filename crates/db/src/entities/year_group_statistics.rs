//! Memoized yearly counts of a group.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content::ContentKind;

/// Count of `model` records in the year starting at `time`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "year_group_statistics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub group_id: String,

    /// Start of the bucket.
    pub time: DateTimeWithTimeZone,

    /// Counted record kind.
    pub model: ContentKind,

    #[sea_orm(default_value = 0)]
    pub count: i32,
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
