//! Archive errors of a group.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Error tracking row, one per group.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_archive_error_list")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub group_id: String,

    /// Number of failures since the row was created.
    #[sea_orm(default_value = 1)]
    pub error_count: i32,

    /// Query that failed last.
    #[sea_orm(nullable)]
    pub query: Option<String>,

    /// Error message of the last failure.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
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
