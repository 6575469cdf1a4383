//! Archive progress of a group.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Archive status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[derive(Default)]
pub enum StoreStatus {
    /// Queued, nothing fetched yet.
    #[sea_orm(string_value = "new")]
    #[default]
    New,
    /// Fetching is in progress.
    #[sea_orm(string_value = "storing")]
    Storing,
    /// The feed was fully archived.
    #[sea_orm(string_value = "stored")]
    Stored,
    /// The last run stopped on an error.
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One row per group being archived.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_store_list")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub group_id: String,

    pub start_time: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub end_time: Option<DateTimeWithTimeZone>,

    /// Graph API query being (or last) fetched.
    #[sea_orm(nullable)]
    pub query: Option<String>,

    pub status: StoreStatus,
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
