//! Ward entity: a post or comment a site account keeps an eye on.

use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content::{ContentKind, ContentRef};

/// Saved reference to a post or comment.
///
/// `account_id` identifies a site account managed by the authentication
/// layer, not a Facebook user, so it carries no foreign key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ward")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub account_id: String,

    #[sea_orm(indexed)]
    pub group_id: String,

    pub target_type: ContentKind,

    pub target_id: String,

    pub created_time: DateTimeWithTimeZone,

    /// `updated_time` of the target when it was last seen.
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
    /// The watched post or comment.
    #[must_use]
    pub fn target(&self) -> ContentRef {
        ContentRef::from_parts(self.target_type, self.target_id.clone())
    }

    /// Check whether the target changed since the ward was last refreshed.
    #[must_use]
    pub fn is_updated(&self, new_updated_time: &str) -> bool {
        time::differs_from_remote(self.updated_time, new_updated_time)
    }
}
