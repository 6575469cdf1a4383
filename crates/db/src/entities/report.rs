//! Spam report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content::{ContentKind, ContentRef};

/// Report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "new")]
    #[default]
    New,
    /// The reported content was removed.
    #[sea_orm(string_value = "resolved")]
    Resolved,
    /// The report was reviewed and ignored.
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

/// Report about a spam post or comment in a group.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Kind of the reported content.
    pub target_type: ContentKind,

    /// ID of the reported post or comment.
    #[sea_orm(indexed)]
    pub target_id: String,

    #[sea_orm(indexed)]
    pub group_id: String,

    /// Author of the reported content.
    pub user_id: String,

    pub status: ReportStatus,

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
    #[sea_orm(
        belongs_to = "super::fb_user::Entity",
        from = "Column::UserId",
        to = "super::fb_user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The reported post or comment.
    #[must_use]
    pub fn target(&self) -> ContentRef {
        ContentRef::from_parts(self.target_type, self.target_id.clone())
    }
}
