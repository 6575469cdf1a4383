//! Facebook group entity.

use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group privacy as reported by the Graph API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
pub enum GroupPrivacy {
    /// Anyone can see the group and its posts.
    #[sea_orm(string_value = "OPEN")]
    Open,
    /// Anyone can find the group, only members see posts.
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    /// Only members can find the group.
    #[sea_orm(string_value = "SECRET")]
    Secret,
}

impl Default for GroupPrivacy {
    fn default() -> Self {
        Self::Open
    }
}

/// Group entity - an archived Facebook group.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group")]
pub struct Model {
    /// Facebook group ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Group name.
    pub name: String,

    /// Group description (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Last update time reported by Facebook.
    pub updated_time: DateTimeWithTimeZone,

    /// Privacy setting.
    pub privacy: GroupPrivacy,

    /// Whether a full archive of the group has been stored.
    #[sea_orm(default_value = false)]
    pub is_stored: bool,

    /// Number of archived posts (denormalized).
    #[sea_orm(default_value = 0)]
    pub post_count: i32,

    /// Number of archived comments (denormalized).
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    /// Facebook user who owns the group.
    #[sea_orm(nullable, indexed)]
    pub owner_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fb_user::Entity",
        from = "Column::OwnerId",
        to = "super::fb_user::Column::Id",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::fb_user_group::Entity")]
    Members,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::fb_user::Entity> for Entity {
    fn to() -> RelationDef {
        super::fb_user_group::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::fb_user_group::Relation::Group.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check whether the remote `updated_time` differs from the stored one.
    #[must_use]
    pub fn is_updated(&self, new_updated_time: &str) -> bool {
        time::differs_from_remote(self.updated_time, new_updated_time)
    }

    /// Time since the group was last updated, e.g. `"3days"`.
    #[must_use]
    pub fn diff_time(&self) -> String {
        time::get_different_time(self.updated_time)
    }

    /// Post count in compact form.
    #[must_use]
    pub fn post_count_unit(&self) -> String {
        time::compact_count(i64::from(self.post_count))
    }

    /// Comment count in compact form.
    #[must_use]
    pub fn comment_count_unit(&self) -> String {
        time::compact_count(i64::from(self.comment_count))
    }
}
