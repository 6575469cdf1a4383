//! Post entity.

use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post - a top-level message in a group feed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    /// Facebook post ID (`<group>_<post>`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Group the post was published in.
    #[sea_orm(indexed)]
    pub group_id: String,

    /// When the post was published.
    pub created_time: DateTimeWithTimeZone,

    /// Last edit or activity time reported by Facebook.
    pub updated_time: DateTimeWithTimeZone,

    /// Message body.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Picture URL.
    #[sea_orm(nullable)]
    pub picture: Option<String>,

    /// Number of comments.
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    /// Number of likes.
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Number of shares.
    #[sea_orm(default_value = 0)]
    pub share_count: i32,

    /// Whether the post is visible in the archive.
    #[sea_orm(default_value = true)]
    pub is_show: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fb_user::Entity",
        from = "Column::UserId",
        to = "super::fb_user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_one = "super::month_post::Entity")]
    MonthPost,
}

impl Related<super::fb_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::month_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check whether the remote `updated_time` differs from the stored one.
    #[must_use]
    pub fn is_updated(&self, new_updated_time: &str) -> bool {
        time::differs_from_remote(self.updated_time, new_updated_time)
    }

    /// Time since the post was created.
    #[must_use]
    pub fn diff_created_time(&self) -> String {
        time::get_different_time(self.created_time)
    }

    /// Time since the post was last updated.
    #[must_use]
    pub fn diff_updated_time(&self) -> String {
        time::get_different_time(self.updated_time)
    }
}
