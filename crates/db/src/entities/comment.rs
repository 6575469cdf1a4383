//! Comment entity.
//!
//! Replies point at their parent comment through `parent_id`; the tree has no
//! depth limit and cycles are the ingester's problem.

use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Comment on a post, or reply to another comment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    /// Facebook comment ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Post the comment belongs to.
    #[sea_orm(indexed)]
    pub post_id: String,

    /// Parent comment for replies.
    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<String>,

    /// Group the comment was published in.
    #[sea_orm(indexed)]
    pub group_id: String,

    /// When the comment was published.
    pub created_time: DateTimeWithTimeZone,

    /// Message body.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Number of likes.
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Number of replies.
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    /// Whether the comment is visible in the archive.
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
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(has_one = "super::month_comment::Entity")]
    MonthComment,
}

impl Related<super::fb_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::month_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthComment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Time since the comment was created.
    #[must_use]
    pub fn diff_created_time(&self) -> String {
        time::get_different_time(self.created_time)
    }

    /// Whether this comment is a reply to another comment.
    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}
