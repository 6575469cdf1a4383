//! Tombstone of a comment removed by a group owner or an administrator.

use fbarchive_common::time;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::comment;

/// Snapshot of a deleted comment. Rows are written once and never updated.
///
/// `post_id` and `parent_id` are plain identifiers: the post or parent may be
/// gone by the time the tombstone is read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_comment")]
pub struct Model {
    /// ID of the comment that was deleted.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    pub created_time: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    pub like_count: i32,

    pub comment_count: i32,

    pub post_id: String,

    #[sea_orm(nullable)]
    pub parent_id: Option<String>,

    #[sea_orm(indexed)]
    pub group_id: String,
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
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Build the tombstone for a live comment.
    #[must_use]
    pub fn from_comment(comment: &comment::Model) -> Self {
        Self {
            id: Set(comment.id.clone()),
            user_id: Set(comment.user_id.clone()),
            created_time: Set(comment.created_time),
            message: Set(comment.message.clone()),
            like_count: Set(comment.like_count),
            comment_count: Set(comment.comment_count),
            post_id: Set(comment.post_id.clone()),
            parent_id: Set(comment.parent_id.clone()),
            group_id: Set(comment.group_id.clone()),
        }
    }
}

impl Model {
    /// Time since the original comment was created.
    #[must_use]
    pub fn diff_created_time(&self) -> String {
        time::get_different_time(self.created_time)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(parent_id: Option<&str>) -> comment::Model {
        comment::Model {
            id: "c2".to_string(),
            user_id: "u9".to_string(),
            post_id: "g1_p1".to_string(),
            parent_id: parent_id.map(str::to_string),
            group_id: "g1".to_string(),
            created_time: Utc.with_ymd_and_hms(2015, 9, 3, 10, 0, 0).unwrap().into(),
            message: Some("spam".to_string()),
            like_count: 2,
            comment_count: 0,
            is_show: true,
        }
    }

    #[test]
    fn test_from_comment_flattens_parent() {
        let reply = comment(Some("c1"));
        let tombstone = ActiveModel::from_comment(&reply);

        assert_eq!(tombstone.id, Set("c2".to_string()));
        assert_eq!(tombstone.post_id, Set("g1_p1".to_string()));
        assert_eq!(tombstone.parent_id, Set(Some("c1".to_string())));
        assert_eq!(tombstone.user_id, Set("u9".to_string()));
        assert_eq!(tombstone.group_id, Set("g1".to_string()));
        assert_eq!(tombstone.created_time, Set(reply.created_time));
        assert_eq!(tombstone.message, Set(Some("spam".to_string())));
        assert_eq!(tombstone.like_count, Set(2));
        assert_eq!(tombstone.comment_count, Set(0));
    }

    #[test]
    fn test_from_comment_without_parent() {
        let tombstone = ActiveModel::from_comment(&comment(None));
        assert_eq!(tombstone.parent_id, Set(None));
    }
}
