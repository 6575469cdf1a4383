//! Tombstone of a post removed by a group owner or an administrator.

use fbarchive_common::time;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::post;

/// Snapshot of a deleted post. Rows are written once and never updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_post")]
pub struct Model {
    /// ID of the post that was deleted.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub group_id: String,

    pub created_time: DateTimeWithTimeZone,

    pub updated_time: DateTimeWithTimeZone,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    #[sea_orm(nullable)]
    pub picture: Option<String>,

    pub comment_count: i32,

    pub like_count: i32,

    pub share_count: i32,
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
    /// Build the tombstone for a live post.
    #[must_use]
    pub fn from_post(post: &post::Model) -> Self {
        Self {
            id: Set(post.id.clone()),
            user_id: Set(post.user_id.clone()),
            group_id: Set(post.group_id.clone()),
            created_time: Set(post.created_time),
            updated_time: Set(post.updated_time),
            message: Set(post.message.clone()),
            picture: Set(post.picture.clone()),
            comment_count: Set(post.comment_count),
            like_count: Set(post.like_count),
            share_count: Set(post.share_count),
        }
    }
}

impl Model {
    /// Check whether the remote `updated_time` differs from the snapshot.
    #[must_use]
    pub fn is_updated(&self, new_updated_time: &str) -> bool {
        time::differs_from_remote(self.updated_time, new_updated_time)
    }

    /// Time since the original post was created.
    #[must_use]
    pub fn diff_created_time(&self) -> String {
        time::get_different_time(self.created_time)
    }

    /// Time since the original post was last updated.
    #[must_use]
    pub fn diff_updated_time(&self) -> String {
        time::get_different_time(self.updated_time)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_from_post_copies_snapshot_fields() {
        let post = post::Model {
            id: "g1_p1".to_string(),
            user_id: "u1".to_string(),
            group_id: "g1".to_string(),
            created_time: Utc.with_ymd_and_hms(2015, 9, 1, 8, 0, 0).unwrap().into(),
            updated_time: Utc.with_ymd_and_hms(2015, 9, 2, 9, 30, 0).unwrap().into(),
            message: Some("buy cheap watches".to_string()),
            picture: Some("https://example.com/p.jpg".to_string()),
            comment_count: 4,
            like_count: 1,
            share_count: 7,
            is_show: false,
        };

        let tombstone = ActiveModel::from_post(&post);

        assert_eq!(tombstone.id, Set(post.id.clone()));
        assert_eq!(tombstone.user_id, Set(post.user_id.clone()));
        assert_eq!(tombstone.group_id, Set(post.group_id.clone()));
        assert_eq!(tombstone.created_time, Set(post.created_time));
        assert_eq!(tombstone.updated_time, Set(post.updated_time));
        assert_eq!(tombstone.message, Set(post.message.clone()));
        assert_eq!(tombstone.picture, Set(post.picture.clone()));
        assert_eq!(tombstone.comment_count, Set(4));
        assert_eq!(tombstone.like_count, Set(1));
        assert_eq!(tombstone.share_count, Set(7));
    }
}
