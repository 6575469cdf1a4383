//! Facebook user entity.

use chrono::{DateTime, Utc};
use fbarchive_common::time;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Facebook user - author of posts and comments, member of groups.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fb_user")]
pub struct Model {
    /// Facebook user ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Profile picture URL.
    #[sea_orm(nullable)]
    pub picture: Option<String>,

    /// When the profile was last fetched from Facebook.
    pub updated_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::fb_user_group::Entity")]
    Memberships,
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

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        super::fb_user_group::Relation::Group.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::fb_user_group::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the profile may be fetched again (once per day).
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.is_update_at(Utc::now())
    }

    /// [`Self::is_update`] against a supplied clock.
    #[must_use]
    pub fn is_update_at(&self, now: DateTime<Utc>) -> bool {
        time::is_due(self.updated_time, now, time::refresh_cooldown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(updated: DateTime<Utc>) -> Model {
        Model {
            id: "100001".to_string(),
            name: "Kim".to_string(),
            picture: None,
            updated_time: updated.into(),
        }
    }

    #[test]
    fn test_is_update_cooldown() {
        let now = Utc::now();
        assert!(!user(now).is_update_at(now));
        assert!(!user(now).is_update_at(now + Duration::hours(23)));
        assert!(user(now).is_update_at(now + Duration::hours(24)));
    }

    #[test]
    fn test_is_update_stale_profile() {
        assert!(user(Utc::now() - Duration::days(2)).is_update());
    }
}
