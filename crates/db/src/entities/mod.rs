//! Database entities.
//!
//! Each module holds one table. The `Entity` types are re-exported under the
//! table's CamelCase name so repositories can write `Post::find()`.

pub mod attachment;
pub mod blacklist;
pub mod comment;
pub mod content;
pub mod day_group_statistics;
pub mod deleted_comment;
pub mod deleted_post;
pub mod fb_user;
pub mod fb_user_group;
pub mod group;
pub mod group_archive_error_list;
pub mod group_statistics_update_list;
pub mod group_store_list;
pub mod interest_group_list;
pub mod media;
pub mod month_comment;
pub mod month_group_statistics;
pub mod month_post;
pub mod post;
pub mod report;
pub mod time_overview_group_statistics;
pub mod user_activity;
pub mod ward;
pub mod year_group_statistics;

pub use attachment::Entity as Attachment;
pub use blacklist::Entity as Blacklist;
pub use comment::Entity as Comment;
pub use content::{ContentKind, ContentRef};
pub use day_group_statistics::Entity as DayGroupStatistics;
pub use deleted_comment::Entity as DeletedComment;
pub use deleted_post::Entity as DeletedPost;
pub use fb_user::Entity as FbUser;
pub use fb_user_group::Entity as FbUserGroup;
pub use group::Entity as Group;
pub use group_archive_error_list::Entity as GroupArchiveErrorList;
pub use group_statistics_update_list::Entity as GroupStatisticsUpdateList;
pub use group_store_list::Entity as GroupStoreList;
pub use interest_group_list::Entity as InterestGroupList;
pub use media::Entity as Media;
pub use month_comment::Entity as MonthComment;
pub use month_group_statistics::Entity as MonthGroupStatistics;
pub use month_post::Entity as MonthPost;
pub use post::Entity as Post;
pub use report::Entity as Report;
pub use time_overview_group_statistics::Entity as TimeOverviewGroupStatistics;
pub use user_activity::Entity as UserActivity;
pub use ward::Entity as Ward;
pub use year_group_statistics::Entity as YearGroupStatistics;
