//! Repositories, one per aggregate.

pub mod attachment;
pub mod comment;
pub mod fb_user;
pub mod group;
pub mod group_list;
pub mod moderation;
pub mod month_content;
pub mod post;
pub mod search;
pub mod statistics;
pub mod tombstone;
pub mod user_activity;
pub mod ward;

pub use attachment::{AttachmentRepository, NewAttachment};
pub use comment::CommentRepository;
pub use fb_user::FbUserRepository;
pub use group::GroupRepository;
pub use group_list::GroupListRepository;
pub use moderation::ModerationRepository;
pub use month_content::MonthContentRepository;
pub use post::PostRepository;
pub use search::{SearchRepository, Searchable};
pub use statistics::StatisticsRepository;
pub use tombstone::TombstoneRepository;
pub use user_activity::UserActivityRepository;
pub use ward::WardRepository;
