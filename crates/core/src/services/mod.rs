//! Business logic services.

pub mod activity;
pub mod archive;
pub mod moderation;
pub mod retention;
pub mod statistics;

pub use activity::ActivityService;
pub use archive::ArchiveService;
pub use moderation::{ModerationRepositories, ModerationService};
pub use retention::{RetentionPolicy, RetentionService, SweepOutcome};
pub use statistics::{StatisticsJob, StatisticsService};
