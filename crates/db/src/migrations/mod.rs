//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20251001_000001_create_group_and_user_tables;
mod m20251001_000002_create_post_and_comment_tables;
mod m20251001_000003_create_attachment_tables;
mod m20251001_000004_create_moderation_tables;
mod m20251001_000005_create_activity_and_archive_tables;
mod m20251001_000006_create_statistics_tables;
mod m20251001_000007_create_month_content_tables;
mod m20251001_000008_add_fulltext_search;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_group_and_user_tables::Migration),
            Box::new(m20251001_000002_create_post_and_comment_tables::Migration),
            Box::new(m20251001_000003_create_attachment_tables::Migration),
            Box::new(m20251001_000004_create_moderation_tables::Migration),
            Box::new(m20251001_000005_create_activity_and_archive_tables::Migration),
            Box::new(m20251001_000006_create_statistics_tables::Migration),
            Box::new(m20251001_000007_create_month_content_tables::Migration),
            Box::new(m20251001_000008_add_fulltext_search::Migration),
        ]
    }
}
