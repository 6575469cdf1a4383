//! Add full-text search indexes for every searchable column.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, column) for each searchable field.
const SEARCH_INDEXES: [(&str, &str, &str); 7] = [
    ("idx_group_name_search", "group", "name"),
    ("idx_fb_user_name_search", "fb_user", "name"),
    ("idx_post_message_search", "post", "message"),
    ("idx_comment_message_search", "comment", "message"),
    ("idx_attachment_description_search", "attachment", "description"),
    ("idx_deleted_post_message_search", "deleted_post", "message"),
    ("idx_deleted_comment_message_search", "deleted_comment", "message"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 'simple' configuration: group content is mostly Korean and English
        for (index, table, column) in SEARCH_INDEXES {
            manager
                .get_connection()
                .execute_unprepared(&format!(
                    r#"
                    CREATE INDEX IF NOT EXISTS {index}
                    ON "{table}"
                    USING GIN (to_tsvector('simple', COALESCE({column}, '')));
                    "#
                ))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (index, _, _) in SEARCH_INDEXES {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS {index};"))
                .await?;
        }

        Ok(())
    }
}
