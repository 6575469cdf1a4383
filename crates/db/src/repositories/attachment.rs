//! Attachment and media repository.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{Attachment, ContentRef, Media, attachment, media};

/// Input for a new attachment.
#[derive(Debug, Clone, Default)]
pub struct NewAttachment {
    /// Link target.
    pub url: Option<String>,
    /// Title shown with the link.
    pub title: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Raw Graph API type tag, e.g. `"photo"` or `"share"`.
    pub kind: Option<String>,
    /// Stored image, if any.
    pub media_id: Option<String>,
}

/// Repository for attachment operations.
#[derive(Clone)]
pub struct AttachmentRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store a media image.
    pub async fn create_media(
        &self,
        src: Option<String>,
        width: Option<i32>,
        height: Option<i32>,
    ) -> AppResult<media::Model> {
        let model = media::ActiveModel {
            id: Set(self.id_gen.generate()),
            height: Set(height),
            width: Set(width),
            src: Set(src),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach something to a post or a comment.
    pub async fn create(
        &self,
        parent: ContentRef,
        input: NewAttachment,
    ) -> AppResult<attachment::Model> {
        let (parent_type, parent_id) = parent.into_parts();
        let model = attachment::ActiveModel {
            id: Set(self.id_gen.generate()),
            parent_type: Set(parent_type),
            parent_id: Set(parent_id),
            url: Set(input.url),
            title: Set(input.title),
            description: Set(input.description),
            kind: Set(input.kind),
            media_id: Set(input.media_id),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attachments of a post or comment.
    pub async fn find_by_parent(&self, parent: &ContentRef) -> AppResult<Vec<attachment::Model>> {
        Attachment::find()
            .filter(attachment::Column::ParentType.eq(parent.kind()))
            .filter(attachment::Column::ParentId.eq(parent.id()))
            .order_by_asc(attachment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attachments of a post or comment together with their media.
    pub async fn find_with_media(
        &self,
        parent: &ContentRef,
    ) -> AppResult<Vec<(attachment::Model, Option<media::Model>)>> {
        Attachment::find()
            .find_also_related(Media)
            .filter(attachment::Column::ParentType.eq(parent.kind()))
            .filter(attachment::Column::ParentId.eq(parent.id()))
            .order_by_asc(attachment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every attachment of a post or comment on the given connection.
    pub async fn delete_by_parent_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        parent: &ContentRef,
    ) -> AppResult<u64> {
        let result = Attachment::delete_many()
            .filter(attachment::Column::ParentType.eq(parent.kind()))
            .filter(attachment::Column::ParentId.eq(parent.id()))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
