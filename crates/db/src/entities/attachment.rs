//! Attachment entity for posts and comments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::content::{ContentKind, ContentRef};

/// Attachment type tag as sent by the Graph API.
///
/// Unknown tags are kept verbatim in [`AttachmentKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Photo,
    Share,
    Unavailable,
    Album,
    VideoAutoplay,
    MultiShare,
    VideoShareYoutube,
    Note,
    Other(String),
}

impl AttachmentKind {
    /// Parse a stored type tag.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "photo" => Self::Photo,
            "share" => Self::Share,
            "unavailable" => Self::Unavailable,
            "album" => Self::Album,
            "video_autoplay" => Self::VideoAutoplay,
            "multi_share" => Self::MultiShare,
            "video_share_youtube" => Self::VideoShareYoutube,
            "note" => Self::Note,
            other => Self::Other(other.to_string()),
        }
    }

    /// Tag as stored in the `type` column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Photo => "photo",
            Self::Share => "share",
            Self::Unavailable => "unavailable",
            Self::Album => "album",
            Self::VideoAutoplay => "video_autoplay",
            Self::MultiShare => "multi_share",
            Self::VideoShareYoutube => "video_share_youtube",
            Self::Note => "note",
            Self::Other(tag) => tag,
        }
    }

    /// Whether the attachment groups other attachments.
    #[must_use]
    pub const fn has_children(&self) -> bool {
        matches!(self, Self::Album | Self::MultiShare)
    }
}

/// Attachment - a link, photo or video on a post or comment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Kind of the owning content.
    pub parent_type: ContentKind,

    /// ID of the owning post or comment.
    #[sea_orm(indexed)]
    pub parent_id: String,

    #[sea_orm(nullable)]
    pub url: Option<String>,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Type tag, see [`AttachmentKind`].
    #[sea_orm(column_name = "type", nullable)]
    pub kind: Option<String>,

    #[sea_orm(nullable)]
    pub media_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::media::Entity",
        from = "Column::MediaId",
        to = "super::media::Column::Id",
        on_delete = "SetNull"
    )]
    Media,
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The post or comment this attachment belongs to.
    #[must_use]
    pub fn parent(&self) -> ContentRef {
        ContentRef::from_parts(self.parent_type, self.parent_id.clone())
    }

    /// Parsed type tag.
    #[must_use]
    pub fn attachment_kind(&self) -> Option<AttachmentKind> {
        self.kind.as_deref().map(AttachmentKind::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_known_and_unknown() {
        assert_eq!(AttachmentKind::parse("video_share_youtube"), AttachmentKind::VideoShareYoutube);
        assert_eq!(AttachmentKind::parse("event").as_str(), "event");
        assert!(AttachmentKind::parse("album").has_children());
        assert!(!AttachmentKind::parse("photo").has_children());
    }

    #[test]
    fn test_parent() {
        let attachment = Model {
            id: "a1".to_string(),
            parent_type: ContentKind::Comment,
            parent_id: "c1".to_string(),
            url: None,
            title: None,
            description: None,
            kind: Some("photo".to_string()),
            media_id: None,
        };

        assert_eq!(attachment.parent(), ContentRef::Comment("c1".to_string()));
        assert_eq!(attachment.attachment_kind(), Some(AttachmentKind::Photo));
    }
}
