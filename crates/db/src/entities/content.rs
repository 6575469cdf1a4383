//! Tagged reference to a post or a comment.
//!
//! Attachments, reports and wards point at exactly one piece of content.
//! The reference is stored as a (`kind`, `id`) column pair and surfaced as
//! [`ContentRef`], so "post xor comment" holds by construction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of content a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// A post.
    #[sea_orm(string_value = "post")]
    Post,
    /// A comment or a reply to a comment.
    #[sea_orm(string_value = "comment")]
    Comment,
}

/// Reference to a post or a comment by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContentRef {
    /// A post ID.
    Post(String),
    /// A comment ID.
    Comment(String),
}

impl ContentRef {
    /// Rebuild a reference from its stored columns.
    #[must_use]
    pub fn from_parts(kind: ContentKind, id: impl Into<String>) -> Self {
        match kind {
            ContentKind::Post => Self::Post(id.into()),
            ContentKind::Comment => Self::Comment(id.into()),
        }
    }

    /// The kind column value.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Post(_) => ContentKind::Post,
            Self::Comment(_) => ContentKind::Comment,
        }
    }

    /// The referenced identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Post(id) | Self::Comment(id) => id,
        }
    }

    /// Split into the stored column pair.
    #[must_use]
    pub fn into_parts(self) -> (ContentKind, String) {
        match self {
            Self::Post(id) => (ContentKind::Post, id),
            Self::Comment(id) => (ContentKind::Comment, id),
        }
    }
}
