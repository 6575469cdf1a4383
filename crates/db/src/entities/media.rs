//! Media entity attached to an attachment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Image or video source with its dimensions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Height in pixels.
    #[sea_orm(nullable)]
    pub height: Option<i32>,

    /// Width in pixels.
    #[sea_orm(nullable)]
    pub width: Option<i32>,

    /// Source URL.
    #[sea_orm(nullable)]
    pub src: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
