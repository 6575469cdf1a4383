//! Full-text search over archived content.

use std::sync::Arc;

use fbarchive_common::{AppError, AppResult};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityName, EntityTrait, IdenStatic, Order,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{
    Attachment, Comment, DeletedComment, DeletedPost, FbUser, Group, Post, attachment, comment,
    deleted_comment, deleted_post, fb_user, group, post,
};

/// An entity with a text column covered by a `to_tsvector('simple', ...)`
/// GIN index.
pub trait Searchable: EntityTrait {
    /// The indexed text column.
    const SEARCH_COLUMN: Self::Column;

    /// Column holding the owning group, when results can be scoped to one.
    fn group_column() -> Option<Self::Column> {
        None
    }
}

impl Searchable for Group {
    const SEARCH_COLUMN: group::Column = group::Column::Name;
}

impl Searchable for FbUser {
    const SEARCH_COLUMN: fb_user::Column = fb_user::Column::Name;
}

impl Searchable for Post {
    const SEARCH_COLUMN: post::Column = post::Column::Message;

    fn group_column() -> Option<post::Column> {
        Some(post::Column::GroupId)
    }
}

impl Searchable for Comment {
    const SEARCH_COLUMN: comment::Column = comment::Column::Message;

    fn group_column() -> Option<comment::Column> {
        Some(comment::Column::GroupId)
    }
}

impl Searchable for Attachment {
    const SEARCH_COLUMN: attachment::Column = attachment::Column::Description;
}

impl Searchable for DeletedPost {
    const SEARCH_COLUMN: deleted_post::Column = deleted_post::Column::Message;

    fn group_column() -> Option<deleted_post::Column> {
        Some(deleted_post::Column::GroupId)
    }
}

impl Searchable for DeletedComment {
    const SEARCH_COLUMN: deleted_comment::Column = deleted_comment::Column::Message;

    fn group_column() -> Option<deleted_comment::Column> {
        Some(deleted_comment::Column::GroupId)
    }
}

/// Repository for text search.
#[derive(Clone)]
pub struct SearchRepository {
    db: Arc<DatabaseConnection>,
}

impl SearchRepository {
    /// Create a new search repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Search `E` for `query`, optionally within one group.
    ///
    /// Falls back to a case-insensitive `LIKE` scan when the full-text query
    /// fails. A group filter on an entity without a group column is rejected.
    pub async fn search<E: Searchable>(
        &self,
        query: &str,
        group_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<E::Model>> {
        if group_id.is_some() && E::group_column().is_none() {
            return Err(AppError::Validation(format!(
                "{} results cannot be filtered by group",
                E::default().table_name()
            )));
        }

        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        match self.search_fulltext::<E>(query, group_id, limit).await {
            Ok(results) => Ok(results),
            Err(e) => {
                tracing::warn!(error = %e, "Full-text search failed, falling back to LIKE");
                self.search_like::<E>(query, group_id, limit).await
            }
        }
    }

    /// Full-text search using `PostgreSQL` tsvector/tsquery, best match first.
    pub async fn search_fulltext<E: Searchable>(
        &self,
        query: &str,
        group_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<E::Model>> {
        let document = format!(
            "to_tsvector('simple', COALESCE(\"{}\".\"{}\", ''))",
            E::default().table_name(),
            E::SEARCH_COLUMN.as_str()
        );

        let mut select = E::find().filter(Expr::cust_with_values(
            format!("{document} @@ plainto_tsquery('simple', ?)"),
            [query],
        ));

        if let (Some(column), Some(group_id)) = (E::group_column(), group_id) {
            select = select.filter(column.eq(group_id));
        }

        select
            .order_by(
                Expr::cust_with_values(
                    format!("ts_rank({document}, plainto_tsquery('simple', ?))"),
                    [query],
                ),
                Order::Desc,
            )
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fallback LIKE-based search, case-insensitive like the `'simple'`
    /// text search configuration.
    pub async fn search_like<E: Searchable>(
        &self,
        query: &str,
        group_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<E::Model>> {
        let search_pattern = format!(
            "%{}%",
            query.to_lowercase().replace('%', "\\%").replace('_', "\\_")
        );
        let column = Expr::col((E::default(), E::SEARCH_COLUMN));

        let mut condition =
            Condition::all().add(Expr::expr(Func::lower(column)).like(search_pattern));
        if let (Some(column), Some(group_id)) = (E::group_column(), group_id) {
            condition = condition.add(column.eq(group_id));
        }

        E::find()
            .filter(condition)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
