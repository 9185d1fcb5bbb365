//! Boundary parsing for post listing parameters.
//!
//! # Responsibility
//! - Turn optional string query parameters into one typed `PostQuery`.
//! - Reject non-numeric ids and malformed dates with `InvalidInput` instead
//!   of coercing them.
//!
//! # Invariants
//! - Parameter precedence is `category`, then `id`, then `min_date`; with none
//!   present the query lists every post.
//! - Only the winning parameter is parsed; the others are ignored.

use crate::model::category::CategoryId;
use crate::model::post::{parse_post_date, Post, PostId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::post_repo::PostRepository;
use crate::service::content_service::{ContentError, ContentResult, ContentService};
use chrono::NaiveDate;
use serde::Serialize;

/// Typed post listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostQuery {
    All,
    ByCategory(CategoryId),
    ById(PostId),
    ByMinDate(NaiveDate),
}

impl PostQuery {
    /// Builds a query from raw request parameters.
    pub fn from_params(
        category: Option<&str>,
        id: Option<&str>,
        min_date: Option<&str>,
    ) -> ContentResult<Self> {
        if let Some(raw) = category {
            return parse_category_id(raw).map(Self::ByCategory);
        }
        if let Some(raw) = id {
            return parse_post_id(raw).map(Self::ById);
        }
        if let Some(raw) = min_date {
            return parse_min_date(raw).map(Self::ByMinDate);
        }
        Ok(Self::All)
    }
}

/// Result of a `PostQuery`: a listing, or one post for `ById`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostsView {
    List(Vec<Post>),
    Single(Post),
}

impl PostsView {
    /// Number of posts carried by the view.
    pub fn len(&self) -> usize {
        match self {
            Self::List(posts) => posts.len(),
            Self::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: PostRepository, C: CategoryRepository> ContentService<P, C> {
    /// Executes a typed post query.
    pub fn run_query(&self, query: &PostQuery) -> ContentResult<PostsView> {
        match *query {
            PostQuery::All => self.list_all().map(PostsView::List),
            PostQuery::ByCategory(category_id) => {
                self.list_by_category(category_id).map(PostsView::List)
            }
            PostQuery::ById(id) => self.get_by_id(id).map(PostsView::Single),
            PostQuery::ByMinDate(min_date) => self.list_by_min_date(min_date).map(PostsView::List),
        }
    }
}

/// Parses a post id parameter. `"12abc"` is rejected, not read as `12`.
pub fn parse_post_id(raw: &str) -> ContentResult<PostId> {
    raw.parse::<PostId>().map_err(|_| {
        ContentError::InvalidInput(format!("post id must be an integer, got `{raw}`"))
    })
}

/// Parses a category id parameter.
pub fn parse_category_id(raw: &str) -> ContentResult<CategoryId> {
    raw.parse::<CategoryId>().map_err(|_| {
        ContentError::InvalidInput(format!("category id must be an integer, got `{raw}`"))
    })
}

/// Parses a minimum date parameter in `YYYY-MM-DD` form.
pub fn parse_min_date(raw: &str) -> ContentResult<NaiveDate> {
    parse_post_date(raw).map_err(|err| ContentError::InvalidInput(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_category_id, parse_post_id, PostQuery};
    use crate::service::content_service::ContentError;
    use chrono::NaiveDate;

    #[test]
    fn no_params_lists_everything() {
        assert_eq!(PostQuery::from_params(None, None, None).unwrap(), PostQuery::All);
    }

    #[test]
    fn category_wins_over_id_and_min_date() {
        let query = PostQuery::from_params(Some("3"), Some("not-parsed"), Some("bad")).unwrap();
        assert_eq!(query, PostQuery::ByCategory(3));
    }

    #[test]
    fn id_wins_over_min_date() {
        let query = PostQuery::from_params(None, Some("7"), Some("2024-01-01")).unwrap();
        assert_eq!(query, PostQuery::ById(7));
    }

    #[test]
    fn min_date_is_parsed_strictly() {
        let query = PostQuery::from_params(None, None, Some("2024-01-15")).unwrap();
        assert_eq!(
            query,
            PostQuery::ByMinDate(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );

        let err = PostQuery::from_params(None, None, Some("2024-1-15")).unwrap_err();
        assert!(matches!(err, ContentError::InvalidInput(_)));
    }

    #[test]
    fn numeric_prefixes_are_not_coerced() {
        assert!(matches!(
            parse_post_id("12abc"),
            Err(ContentError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_category_id(""),
            Err(ContentError::InvalidInput(_))
        ));
        assert_eq!(parse_category_id("12").unwrap(), 12);
    }
}
