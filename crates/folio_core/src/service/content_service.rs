//! Content use-case service.
//!
//! # Responsibility
//! - Expose the post and category queries, creations and deletions used by
//!   the presentation layer.
//! - Shape storage results into distinct outcomes: data, `EmptyResult`,
//!   `NotFound`, `InvalidInput`, or `StorageFailure`.
//! - Apply the post creation defaults (date stamp, publish flag).
//!
//! # Invariants
//! - List operations fail with `EmptyResult` iff zero records match. A single
//!   match is a normal result.
//! - Category and publish filters use exact equality.
//! - `list_by_min_date` is inclusive and keeps posts on or after the bound.
//! - Deletes are idempotent; a missing id is reported, never raised.
//! - Storage failures are surfaced unchanged and never retried.

use crate::model::category::{Category, CategoryId};
use crate::model::post::{
    check_post_date_range, format_post_date, NewPost, Post, PostDraft, PostId,
};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::post_repo::{PostFilter, PostRepository};
use crate::repo::RepoError;
use crate::service::clock::{Clock, SystemClock};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ContentResult<T> = Result<T, ContentError>;

/// Outcome of a content operation that did not produce data.
#[derive(Debug)]
pub enum ContentError {
    /// A listing matched zero records. Carries the listing name.
    EmptyResult(&'static str),
    /// `get_by_id` found no post with this id.
    NotFound(PostId),
    /// Caller input was absent or malformed.
    InvalidInput(String),
    /// Storage adapter failed.
    StorageFailure(RepoError),
}

impl ContentError {
    /// Whether this is a "nothing to show" outcome rather than a fault.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult(_))
    }
}

impl Display for ContentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyResult(listing) => write!(f, "no results returned for {listing}"),
            Self::NotFound(id) => write!(f, "post not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::StorageFailure(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ContentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContentError {
    fn from(value: RepoError) -> Self {
        Self::StorageFailure(value)
    }
}

/// Content facade over post and category storage adapters.
pub struct ContentService<P: PostRepository, C: CategoryRepository> {
    posts: P,
    categories: C,
    clock: Box<dyn Clock>,
}

impl<P: PostRepository, C: CategoryRepository> ContentService<P, C> {
    /// Creates a service that stamps posts with the host-local date.
    pub fn new(posts: P, categories: C) -> Self {
        Self::with_clock(posts, categories, SystemClock)
    }

    /// Creates a service with an explicit date source.
    pub fn with_clock(posts: P, categories: C, clock: impl Clock + 'static) -> Self {
        Self {
            posts,
            categories,
            clock: Box::new(clock),
        }
    }

    /// All posts in insertion order.
    pub fn list_all(&self) -> ContentResult<Vec<Post>> {
        self.list_posts("all posts", &PostFilter::default())
    }

    /// Published posts in insertion order.
    ///
    /// A single published post is returned normally; only zero matches yield
    /// `EmptyResult`.
    pub fn list_published(&self) -> ContentResult<Vec<Post>> {
        self.list_posts("published posts", &PostFilter::published())
    }

    /// Posts assigned to `category_id`, published or not.
    pub fn list_by_category(&self, category_id: CategoryId) -> ContentResult<Vec<Post>> {
        self.list_posts("posts in category", &PostFilter::in_category(category_id))
    }

    /// Published posts assigned to `category_id`.
    ///
    /// Both conditions are exact equality checks; category `1` never matches
    /// category `12`.
    pub fn list_published_by_category(
        &self,
        category_id: CategoryId,
    ) -> ContentResult<Vec<Post>> {
        let filter = PostFilter {
            published: Some(true),
            category_id: Some(category_id),
            ..PostFilter::default()
        };
        self.list_posts("published posts in category", &filter)
    }

    /// Posts dated on or after `min_date`.
    ///
    /// Bounds outside years `0000..=9999` are `InvalidInput`: stored dates
    /// compare as text and only four-digit years order correctly.
    pub fn list_by_min_date(&self, min_date: NaiveDate) -> ContentResult<Vec<Post>> {
        let min_date = check_post_date_range(min_date)
            .map_err(|err| ContentError::InvalidInput(err.to_string()))?;
        self.list_posts("posts since date", &PostFilter::since(min_date))
    }

    /// Exactly one post by id.
    pub fn get_by_id(&self, id: PostId) -> ContentResult<Post> {
        self.posts.find_one(id)?.ok_or(ContentError::NotFound(id))
    }

    /// All categories in insertion order.
    pub fn list_categories(&self) -> ContentResult<Vec<Category>> {
        let categories = self.categories.find_all()?;
        debug!(
            "event=content_list module=content status=ok listing=categories count={}",
            categories.len()
        );
        non_empty(categories, "categories")
    }

    /// Creates a category with a fresh id. Duplicate names are allowed.
    pub fn create_category(&self, name: impl AsRef<str>) -> ContentResult<Category> {
        let category = self.categories.create(name.as_ref())?;
        info!(
            "event=category_create module=content status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    /// Deletes a category. Returns whether a row was removed.
    ///
    /// Posts that reference the category keep their `category_id`.
    pub fn delete_category_by_id(&self, id: CategoryId) -> ContentResult<bool> {
        let removed = self.categories.destroy(id)? > 0;
        info!("event=category_delete module=content status=ok category_id={id} removed={removed}");
        Ok(removed)
    }

    /// Deletes a post. Returns whether a row was removed.
    pub fn delete_post_by_id(&self, id: PostId) -> ContentResult<bool> {
        let removed = self.posts.destroy(id)? > 0;
        info!("event=post_delete module=content status=ok post_id={id} removed={removed}");
        Ok(removed)
    }

    /// Persists a draft as a new post.
    ///
    /// `None` models a request that carried no draft and fails with
    /// `InvalidInput`.
    ///
    /// # Contract
    /// - `post_date` is today's date from the service clock.
    /// - `published` is `true` iff the draft's published-intent field was
    ///   present, whatever its value.
    /// - The id is assigned by storage and never reused.
    pub fn create_post(&self, draft: Option<PostDraft>) -> ContentResult<Post> {
        let Some(draft) = draft else {
            warn!("event=post_create module=content status=error error_code=missing_draft");
            return Err(ContentError::InvalidInput("post draft is required".to_string()));
        };

        let new_post = NewPost::from_draft(draft, self.clock.today());
        let post = self.posts.create(&new_post)?;
        info!(
            "event=post_create module=content status=ok post_id={} published={} post_date={}",
            post.id,
            post.published,
            format_post_date(post.post_date)
        );
        Ok(post)
    }

    fn list_posts(&self, listing: &'static str, filter: &PostFilter) -> ContentResult<Vec<Post>> {
        let posts = self.posts.find_all(filter)?;
        debug!(
            "event=content_list module=content status=ok listing=\"{listing}\" count={}",
            posts.len()
        );
        non_empty(posts, listing)
    }
}

fn non_empty<T>(items: Vec<T>, listing: &'static str) -> ContentResult<Vec<T>> {
    if items.is_empty() {
        return Err(ContentError::EmptyResult(listing));
    }
    Ok(items)
}
