//! Public landing page projection.
//!
//! # Responsibility
//! - Assemble the published post listing, featured post and category list
//!   shown on the blog landing page.
//!
//! # Invariants
//! - Listed posts are published, sorted newest `post_date` first; equal dates
//!   keep insertion order.
//! - Only a published post can be featured.
//! - "Nothing found" outcomes become per-section messages; storage failures
//!   and invalid input still fail the whole page.

use crate::model::category::{Category, CategoryId};
use crate::model::post::{Post, PostId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::post_repo::PostRepository;
use crate::service::content_service::{ContentError, ContentResult, ContentService};
use log::debug;
use serde::Serialize;

/// Message rendered in place of an empty section.
pub const NO_RESULTS_MESSAGE: &str = "no results";

/// Data for one landing page render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    /// Published posts, newest first.
    pub posts: Vec<Post>,
    /// Post shown in full: the selected one, else the newest.
    pub featured: Option<Post>,
    pub categories: Vec<Category>,
    /// Category filter the page was rendered for.
    pub viewing_category: Option<CategoryId>,
    /// Set when the post listing or the selected post came back empty.
    pub message: Option<String>,
    /// Set when there are no categories.
    pub categories_message: Option<String>,
}

impl<P: PostRepository, C: CategoryRepository> ContentService<P, C> {
    /// Builds the landing page, optionally narrowed to one category and
    /// featuring one selected post.
    pub fn blog_page(
        &self,
        category: Option<CategoryId>,
        selected: Option<PostId>,
    ) -> ContentResult<BlogPage> {
        let mut page = BlogPage {
            viewing_category: category,
            ..BlogPage::default()
        };

        let listing = match category {
            Some(category_id) => self.list_published_by_category(category_id),
            None => self.list_published(),
        };
        match absorb_nothing_found(listing)? {
            Some(mut posts) => {
                posts.sort_by(|left, right| right.post_date.cmp(&left.post_date));
                page.posts = posts;
            }
            None => page.message = Some(NO_RESULTS_MESSAGE.to_string()),
        }

        page.featured = match selected {
            Some(id) => {
                let post = absorb_nothing_found(self.get_by_id(id))?.filter(|post| post.published);
                if post.is_none() {
                    page.message = Some(NO_RESULTS_MESSAGE.to_string());
                }
                post
            }
            None => page.posts.first().cloned(),
        };

        match absorb_nothing_found(self.list_categories())? {
            Some(categories) => page.categories = categories,
            None => page.categories_message = Some(NO_RESULTS_MESSAGE.to_string()),
        }

        debug!(
            "event=blog_page module=content status=ok posts={} featured={} categories={}",
            page.posts.len(),
            page.featured.as_ref().map_or(-1, |post| post.id),
            page.categories.len()
        );
        Ok(page)
    }
}

fn absorb_nothing_found<T>(result: ContentResult<T>) -> ContentResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ContentError::EmptyResult(_)) | Err(ContentError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
