//! Core content logic for the Folio blog.
//! This crate is the single source of truth for post and category query rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::category::{Category, CategoryId};
pub use model::post::{
    check_post_date_range, format_post_date, parse_post_date, NewPost, Post, PostDateError,
    PostDraft, PostId,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::post_repo::{PostFilter, PostRepository, SqlitePostRepository};
pub use repo::{RepoError, RepoResult};
pub use seed::{import_seed, load_seed_dir, SeedData, SeedError, SeedSummary};
pub use service::blog_page::{BlogPage, NO_RESULTS_MESSAGE};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::content_service::{ContentError, ContentResult, ContentService};
pub use service::query::{PostQuery, PostsView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
