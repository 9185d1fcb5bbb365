//! JSON seed import.
//!
//! # Responsibility
//! - Read `categories.json` and `posts.json` seed files.
//! - Insert seed records through the storage adapters with their original ids.
//!
//! # Invariants
//! - Every seed post date is validated before anything is written.
//! - Categories are imported before posts, all in one transaction.
//! - Seed files use the legacy field names (`postDate`, `featureImage`,
//!   `category`).

use crate::model::category::{Category, CategoryId};
use crate::model::post::{parse_post_date, Post, PostDateError, PostId};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::post_repo::{PostRepository, SqlitePostRepository};
use crate::repo::RepoError;
use log::info;
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CATEGORIES_FILE: &str = "categories.json";
pub const POSTS_FILE: &str = "posts.json";

pub type SeedResult<T> = Result<T, SeedError>;

/// Errors from loading or importing seed data.
#[derive(Debug)]
pub enum SeedError {
    /// Seed file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Seed file is not valid seed JSON.
    Json {
        file: &'static str,
        source: serde_json::Error,
    },
    /// A seed post carries a date outside `YYYY-MM-DD`.
    InvalidDate {
        post_id: PostId,
        source: PostDateError,
    },
    /// Storage rejected a record (for example a duplicate id).
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read seed file `{}`: {source}", path.display())
            }
            Self::Json { file, source } => write!(f, "invalid seed file `{file}`: {source}"),
            Self::InvalidDate { post_id, source } => {
                write!(f, "seed post {post_id}: {source}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidDate { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One entry of `categories.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedCategory {
    pub id: CategoryId,
    #[serde(rename = "category")]
    pub name: String,
}

/// One entry of `posts.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPost {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub feature_image: Option<String>,
    pub post_date: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, rename = "category")]
    pub category_id: Option<CategoryId>,
}

impl SeedPost {
    fn to_post(&self) -> SeedResult<Post> {
        let post_date = parse_post_date(&self.post_date).map_err(|source| SeedError::InvalidDate {
            post_id: self.id,
            source,
        })?;
        Ok(Post {
            id: self.id,
            title: self.title.clone(),
            body: self.body.clone(),
            feature_image: self
                .feature_image
                .clone()
                .filter(|url| !url.trim().is_empty()),
            post_date,
            published: self.published,
            category_id: self.category_id,
        })
    }
}

/// Parsed contents of a seed directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub categories: Vec<SeedCategory>,
    pub posts: Vec<SeedPost>,
}

impl SeedData {
    /// Parses the two seed documents.
    pub fn from_json(categories_json: &str, posts_json: &str) -> SeedResult<Self> {
        let categories = serde_json::from_str(categories_json).map_err(|source| SeedError::Json {
            file: CATEGORIES_FILE,
            source,
        })?;
        let posts = serde_json::from_str(posts_json).map_err(|source| SeedError::Json {
            file: POSTS_FILE,
            source,
        })?;
        Ok(Self { categories, posts })
    }
}

/// Counts of imported records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub posts: usize,
}

/// Reads `categories.json` and `posts.json` from `dir`.
pub fn load_seed_dir(dir: impl AsRef<Path>) -> SeedResult<SeedData> {
    let dir = dir.as_ref();
    let categories_json = read_seed_file(&dir.join(CATEGORIES_FILE))?;
    let posts_json = read_seed_file(&dir.join(POSTS_FILE))?;
    SeedData::from_json(&categories_json, &posts_json)
}

/// Imports seed records, keeping their ids.
///
/// Runs in one transaction: on any failure nothing is written, so a
/// corrected seed can be imported again.
pub fn import_seed(conn: &Connection, data: &SeedData) -> SeedResult<SeedSummary> {
    let seed_posts = data
        .posts
        .iter()
        .map(SeedPost::to_post)
        .collect::<SeedResult<Vec<_>>>()?;

    let tx = conn.unchecked_transaction().map_err(RepoError::from)?;
    {
        let categories = SqliteCategoryRepository::try_new(&tx)?;
        let posts = SqlitePostRepository::try_new(&tx)?;
        for seed in &data.categories {
            categories.import(&Category::new(seed.id, seed.name.as_str()))?;
        }
        for post in &seed_posts {
            posts.import(post)?;
        }
    }
    tx.commit().map_err(RepoError::from)?;

    let summary = SeedSummary {
        categories: data.categories.len(),
        posts: seed_posts.len(),
    };
    info!(
        "event=seed_import module=seed status=ok categories={} posts={}",
        summary.categories, summary.posts
    );
    Ok(summary)
}

fn read_seed_file(path: &Path) -> SeedResult<String> {
    std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}
