//! Post storage adapter contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide `find_all`/`find_one`/`create`/`destroy` over the `posts` table.
//! - Translate `PostFilter` into exact-equality SQL predicates.
//!
//! # Invariants
//! - Listing order is insertion order (`id ASC`).
//! - Category and publish filters use equality, never pattern matching.
//! - Date filtering compares zero-padded `YYYY-MM-DD` text, which orders the
//!   same way as the calendar.

use crate::model::category::CategoryId;
use crate::model::post::{format_post_date, parse_post_date, NewPost, Post, PostId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    feature_image,
    post_date,
    published,
    category_id
FROM posts";

const POST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "body",
    "feature_image",
    "post_date",
    "published",
    "category_id",
];

/// Conjunctive filter for post listings. Unset fields do not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category_id: Option<CategoryId>,
    /// Inclusive lower bound on `post_date`.
    pub min_date: Option<NaiveDate>,
}

impl PostFilter {
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }

    pub fn in_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn since(min_date: NaiveDate) -> Self {
        Self {
            min_date: Some(min_date),
            ..Self::default()
        }
    }
}

/// Storage adapter for posts.
pub trait PostRepository {
    /// Lists posts matching `filter` in insertion order.
    fn find_all(&self, filter: &PostFilter) -> RepoResult<Vec<Post>>;
    /// Loads one post by id.
    fn find_one(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Inserts a post and returns it with its store-assigned id.
    fn create(&self, post: &NewPost) -> RepoResult<Post>;
    /// Inserts a post that already has an id (seed import).
    fn import(&self, post: &Post) -> RepoResult<()>;
    /// Removes the post with `id`, returning the number of rows removed.
    fn destroy(&self, id: PostId) -> RepoResult<usize>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "posts", POST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn find_all(&self, filter: &PostFilter) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(published) = filter.published {
            sql.push_str(" AND published = ?");
            bind_values.push(Value::Integer(bool_to_int(published)));
        }

        if let Some(category_id) = filter.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        if let Some(min_date) = filter.min_date {
            sql.push_str(" AND post_date >= ?");
            bind_values.push(Value::Text(format_post_date(min_date)));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn find_one(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn create(&self, post: &NewPost) -> RepoResult<Post> {
        self.conn.execute(
            "INSERT INTO posts (
                title,
                body,
                feature_image,
                post_date,
                published,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                post.title.as_str(),
                post.body.as_str(),
                post.feature_image.as_deref(),
                format_post_date(post.post_date),
                bool_to_int(post.published),
                post.category_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.find_one(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("post {id} missing after insert read-back"))
        })
    }

    fn import(&self, post: &Post) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO posts (
                id,
                title,
                body,
                feature_image,
                post_date,
                published,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                post.id,
                post.title.as_str(),
                post.body.as_str(),
                post.feature_image.as_deref(),
                format_post_date(post.post_date),
                bool_to_int(post.published),
                post.category_id,
            ],
        )?;
        Ok(())
    }

    fn destroy(&self, id: PostId) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        Ok(removed)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;

    let date_text: String = row.get("post_date")?;
    let post_date = parse_post_date(&date_text).map_err(|err| {
        RepoError::InvalidData(format!("post {id} has {err} in posts.post_date"))
    })?;

    let published = match row.get::<_, i64>("published")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid published value `{other}` in posts.published for post {id}"
            )));
        }
    };

    Ok(Post {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        feature_image: row.get("feature_image")?,
        post_date,
        published,
        category_id: row.get("category_id")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
