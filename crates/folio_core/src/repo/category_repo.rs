//! Category storage adapter contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is insertion order (`id ASC`).
//! - Deleting a category never touches posts that reference it.

use crate::model::category::{Category, CategoryId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

const CATEGORY_COLUMNS: &[&str] = &["id", "name"];

/// Storage adapter for categories.
pub trait CategoryRepository {
    /// Lists all categories in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Category>>;
    /// Loads one category by id.
    fn find_one(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Inserts a category and returns it with its store-assigned id.
    fn create(&self, name: &str) -> RepoResult<Category>;
    /// Inserts a category that already has an id (seed import).
    fn import(&self, category: &Category) -> RepoResult<()>;
    /// Removes the category with `id`, returning the number of rows removed.
    fn destroy(&self, id: CategoryId) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "categories", CATEGORY_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let categories = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn find_one(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn create(&self, name: &str) -> RepoResult<Category> {
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1);", [name])?;

        let id = self.conn.last_insert_rowid();
        self.find_one(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("category {id} missing after insert read-back"))
        })
    }

    fn import(&self, category: &Category) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO categories (id, name) VALUES (?1, ?2);",
            params![category.id, category.name.as_str()],
        )?;
        Ok(())
    }

    fn destroy(&self, id: CategoryId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        Ok(removed)
    }
}
