//! SQLite-backed catalogue store.
//!
//! One write connection behind a mutex and a small round-robin pool of
//! read-only connections, all on the same WAL-mode database file. Every
//! operation runs inside its own transaction and carries a deadline: the
//! busy timeout bounds lock waits, and a progress handler interrupts
//! statements that run past it.

use super::aggregation;
use super::associations;
use super::error::{CatalogueError, CatalogueResult};
use super::models::*;
use super::query_builder::{build_book_query, placeholders, BookFilters};
use super::schema::CATALOGUE_VERSIONED_SCHEMAS;
use super::trait_def::CatalogueStore;
use super::validation::{
    validate_author_names, validate_book_fields, validate_category_name, validate_delete_ids,
    validate_id_set, validate_new_author, validate_new_book, validate_new_category,
};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ASSOCIATION_SET: usize = 1000;
/// Highest accepted `max_association_set`. A listing may bind two id lists of
/// that size in one statement, which must stay under SQLite's limit of 32766
/// bound variables.
pub const MAX_ASSOCIATION_SET_LIMIT: usize = 16_000;

/// VM instructions between two deadline checks.
const DEADLINE_CHECK_INTERVAL: i32 = 1000;

pub(crate) const BOOK_COLUMNS: &str = "b.id, b.title, b.subtitle, b.description, b.image, b.isbn, \
     b.page_count, b.published_date, b.status, b.created_at, b.updated_at";
pub(crate) const AUTHOR_COLUMNS: &str =
    "a.id, a.first_name, a.last_name, a.description, a.created_at, a.updated_at";
pub(crate) const CATEGORY_COLUMNS: &str = "c.id, c.name, c.created_at, c.updated_at";

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub read_pool_size: usize,
    /// Deadline for a single store operation.
    pub timeout: Duration,
    /// Largest distinct id set accepted by one replacement or bulk delete.
    pub max_association_set: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            timeout: DEFAULT_STORE_TIMEOUT,
            max_association_set: DEFAULT_MAX_ASSOCIATION_SET,
        }
    }
}

#[derive(Clone)]
pub struct SqliteCatalogueStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
    config: StoreConfig,
}

/// Interrupts statements on `conn` once the deadline passes. Dropping it
/// removes the handler.
struct Deadline<'c> {
    conn: &'c Connection,
}

impl<'c> Deadline<'c> {
    fn arm(conn: &'c Connection, timeout: Duration) -> Self {
        let expires_at = Instant::now() + timeout;
        conn.progress_handler(
            DEADLINE_CHECK_INTERVAL,
            Some(move || Instant::now() >= expires_at),
        );
        Deadline { conn }
    }

    fn disarm(&self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}

impl Drop for Deadline<'_> {
    fn drop(&mut self) {
        self.disarm();
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

// =============================================================================
// Row parsing
// =============================================================================

pub(crate) fn parse_book_row(row: &Row) -> rusqlite::Result<Book> {
    let created_at: i64 = row.get(9)?;
    let updated_at: i64 = row.get(10)?;
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        subtitle: row.get(2)?,
        description: row.get(3)?,
        image: row.get(4)?,
        isbn: row.get(5)?,
        page_count: row.get(6)?,
        published_date: row.get(7)?,
        status: row.get(8)?,
        created_at,
        updated_at,
        date_added: format_date(created_at),
        date_updated: format_date(updated_at),
        author_ids: Vec::new(),
        category_ids: Vec::new(),
        authors: Vec::new(),
        categories: Vec::new(),
    })
}

/// `offset` is the index of the first author column in the row.
pub(crate) fn parse_author_row(row: &Row, offset: usize) -> rusqlite::Result<Author> {
    let first_name: String = row.get(offset + 1)?;
    let last_name: String = row.get(offset + 2)?;
    let created_at: i64 = row.get(offset + 4)?;
    let updated_at: i64 = row.get(offset + 5)?;
    Ok(Author {
        id: row.get(offset)?,
        author_name: Author::display_name(&first_name, &last_name),
        first_name,
        last_name,
        description: row.get(offset + 3)?,
        created_at,
        updated_at,
        date_added: format_date(created_at),
        date_updated: format_date(updated_at),
        book_count: None,
    })
}

pub(crate) fn parse_category_row(row: &Row, offset: usize) -> rusqlite::Result<Category> {
    let created_at: i64 = row.get(offset + 2)?;
    let updated_at: i64 = row.get(offset + 3)?;
    Ok(Category {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        created_at,
        updated_at,
        date_added: format_date(created_at),
        date_updated: format_date(updated_at),
        book_count: None,
    })
}

// =============================================================================
// Shared statements
// =============================================================================

pub(crate) fn ensure_exists(
    conn: &Connection,
    table: &str,
    entity: &str,
    id: i64,
) -> CatalogueResult<()> {
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table),
        params![id],
        |r| r.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(CatalogueError::not_found(entity, id))
    }
}

fn fetch_book(conn: &Connection, id: i64) -> CatalogueResult<Book> {
    conn.query_row(
        &format!("SELECT {} FROM books b WHERE b.id = ?1", BOOK_COLUMNS),
        params![id],
        parse_book_row,
    )
    .optional()?
    .ok_or_else(|| CatalogueError::not_found("book", id))
}

fn load_book(conn: &Connection, id: i64) -> CatalogueResult<Book> {
    let mut book = fetch_book(conn, id)?;
    aggregation::hydrate_books(conn, std::slice::from_mut(&mut book))?;
    Ok(book)
}

fn fetch_author(conn: &Connection, id: i64) -> CatalogueResult<Author> {
    conn.query_row(
        &format!("SELECT {} FROM authors a WHERE a.id = ?1", AUTHOR_COLUMNS),
        params![id],
        |r| parse_author_row(r, 0),
    )
    .optional()?
    .ok_or_else(|| CatalogueError::not_found("author", id))
}

fn fetch_category(conn: &Connection, id: i64) -> CatalogueResult<Category> {
    conn.query_row(
        &format!("SELECT {} FROM categories c WHERE c.id = ?1", CATEGORY_COLUMNS),
        params![id],
        |r| parse_category_row(r, 0),
    )
    .optional()?
    .ok_or_else(|| CatalogueError::not_found("category", id))
}

/// All-or-nothing delete: any unknown id fails the whole call.
fn delete_by_ids(conn: &Connection, table: &str, entity: &str, ids: &[i64]) -> CatalogueResult<usize> {
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    let in_list = placeholders(unique.len());

    let mut stmt = conn.prepare(&format!("SELECT id FROM {} WHERE id IN ({})", table, in_list))?;
    let existing = stmt
        .query_map(params_from_iter(unique.iter()), |r| r.get::<_, i64>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    let missing: Vec<i64> = unique
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(CatalogueError::NotFound(format!(
            "{} ids not found: {:?}",
            entity, missing
        )));
    }

    Ok(conn.execute(
        &format!("DELETE FROM {} WHERE id IN ({})", table, in_list),
        params_from_iter(unique.iter()),
    )?)
}

/// Fill `book_count` on every entity from one grouped query. A failed count
/// is logged and reported as 0 rather than failing the listing.
fn attach_counts<T>(
    conn: &Connection,
    relation: Relation,
    items: &mut [T],
    id_of: impl Fn(&T) -> i64,
    set_count: impl Fn(&mut T, i64),
) {
    let ids: Vec<i64> = items.iter().map(&id_of).collect();
    let counts = match aggregation::count_books_batch(conn, relation, &ids) {
        Ok(counts) => counts,
        Err(e) => {
            warn!(
                "Failed to count books for {} {} rows, defaulting to 0: {}",
                ids.len(),
                relation.entity_name(),
                e
            );
            HashMap::new()
        }
    };
    for item in items.iter_mut() {
        let count = counts.get(&id_of(item)).copied().unwrap_or(0);
        set_count(item, count);
    }
}

// =============================================================================
// Store
// =============================================================================

impl SqliteCatalogueStore {
    /// Open (creating and migrating if needed) the catalogue database at
    /// `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P, config: StoreConfig) -> Result<Self> {
        if config.read_pool_size == 0 {
            bail!("Read pool size must be at least 1");
        }
        if config.max_association_set == 0
            || config.max_association_set > MAX_ASSOCIATION_SET_LIMIT
        {
            bail!(
                "max_association_set must be between 1 and {}, got {}",
                MAX_ASSOCIATION_SET_LIMIT,
                config.max_association_set
            );
        }
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalogue database {:?}", db_path_ref))?;

        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut write_conn, CATALOGUE_VERSIONED_SCHEMAS)?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "synchronous", "NORMAL")?;
        write_conn.busy_timeout(config.timeout)?;

        let count = |table: &str| -> i64 {
            write_conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
                .unwrap_or(0)
        };
        info!(
            "Opened catalogue: {} books, {} authors, {} categories",
            count("books"),
            count("authors"),
            count("categories")
        );

        let mut read_pool = Vec::with_capacity(config.read_pool_size);
        for _ in 0..config.read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalogue read connection")?;
            read_conn.pragma_update(None, "foreign_keys", "ON")?;
            read_conn.busy_timeout(config.timeout)?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogueStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Run `op` in a read transaction so every statement sees one snapshot.
    fn with_read<T, F>(&self, op: F) -> CatalogueResult<T>
    where
        F: FnOnce(&Connection) -> CatalogueResult<T>,
    {
        let pooled = self.get_read_conn();
        let conn = pooled.lock()?;
        let deadline = Deadline::arm(&conn, self.config.timeout);
        conn.execute_batch("BEGIN")?;
        let result = op(&conn);
        deadline.disarm();
        match result {
            Ok(value) => {
                conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Run `op` in a `BEGIN IMMEDIATE` transaction on the write connection.
    /// Any error rolls the whole operation back.
    fn with_write<T, F>(&self, op: F) -> CatalogueResult<T>
    where
        F: FnOnce(&Connection) -> CatalogueResult<T>,
    {
        let conn = self.write_conn.lock()?;
        let deadline = Deadline::arm(&conn, self.config.timeout);
        conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = op(&conn);
        deadline.disarm();
        match result {
            Ok(value) => match conn.execute_batch("COMMIT") {
                Ok(()) => Ok(value),
                Err(e) => {
                    let _ = conn.execute_batch("ROLLBACK");
                    Err(e.into())
                }
            },
            Err(e) => {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                    warn!("Rollback failed after {}: {}", e, rollback_err);
                }
                Err(e)
            }
        }
    }
}

impl CatalogueStore for SqliteCatalogueStore {
    // =========================================================================
    // Books
    // =========================================================================

    fn create_book(&self, book: NewBook) -> CatalogueResult<Book> {
        validate_new_book(&book, self.config.max_association_set)?;
        self.with_write(|conn| {
            let now = now_unix();
            conn.execute(
                "INSERT INTO books (title, subtitle, description, image, isbn, page_count, published_date, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                params![
                    book.title.trim(),
                    book.subtitle,
                    book.description,
                    book.image,
                    book.isbn,
                    book.page_count,
                    book.published_date,
                    book.status,
                    now
                ],
            )?;
            let id = conn.last_insert_rowid();
            associations::replace_in_tx(conn, id, Relation::Authors, &book.authors, now)?;
            associations::replace_in_tx(conn, id, Relation::Categories, &book.categories, now)?;
            info!(
                "Created book {} with {} authors and {} categories",
                id,
                book.authors.len(),
                book.categories.len()
            );
            load_book(conn, id)
        })
    }

    fn get_book(&self, id: i64) -> CatalogueResult<Book> {
        self.with_read(|conn| load_book(conn, id))
    }

    fn update_book(&self, id: i64, update: BookUpdate) -> CatalogueResult<Book> {
        let max = self.config.max_association_set;
        if let Some(ids) = &update.authors {
            validate_id_set("authors", ids, max)?;
        }
        if let Some(ids) = &update.categories {
            validate_id_set("categories", ids, max)?;
        }

        self.with_write(|conn| {
            let mut book = fetch_book(conn, id)?;
            if let Some(title) = update.title {
                book.title = title.trim().to_string();
            }
            if let Some(subtitle) = update.subtitle {
                book.subtitle = subtitle;
            }
            if let Some(description) = update.description {
                book.description = description;
            }
            if let Some(image) = update.image {
                book.image = image;
            }
            if let Some(isbn) = update.isbn {
                book.isbn = isbn;
            }
            if let Some(page_count) = update.page_count {
                book.page_count = page_count;
            }
            if let Some(published_date) = update.published_date {
                book.published_date = published_date;
            }
            if let Some(status) = update.status {
                book.status = status;
            }
            validate_book_fields(&book.title, book.page_count)?;

            let now = now_unix();
            conn.execute(
                "UPDATE books SET title = ?1, subtitle = ?2, description = ?3, image = ?4, isbn = ?5,
                 page_count = ?6, published_date = ?7, status = ?8, updated_at = ?9
                 WHERE id = ?10",
                params![
                    book.title,
                    book.subtitle,
                    book.description,
                    book.image,
                    book.isbn,
                    book.page_count,
                    book.published_date,
                    book.status,
                    now,
                    id
                ],
            )?;
            if let Some(ids) = &update.authors {
                associations::replace_in_tx(conn, id, Relation::Authors, ids, now)?;
            }
            if let Some(ids) = &update.categories {
                associations::replace_in_tx(conn, id, Relation::Categories, ids, now)?;
            }
            load_book(conn, id)
        })
    }

    fn delete_books(&self, ids: &[i64]) -> CatalogueResult<usize> {
        validate_delete_ids(ids, self.config.max_association_set)?;
        let deleted = self.with_write(|conn| delete_by_ids(conn, "books", "book", ids))?;
        info!("Deleted {} books", deleted);
        Ok(deleted)
    }

    fn list_books(&self, filters: &BookFilters) -> CatalogueResult<BookPage> {
        let query = build_book_query(filters);
        self.with_read(|conn| {
            let total_records: i64 = conn.query_row(
                &query.count_sql,
                params_from_iter(query.count_params.iter()),
                |r| r.get(0),
            )?;
            let mut stmt = conn.prepare(&query.sql)?;
            let mut books = stmt
                .query_map(params_from_iter(query.params.iter()), parse_book_row)?
                .collect::<Result<Vec<_>, _>>()?;
            if let Err(e) = aggregation::hydrate_books(conn, &mut books) {
                warn!("Failed to hydrate {} listed books: {}", books.len(), e);
            }
            Ok(BookPage {
                books,
                metadata: ListMetadata::new(total_records, filters.page, filters.page_size),
            })
        })
    }

    // =========================================================================
    // Associations
    // =========================================================================

    fn replace_associations(
        &self,
        book_id: i64,
        relation: Relation,
        ids: &[i64],
    ) -> CatalogueResult<()> {
        let field = match relation {
            Relation::Authors => "authors",
            Relation::Categories => "categories",
        };
        validate_id_set(field, ids, self.config.max_association_set)?;
        self.with_write(|conn| {
            let now = now_unix();
            associations::touch_book(conn, book_id, now)?;
            let written = associations::replace_in_tx(conn, book_id, relation, ids, now)?;
            info!(
                "Replaced {} set of book {} with {} entries",
                relation.entity_name(),
                book_id,
                written
            );
            Ok(())
        })
    }

    // =========================================================================
    // Authors
    // =========================================================================

    fn create_author(&self, author: NewAuthor) -> CatalogueResult<Author> {
        validate_new_author(&author)?;
        self.with_write(|conn| {
            let now = now_unix();
            conn.execute(
                "INSERT INTO authors (first_name, last_name, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![
                    author.first_name.trim(),
                    author.last_name.trim(),
                    author.description,
                    now
                ],
            )?;
            let mut created = fetch_author(conn, conn.last_insert_rowid())?;
            created.book_count = Some(0);
            info!("Created author {} ({})", created.id, created.author_name);
            Ok(created)
        })
    }

    fn get_author(&self, id: i64) -> CatalogueResult<Author> {
        self.with_read(|conn| {
            let mut author = fetch_author(conn, id)?;
            author.book_count = Some(aggregation::count_books(conn, Relation::Authors, id)?);
            Ok(author)
        })
    }

    fn update_author(&self, id: i64, update: AuthorUpdate) -> CatalogueResult<Author> {
        self.with_write(|conn| {
            let current = fetch_author(conn, id)?;
            let first_name = update
                .first_name
                .map(|n| n.trim().to_string())
                .unwrap_or(current.first_name);
            let last_name = update
                .last_name
                .map(|n| n.trim().to_string())
                .unwrap_or(current.last_name);
            let description = update.description.unwrap_or(current.description);
            validate_author_names(&first_name, &last_name)?;

            conn.execute(
                "UPDATE authors SET first_name = ?1, last_name = ?2, description = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![first_name, last_name, description, now_unix(), id],
            )?;
            let mut author = fetch_author(conn, id)?;
            author.book_count = Some(aggregation::count_books(conn, Relation::Authors, id)?);
            Ok(author)
        })
    }

    fn delete_authors(&self, ids: &[i64]) -> CatalogueResult<usize> {
        validate_delete_ids(ids, self.config.max_association_set)?;
        let deleted = self.with_write(|conn| delete_by_ids(conn, "authors", "author", ids))?;
        info!("Deleted {} authors", deleted);
        Ok(deleted)
    }

    fn list_authors(&self) -> CatalogueResult<Vec<Author>> {
        self.with_read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM authors a ORDER BY a.id",
                AUTHOR_COLUMNS
            ))?;
            let mut authors = stmt
                .query_map([], |r| parse_author_row(r, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            attach_counts(
                conn,
                Relation::Authors,
                authors.as_mut_slice(),
                |a| a.id,
                |a, n| a.book_count = Some(n),
            );
            Ok(authors)
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    fn create_category(&self, category: NewCategory) -> CatalogueResult<Category> {
        validate_new_category(&category)?;
        self.with_write(|conn| {
            let now = now_unix();
            conn.execute(
                "INSERT INTO categories (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                params![category.name.trim(), now],
            )?;
            let mut created = fetch_category(conn, conn.last_insert_rowid())?;
            created.book_count = Some(0);
            info!("Created category {} ({})", created.id, created.name);
            Ok(created)
        })
    }

    fn get_category(&self, id: i64) -> CatalogueResult<Category> {
        self.with_read(|conn| {
            let mut category = fetch_category(conn, id)?;
            category.book_count = Some(aggregation::count_books(conn, Relation::Categories, id)?);
            Ok(category)
        })
    }

    fn update_category(&self, id: i64, update: CategoryUpdate) -> CatalogueResult<Category> {
        self.with_write(|conn| {
            let current = fetch_category(conn, id)?;
            let name = update
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or(current.name);
            validate_category_name(&name)?;

            conn.execute(
                "UPDATE categories SET name = ?1, updated_at = ?2 WHERE id = ?3",
                params![name, now_unix(), id],
            )?;
            let mut category = fetch_category(conn, id)?;
            category.book_count = Some(aggregation::count_books(conn, Relation::Categories, id)?);
            Ok(category)
        })
    }

    fn delete_categories(&self, ids: &[i64]) -> CatalogueResult<usize> {
        validate_delete_ids(ids, self.config.max_association_set)?;
        let deleted =
            self.with_write(|conn| delete_by_ids(conn, "categories", "category", ids))?;
        info!("Deleted {} categories", deleted);
        Ok(deleted)
    }

    fn list_categories(&self) -> CatalogueResult<Vec<Category>> {
        self.with_read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM categories c ORDER BY c.id",
                CATEGORY_COLUMNS
            ))?;
            let mut categories = stmt
                .query_map([], |r| parse_category_row(r, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            attach_counts(
                conn,
                Relation::Categories,
                categories.as_mut_slice(),
                |c| c.id,
                |c, n| c.book_count = Some(n),
            );
            Ok(categories)
        })
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    fn count_books_for(&self, relation: Relation, related_id: i64) -> CatalogueResult<i64> {
        self.with_read(|conn| aggregation::count_books(conn, relation, related_id))
    }

    fn books_for(&self, relation: Relation, related_id: i64) -> CatalogueResult<Vec<Book>> {
        self.with_read(|conn| aggregation::books_for(conn, relation, related_id))
    }

    fn authors_for_book(&self, book_id: i64) -> CatalogueResult<Vec<Author>> {
        self.with_read(|conn| aggregation::authors_for_book(conn, book_id))
    }

    fn categories_for_book(&self, book_id: i64) -> CatalogueResult<Vec<Category>> {
        self.with_read(|conn| aggregation::categories_for_book(conn, book_id))
    }
}
