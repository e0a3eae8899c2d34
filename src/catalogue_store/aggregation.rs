//! Read-side aggregation: book counts and batch hydration.
//!
//! Every function here is a pure read against an open connection. Hydration
//! of N books costs one query per relation per chunk of ids, never one per
//! book.

use super::error::CatalogueResult;
use super::models::{Author, Book, Category, Relation};
use super::query_builder::placeholders;
use super::store::{
    ensure_exists, parse_author_row, parse_book_row, parse_category_row, AUTHOR_COLUMNS,
    BOOK_COLUMNS, CATEGORY_COLUMNS,
};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;

/// Upper bound on ids per `IN (...)` list.
pub const HYDRATION_CHUNK_SIZE: usize = 500;

pub fn count_books(conn: &Connection, relation: Relation, related_id: i64) -> CatalogueResult<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        relation.junction_table(),
        relation.related_column()
    );
    Ok(conn.query_row(&sql, params![related_id], |r| r.get(0))?)
}

/// Book counts for many related ids in one grouped query per chunk. Ids with
/// no books are absent from the map.
pub fn count_books_batch(
    conn: &Connection,
    relation: Relation,
    related_ids: &[i64],
) -> CatalogueResult<HashMap<i64, i64>> {
    let mut counts = HashMap::with_capacity(related_ids.len());
    for chunk in related_ids.chunks(HYDRATION_CHUNK_SIZE) {
        let sql = format!(
            "SELECT {col}, COUNT(*) FROM {table} WHERE {col} IN ({ids}) GROUP BY {col}",
            col = relation.related_column(),
            table = relation.junction_table(),
            ids = placeholders(chunk.len()),
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |r| {
            Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (id, count) = row?;
            counts.insert(id, count);
        }
    }
    Ok(counts)
}

fn authors_by_book(conn: &Connection, book_ids: &[i64]) -> CatalogueResult<HashMap<i64, Vec<Author>>> {
    let mut by_book: HashMap<i64, Vec<Author>> = HashMap::new();
    for chunk in book_ids.chunks(HYDRATION_CHUNK_SIZE) {
        let sql = format!(
            "SELECT ba.book_id, {} FROM book_authors ba
             JOIN authors a ON a.id = ba.author_id
             WHERE ba.book_id IN ({})
             ORDER BY ba.book_id, a.id",
            AUTHOR_COLUMNS,
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |r| {
            Ok((r.get::<_, i64>(0)?, parse_author_row(r, 1)?))
        })?;
        for row in rows {
            let (book_id, author) = row?;
            by_book.entry(book_id).or_default().push(author);
        }
    }
    Ok(by_book)
}

fn categories_by_book(
    conn: &Connection,
    book_ids: &[i64],
) -> CatalogueResult<HashMap<i64, Vec<Category>>> {
    let mut by_book: HashMap<i64, Vec<Category>> = HashMap::new();
    for chunk in book_ids.chunks(HYDRATION_CHUNK_SIZE) {
        let sql = format!(
            "SELECT bc.book_id, {} FROM book_categories bc
             JOIN categories c ON c.id = bc.category_id
             WHERE bc.book_id IN ({})
             ORDER BY bc.book_id, c.id",
            CATEGORY_COLUMNS,
            placeholders(chunk.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |r| {
            Ok((r.get::<_, i64>(0)?, parse_category_row(r, 1)?))
        })?;
        for row in rows {
            let (book_id, category) = row?;
            by_book.entry(book_id).or_default().push(category);
        }
    }
    Ok(by_book)
}

/// Attach authors and categories to every book. Either both relations are
/// attached or, on error, the books are left untouched.
pub fn hydrate_books(conn: &Connection, books: &mut [Book]) -> CatalogueResult<()> {
    if books.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let mut authors = authors_by_book(conn, &ids)?;
    let mut categories = categories_by_book(conn, &ids)?;
    for book in books.iter_mut() {
        book.set_authors(authors.remove(&book.id).unwrap_or_default());
        book.set_categories(categories.remove(&book.id).unwrap_or_default());
    }
    Ok(())
}

pub fn authors_for_book(conn: &Connection, book_id: i64) -> CatalogueResult<Vec<Author>> {
    ensure_exists(conn, "books", "book", book_id)?;
    Ok(authors_by_book(conn, &[book_id])?
        .remove(&book_id)
        .unwrap_or_default())
}

pub fn categories_for_book(conn: &Connection, book_id: i64) -> CatalogueResult<Vec<Category>> {
    ensure_exists(conn, "books", "book", book_id)?;
    Ok(categories_by_book(conn, &[book_id])?
        .remove(&book_id)
        .unwrap_or_default())
}

/// Hydrated books linked to one author or category, ascending by id.
pub fn books_for(conn: &Connection, relation: Relation, related_id: i64) -> CatalogueResult<Vec<Book>> {
    ensure_exists(
        conn,
        relation.related_table(),
        relation.entity_name(),
        related_id,
    )?;
    let sql = format!(
        "SELECT {} FROM books b JOIN {} j ON j.book_id = b.id WHERE j.{} = ?1 ORDER BY b.id",
        BOOK_COLUMNS,
        relation.junction_table(),
        relation.related_column()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut books = stmt
        .query_map(params![related_id], parse_book_row)?
        .collect::<Result<Vec<_>, _>>()?;
    hydrate_books(conn, &mut books)?;
    Ok(books)
}
