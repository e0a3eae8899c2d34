//! SQLite schema definitions for the book catalogue database.
//!
//! Entity tables use integer primary keys. The two junction tables carry a
//! unique (book, related) pair and cascade on delete of either side, so a
//! junction row can never outlive the rows it connects.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

// =============================================================================
// Entity Tables
// =============================================================================

const BOOKS_TABLE: Table = Table {
    name: "books",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("subtitle", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("image", &SqlType::Text, non_null = true),
        sqlite_column!("isbn", &SqlType::Text, non_null = true),
        sqlite_column!("page_count", &SqlType::Integer, non_null = true),
        sqlite_column!("published_date", &SqlType::Text, non_null = true),
        sqlite_column!("status", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_books_title", "title"), ("idx_books_status", "status")],
    unique_constraints: &[],
};

const AUTHORS_TABLE: Table = Table {
    name: "authors",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text, non_null = true),
        sqlite_column!("last_name", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_authors_last_name", "last_name")],
    unique_constraints: &[],
};

const CATEGORIES_TABLE: Table = Table {
    name: "categories",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_categories_name", "name")],
    unique_constraints: &[],
};

// =============================================================================
// Junction Tables
// =============================================================================

/// Book <-> Author relationship
const BOOK_AUTHORS_TABLE: Table = Table {
    name: "book_authors",
    columns: &[
        sqlite_column!(
            "book_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "books",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "author_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "authors",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        sqlite_column!("updated_at", &SqlType::Integer, non_null = true),
    ],
    // (book_id, author_id) unique index also serves lookups by book
    indices: &[("idx_book_authors_author", "author_id")],
    unique_constraints: &[&["book_id", "author_id"]],
};

/// Book <-> Category relationship
const BOOK_CATEGORIES_TABLE: Table = Table {
    name: "book_categories",
    columns: &[
        sqlite_column!(
            "book_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "books",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!(
            "category_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "categories",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        sqlite_column!("updated_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_book_categories_category", "category_id")],
    unique_constraints: &[&["book_id", "category_id"]],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const CATALOGUE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        BOOKS_TABLE,
        AUTHORS_TABLE,
        CATEGORIES_TABLE,
        BOOK_AUTHORS_TABLE,
        BOOK_CATEGORIES_TABLE,
    ],
    migration: None,
}];
