//! Catalogue models for SQLite-backed storage.
//!
//! Output records carry both the raw unix timestamps and the day-precision
//! `date_added` / `date_updated` strings clients display.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Day precision, `dd/mm/YYYY`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// =============================================================================
// Relations
// =============================================================================

/// One of the two many-to-many relations a book participates in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Relation {
    Authors,
    Categories,
}

impl Relation {
    pub fn junction_table(&self) -> &'static str {
        match self {
            Relation::Authors => "book_authors",
            Relation::Categories => "book_categories",
        }
    }

    /// Column of the junction table pointing at the related entity.
    pub fn related_column(&self) -> &'static str {
        match self {
            Relation::Authors => "author_id",
            Relation::Categories => "category_id",
        }
    }

    pub fn related_table(&self) -> &'static str {
        match self {
            Relation::Authors => "authors",
            Relation::Categories => "categories",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Relation::Authors => "author",
            Relation::Categories => "category",
        }
    }
}

// =============================================================================
// Core Entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub author_name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub date_added: String,
    pub date_updated: String,
    /// Number of books linked to this author, filled by the aggregation
    /// reader on author reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_count: Option<i64>,
}

impl Author {
    pub fn display_name(first_name: &str, last_name: &str) -> String {
        format!("{} {}", first_name, last_name).trim().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub date_added: String,
    pub date_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_count: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
    pub isbn: String,
    pub page_count: i64,
    pub published_date: String,
    pub status: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub date_added: String,
    pub date_updated: String,
    pub author_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
}

impl Book {
    /// Attach related records, keeping the id lists in step with them.
    pub fn set_authors(&mut self, authors: Vec<Author>) {
        self.author_ids = authors.iter().map(|a| a.id).collect();
        self.authors = authors;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.category_ids = categories.iter().map(|c| c.id).collect();
        self.categories = categories;
    }
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
    pub isbn: String,
    pub page_count: i64,
    pub published_date: String,
    pub status: i64,
    pub authors: Vec<i64>,
    pub categories: Vec<i64>,
}

/// Partial update of a book. `None` leaves a field untouched; for the two
/// association lists `Some(vec![])` clears the set while `None` keeps it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub isbn: Option<String>,
    pub page_count: Option<i64>,
    pub published_date: Option<String>,
    pub status: Option<i64>,
    #[serde(alias = "updated_authors")]
    pub authors: Option<Vec<i64>>,
    #[serde(alias = "updated_categories")]
    pub categories: Option<Vec<i64>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
}

// =============================================================================
// Listing
// =============================================================================

/// Pagination facts returned next to a page of books.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListMetadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl ListMetadata {
    /// All zero when nothing matched.
    pub fn new(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 || page_size <= 0 {
            return ListMetadata::default();
        }
        ListMetadata {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub metadata: ListMetadata,
}
