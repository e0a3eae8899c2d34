//! Test fixture creation for the catalogue database

use super::constants::*;
use anyhow::Result;
use book_catalogue_server::catalogue_store::{
    CatalogueStore, NewAuthor, NewBook, NewCategory, SqliteCatalogueStore, StoreConfig,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn author(first_name: &str, last_name: &str) -> NewAuthor {
    NewAuthor {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        description: String::new(),
    }
}

fn category(name: &str) -> NewCategory {
    NewCategory {
        name: name.to_string(),
    }
}

fn book(title: &str, status: i64, authors: &[i64], categories: &[i64]) -> NewBook {
    NewBook {
        title: title.to_string(),
        status,
        authors: authors.to_vec(),
        categories: categories.to_vec(),
        ..Default::default()
    }
}

/// Creates a temporary catalogue with 4 authors, 3 categories and 3 books.
/// Returns (temp_dir, db_path)
pub fn create_test_catalogue() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("catalogue.db");

    let store = SqliteCatalogueStore::new(&db_path, StoreConfig::default())?;

    store.create_author(author("Ursula", "Le Guin"))?;
    store.create_author(author("Italo", "Calvino"))?;
    store.create_author(author("Jorge Luis", "Borges"))?;
    store.create_author(author("Anne", "Carson"))?;

    store.create_category(category(CATEGORY_FICTION_NAME))?;
    store.create_category(category(CATEGORY_ESSAYS_NAME))?;
    store.create_category(category("Poetry"))?;

    store.create_book(book(
        BOOK_1_TITLE,
        1,
        &[AUTHOR_1_ID],
        &[CATEGORY_FICTION_ID],
    ))?;
    store.create_book(book(
        BOOK_2_TITLE,
        1,
        &[AUTHOR_2_ID],
        &[CATEGORY_FICTION_ID],
    ))?;
    store.create_book(book(
        BOOK_3_TITLE,
        2,
        &[AUTHOR_2_ID, AUTHOR_3_ID],
        &[CATEGORY_FICTION_ID, CATEGORY_ESSAYS_ID],
    ))?;

    Ok((dir, db_path))
}
