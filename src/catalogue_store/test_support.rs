//! Shared helpers for store tests: a store on a temporary database file plus
//! shorthands for seeding entities.

use super::{CatalogueStore, NewAuthor, NewBook, NewCategory, SqliteCatalogueStore, StoreConfig};
use tempfile::TempDir;

pub const TEST_DB_FILE: &str = "catalogue.db";

/// The returned `TempDir` owns the database file and must outlive the store.
pub fn open_store_with(config: StoreConfig) -> (TempDir, SqliteCatalogueStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteCatalogueStore::new(dir.path().join(TEST_DB_FILE), config).unwrap();
    (dir, store)
}

pub fn open_store() -> (TempDir, SqliteCatalogueStore) {
    open_store_with(StoreConfig::default())
}

pub fn open_store_with_max_set(max_association_set: usize) -> (TempDir, SqliteCatalogueStore) {
    open_store_with(StoreConfig {
        max_association_set,
        ..Default::default()
    })
}

pub fn add_author(store: &dyn CatalogueStore, first_name: &str, last_name: &str) -> i64 {
    store
        .create_author(NewAuthor {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            description: String::new(),
        })
        .unwrap()
        .id
}

pub fn add_category(store: &dyn CatalogueStore, name: &str) -> i64 {
    store
        .create_category(NewCategory {
            name: name.to_string(),
        })
        .unwrap()
        .id
}

pub fn add_book(
    store: &dyn CatalogueStore,
    title: &str,
    authors: &[i64],
    categories: &[i64],
) -> i64 {
    store
        .create_book(NewBook {
            title: title.to_string(),
            authors: authors.to_vec(),
            categories: categories.to_vec(),
            ..Default::default()
        })
        .unwrap()
        .id
}
