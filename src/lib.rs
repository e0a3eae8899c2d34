//! Book Catalogue Server Library
//!
//! Exposes the store, configuration and HTTP layers for the binary and for
//! end-to-end tests.

pub mod catalogue_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

pub use catalogue_store::{CatalogueStore, SqliteCatalogueStore};
pub use server::{run_server, RequestsLoggingLevel};
