mod aggregation;
mod associations;
mod error;
mod models;
mod query_builder;
mod schema;
mod store;
mod trait_def;
mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregation::HYDRATION_CHUNK_SIZE;
pub use error::{CatalogueError, CatalogueResult};
pub use models::*;
pub use query_builder::{
    build_book_query, BookFilters, BookListQuery, BookQuery, SortKey, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE, MAX_PAGE,
};
pub use schema::CATALOGUE_VERSIONED_SCHEMAS;
pub use store::{
    SqliteCatalogueStore, StoreConfig, DEFAULT_MAX_ASSOCIATION_SET, DEFAULT_READ_POOL_SIZE,
    DEFAULT_STORE_TIMEOUT, MAX_ASSOCIATION_SET_LIMIT,
};
pub use trait_def::CatalogueStore;
pub use validation::{ValidationErrors, ValidationResult};
