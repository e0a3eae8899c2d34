//! CatalogueStore trait definition.
//!
//! The HTTP layer only ever sees this trait, held as `Arc<dyn CatalogueStore>`.

use super::error::CatalogueResult;
use super::models::{
    Author, AuthorUpdate, Book, BookPage, BookUpdate, Category, CategoryUpdate, NewAuthor,
    NewBook, NewCategory, Relation,
};
use super::query_builder::BookFilters;

pub trait CatalogueStore: Send + Sync {
    // =========================================================================
    // Books
    // =========================================================================

    /// Insert a book together with its author and category sets.
    fn create_book(&self, book: NewBook) -> CatalogueResult<Book>;

    /// Get a book hydrated with its authors and categories.
    fn get_book(&self, id: i64) -> CatalogueResult<Book>;

    /// Apply a partial update. Association lists that are `Some` replace the
    /// stored set in the same transaction as the scalar fields.
    fn update_book(&self, id: i64, update: BookUpdate) -> CatalogueResult<Book>;

    /// Delete every listed book or none of them.
    fn delete_books(&self, ids: &[i64]) -> CatalogueResult<usize>;

    /// Filtered, sorted, paginated and hydrated listing.
    fn list_books(&self, filters: &BookFilters) -> CatalogueResult<BookPage>;

    // =========================================================================
    // Associations
    // =========================================================================

    /// Replace the full set of related ids of a book for one relation.
    fn replace_associations(
        &self,
        book_id: i64,
        relation: Relation,
        ids: &[i64],
    ) -> CatalogueResult<()>;

    // =========================================================================
    // Authors
    // =========================================================================

    fn create_author(&self, author: NewAuthor) -> CatalogueResult<Author>;

    /// Get an author with its book count.
    fn get_author(&self, id: i64) -> CatalogueResult<Author>;

    fn update_author(&self, id: i64, update: AuthorUpdate) -> CatalogueResult<Author>;

    fn delete_authors(&self, ids: &[i64]) -> CatalogueResult<usize>;

    /// All authors ordered by id, each with its book count.
    fn list_authors(&self) -> CatalogueResult<Vec<Author>>;

    // =========================================================================
    // Categories
    // =========================================================================

    fn create_category(&self, category: NewCategory) -> CatalogueResult<Category>;

    fn get_category(&self, id: i64) -> CatalogueResult<Category>;

    fn update_category(&self, id: i64, update: CategoryUpdate) -> CatalogueResult<Category>;

    fn delete_categories(&self, ids: &[i64]) -> CatalogueResult<usize>;

    fn list_categories(&self) -> CatalogueResult<Vec<Category>>;

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Number of books linked to an author or category. Unknown ids count 0.
    fn count_books_for(&self, relation: Relation, related_id: i64) -> CatalogueResult<i64>;

    /// Hydrated books linked to an existing author or category, by id.
    fn books_for(&self, relation: Relation, related_id: i64) -> CatalogueResult<Vec<Book>>;

    fn authors_for_book(&self, book_id: i64) -> CatalogueResult<Vec<Author>>;

    fn categories_for_book(&self, book_id: i64) -> CatalogueResult<Vec<Category>>;

    fn count_books_for_author(&self, author_id: i64) -> CatalogueResult<i64> {
        self.count_books_for(Relation::Authors, author_id)
    }

    fn count_books_for_category(&self, category_id: i64) -> CatalogueResult<i64> {
        self.count_books_for(Relation::Categories, category_id)
    }

    fn books_for_author(&self, author_id: i64) -> CatalogueResult<Vec<Book>> {
        self.books_for(Relation::Authors, author_id)
    }

    fn books_for_category(&self, category_id: i64) -> CatalogueResult<Vec<Book>> {
        self.books_for(Relation::Categories, category_id)
    }
}
