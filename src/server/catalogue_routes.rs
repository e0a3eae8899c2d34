//! Catalogue HTTP routes.
//!
//! Provides endpoints for:
//! - Creating, reading, patching and bulk deleting books
//! - The same for authors and categories
//! - Filtered book listings and per-author / per-category book lists

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::errors::{bad_json, bad_query, NOT_FOUND_MESSAGE};
use super::state::{GuardedCatalogueStore, ServerState};
use super::ServerConfig;
use crate::catalogue_store::{
    AuthorUpdate, BookFilters, BookListQuery, BookUpdate, CatalogueError, CategoryUpdate,
    NewAuthor, NewBook, NewCategory,
};

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct DeleteIdsBody {
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Path ids that are not positive integers cannot name anything.
fn parse_id(raw: &str) -> Result<i64, CatalogueError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(CatalogueError::NotFound(NOT_FOUND_MESSAGE.to_string())),
    }
}

fn read_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value).map_err(bad_json)
}

fn success(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(json!({ "success": body }))).into_response()
}

// =============================================================================
// Books
// =============================================================================

/// POST /book
async fn create_book(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> Response {
    let new_book = match read_json(body) {
        Ok(b) => b,
        Err(response) => return response,
    };
    match store.create_book(new_book) {
        Ok(book) => success(
            StatusCode::CREATED,
            json!({
                "book_id": book.id,
                "book_title": book.title,
                "book_status": book.status,
                "client_message": format!("{:?} has been added to your collection!", book.title),
            }),
        ),
        Err(e) => e.into_response(),
    }
}

/// GET /books
async fn list_books(
    State(store): State<GuardedCatalogueStore>,
    State(config): State<ServerConfig>,
    query: Result<Query<BookListQuery>, QueryRejection>,
) -> Response {
    let Query(raw) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_query(rejection),
    };
    let filters = match BookFilters::parse(&raw, config.max_page_size, config.max_filter_ids) {
        Ok(f) => f,
        Err(e) => return e.into_response(),
    };
    debug!("Listing books with {:?}", filters);
    match store.list_books(&filters) {
        Ok(page) => Json(json!({ "books": page.books, "metadata": page.metadata })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /books/{id}
async fn get_book(State(store): State<GuardedCatalogueStore>, Path(id): Path<String>) -> Response {
    match parse_id(&id).and_then(|id| store.get_book(id)) {
        Ok(book) => Json(json!({ "book": book })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /books/{id}
async fn update_book(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
    body: Result<Json<BookUpdate>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let update = match read_json(body) {
        Ok(u) => u,
        Err(response) => return response,
    };
    match store.update_book(id, update) {
        Ok(book) => success(
            StatusCode::OK,
            json!({ "client_message": "book has been updated", "book": book }),
        ),
        Err(e) => e.into_response(),
    }
}

/// DELETE /books
async fn delete_books(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<DeleteIdsBody>, JsonRejection>,
) -> Response {
    let body = match read_json(body) {
        Ok(b) => b,
        Err(response) => return response,
    };
    match store.delete_books(&body.ids) {
        Ok(deleted) => {
            Json(json!({ "message": "books successfully deleted", "deleted": deleted }))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

// =============================================================================
// Authors
// =============================================================================

/// POST /author
async fn create_author(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<NewAuthor>, JsonRejection>,
) -> Response {
    let new_author = match read_json(body) {
        Ok(a) => a,
        Err(response) => return response,
    };
    match store.create_author(new_author) {
        Ok(author) => success(
            StatusCode::CREATED,
            json!({
                "author_id": author.id,
                "author_name": author.author_name,
                "client_message": format!(
                    "Author: {:?} has been added to your catalogue",
                    author.author_name
                ),
            }),
        ),
        Err(e) => e.into_response(),
    }
}

/// GET /authors
async fn list_authors(State(store): State<GuardedCatalogueStore>) -> Response {
    match store.list_authors() {
        Ok(authors) => Json(json!({ "results": authors })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /authors/{id}
async fn get_author(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
) -> Response {
    match parse_id(&id).and_then(|id| store.get_author(id)) {
        Ok(author) => Json(json!({ "author": author })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /authors/{id}/books
async fn get_author_books(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
) -> Response {
    match parse_id(&id).and_then(|id| store.books_for_author(id)) {
        Ok(books) => Json(json!({ "books": books })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /authors/{id}
async fn update_author(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
    body: Result<Json<AuthorUpdate>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let update = match read_json(body) {
        Ok(u) => u,
        Err(response) => return response,
    };
    match store.update_author(id, update) {
        Ok(author) => success(
            StatusCode::OK,
            json!({ "client_message": "author has been updated", "author": author }),
        ),
        Err(e) => e.into_response(),
    }
}

/// DELETE /authors
async fn delete_authors(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<DeleteIdsBody>, JsonRejection>,
) -> Response {
    let body = match read_json(body) {
        Ok(b) => b,
        Err(response) => return response,
    };
    match store.delete_authors(&body.ids) {
        Ok(deleted) => {
            Json(json!({ "message": "authors successfully deleted", "deleted": deleted }))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

// =============================================================================
// Categories
// =============================================================================

/// POST /category
async fn create_category(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<NewCategory>, JsonRejection>,
) -> Response {
    let new_category = match read_json(body) {
        Ok(c) => c,
        Err(response) => return response,
    };
    match store.create_category(new_category) {
        Ok(category) => success(
            StatusCode::CREATED,
            json!({
                "category_id": category.id,
                "category_name": category.name,
                "client_message": format!("{:?} has been added to your catalogue", category.name),
            }),
        ),
        Err(e) => e.into_response(),
    }
}

/// GET /categories
async fn list_categories(State(store): State<GuardedCatalogueStore>) -> Response {
    match store.list_categories() {
        Ok(categories) => Json(json!({ "results": categories })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /categories/{id}
async fn get_category(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
) -> Response {
    match parse_id(&id).and_then(|id| store.get_category(id)) {
        Ok(category) => Json(json!({ "category": category })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /categories/{id}/books
async fn get_category_books(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
) -> Response {
    match parse_id(&id).and_then(|id| store.books_for_category(id)) {
        Ok(books) => Json(json!({ "books": books })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PATCH /categories/{id}
async fn update_category(
    State(store): State<GuardedCatalogueStore>,
    Path(id): Path<String>,
    body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let update = match read_json(body) {
        Ok(u) => u,
        Err(response) => return response,
    };
    match store.update_category(id, update) {
        Ok(category) => success(
            StatusCode::OK,
            json!({ "client_message": "category name has been updated", "category": category }),
        ),
        Err(e) => e.into_response(),
    }
}

/// DELETE /categories
async fn delete_categories(
    State(store): State<GuardedCatalogueStore>,
    body: Result<Json<DeleteIdsBody>, JsonRejection>,
) -> Response {
    let body = match read_json(body) {
        Ok(b) => b,
        Err(response) => return response,
    };
    match store.delete_categories(&body.ids) {
        Ok(deleted) => {
            Json(json!({ "message": "categories successfully deleted", "deleted": deleted }))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Create catalogue routes, to be nested under `/v1`.
///
/// Books:
/// - POST /book, GET|DELETE /books, GET|PATCH /books/{id}
///
/// Authors:
/// - POST /author, GET|DELETE /authors, GET|PATCH /authors/{id}, GET /authors/{id}/books
///
/// Categories:
/// - POST /category, GET|DELETE /categories, GET|PATCH /categories/{id},
///   GET /categories/{id}/books
pub fn catalogue_routes() -> Router<ServerState> {
    let book_routes = Router::new()
        .route("/book", post(create_book))
        .route("/books", get(list_books).delete(delete_books))
        .route("/books/{id}", get(get_book).patch(update_book));

    let author_routes = Router::new()
        .route("/author", post(create_author))
        .route("/authors", get(list_authors).delete(delete_authors))
        .route("/authors/{id}", get(get_author).patch(update_author))
        .route("/authors/{id}/books", get(get_author_books));

    let category_routes = Router::new()
        .route("/category", post(create_category))
        .route("/categories", get(list_categories).delete(delete_categories))
        .route("/categories/{id}", get(get_category).patch(update_category))
        .route("/categories/{id}/books", get(get_category_books));

    book_routes.merge(author_routes).merge(category_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_positive_integers() {
        assert_eq!(parse_id("12").unwrap(), 12);
        for bad in ["0", "-3", "abc", "1.5", ""] {
            assert!(matches!(parse_id(bad), Err(CatalogueError::NotFound(_))));
        }
    }
}
