//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalogue-server endpoints.
//!
//! When API routes or request formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn send_json(&self, method: reqwest::Method, path: &str, body: &Value) -> Response {
        self.client
            .request(method.clone(), self.url(path))
            .json(body)
            .send()
            .await
            .unwrap_or_else(|e| panic!("{} {} failed: {}", method, path, e))
    }

    // ========================================================================
    // Healthcheck
    // ========================================================================

    /// GET /v1/healthcheck
    pub async fn healthcheck(&self) -> Response {
        self.get("/healthcheck").await
    }

    // ========================================================================
    // Books
    // ========================================================================

    /// POST /v1/book
    pub async fn create_book(&self, body: Value) -> Response {
        self.send_json(reqwest::Method::POST, "/book", &body).await
    }

    /// GET /v1/books?{query}
    pub async fn list_books(&self, query: &str) -> Response {
        if query.is_empty() {
            self.get("/books").await
        } else {
            self.get(&format!("/books?{}", query)).await
        }
    }

    /// GET /v1/books/{id}
    pub async fn get_book(&self, id: i64) -> Response {
        self.get(&format!("/books/{}", id)).await
    }

    /// PATCH /v1/books/{id}
    pub async fn update_book(&self, id: i64, body: Value) -> Response {
        self.send_json(reqwest::Method::PATCH, &format!("/books/{}", id), &body)
            .await
    }

    /// DELETE /v1/books
    pub async fn delete_books(&self, ids: &[i64]) -> Response {
        self.send_json(reqwest::Method::DELETE, "/books", &json!({ "ids": ids }))
            .await
    }

    // ========================================================================
    // Authors
    // ========================================================================

    /// POST /v1/author
    pub async fn create_author(&self, first_name: &str, last_name: &str) -> Response {
        self.send_json(
            reqwest::Method::POST,
            "/author",
            &json!({ "first_name": first_name, "last_name": last_name }),
        )
        .await
    }

    /// GET /v1/authors
    pub async fn list_authors(&self) -> Response {
        self.get("/authors").await
    }

    /// GET /v1/authors/{id}
    pub async fn get_author(&self, id: i64) -> Response {
        self.get(&format!("/authors/{}", id)).await
    }

    /// GET /v1/authors/{id}/books
    pub async fn get_author_books(&self, id: i64) -> Response {
        self.get(&format!("/authors/{}/books", id)).await
    }

    /// PATCH /v1/authors/{id}
    pub async fn update_author(&self, id: i64, body: Value) -> Response {
        self.send_json(reqwest::Method::PATCH, &format!("/authors/{}", id), &body)
            .await
    }

    /// DELETE /v1/authors
    pub async fn delete_authors(&self, ids: &[i64]) -> Response {
        self.send_json(reqwest::Method::DELETE, "/authors", &json!({ "ids": ids }))
            .await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// POST /v1/category
    pub async fn create_category(&self, name: &str) -> Response {
        self.send_json(reqwest::Method::POST, "/category", &json!({ "name": name }))
            .await
    }

    /// GET /v1/categories
    pub async fn list_categories(&self) -> Response {
        self.get("/categories").await
    }

    /// GET /v1/categories/{id}
    pub async fn get_category(&self, id: i64) -> Response {
        self.get(&format!("/categories/{}", id)).await
    }

    /// GET /v1/categories/{id}/books
    pub async fn get_category_books(&self, id: i64) -> Response {
        self.get(&format!("/categories/{}/books", id)).await
    }

    /// PATCH /v1/categories/{id}
    pub async fn update_category(&self, id: i64, body: Value) -> Response {
        self.send_json(reqwest::Method::PATCH, &format!("/categories/{}", id), &body)
            .await
    }

    /// DELETE /v1/categories
    pub async fn delete_categories(&self, ids: &[i64]) -> Response {
        self.send_json(
            reqwest::Method::DELETE,
            "/categories",
            &json!({ "ids": ids }),
        )
        .await
    }
}
