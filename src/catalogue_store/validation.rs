//! Validation for catalogue inputs.
//!
//! Field problems are collected rather than returned one at a time, so a
//! client sees every invalid field of a request at once.

use super::models::{NewAuthor, NewBook, NewCategory};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Field name -> message. The first message recorded for a field wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Validate the scalar fields of a book. Shared by create and by update once
/// the patch has been applied over the stored row.
pub fn validate_book_fields(title: &str, page_count: i64) -> ValidationResult<()> {
    let mut errors = ValidationErrors::default();
    errors.check(!title.trim().is_empty(), "title", "must be provided");
    errors.check(page_count >= 0, "page_count", "must not be negative");
    errors.into_result()
}

pub fn validate_new_book(book: &NewBook, max_association_set: usize) -> ValidationResult<()> {
    let mut errors = match validate_book_fields(&book.title, book.page_count) {
        Ok(()) => ValidationErrors::default(),
        Err(errors) => errors,
    };
    check_id_set(&mut errors, "authors", &book.authors, max_association_set);
    check_id_set(&mut errors, "categories", &book.categories, max_association_set);
    errors.into_result()
}

pub fn validate_author_names(first_name: &str, last_name: &str) -> ValidationResult<()> {
    let mut errors = ValidationErrors::default();
    errors.check(
        !(first_name.trim().is_empty() && last_name.trim().is_empty()),
        "author_name",
        "first_name or last_name must be provided",
    );
    errors.into_result()
}

pub fn validate_new_author(author: &NewAuthor) -> ValidationResult<()> {
    validate_author_names(&author.first_name, &author.last_name)
}

pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    let mut errors = ValidationErrors::default();
    errors.check(!name.trim().is_empty(), "name", "must be provided");
    errors.into_result()
}

pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

/// Ids of an association set: positive and at most `max` distinct values.
pub fn check_id_set(errors: &mut ValidationErrors, field: &str, ids: &[i64], max: usize) {
    if ids.iter().any(|id| *id <= 0) {
        errors.add(field, "must contain only positive ids");
        return;
    }
    let distinct = ids.iter().collect::<BTreeSet<_>>().len();
    if distinct > max {
        errors.add(
            field,
            &format!("must not contain more than {} distinct ids", max),
        );
    }
}

pub fn validate_id_set(field: &str, ids: &[i64], max: usize) -> ValidationResult<()> {
    let mut errors = ValidationErrors::default();
    check_id_set(&mut errors, field, ids, max);
    errors.into_result()
}

/// Ids for a bulk delete: same rules as an association set, but must not be
/// empty.
pub fn validate_delete_ids(ids: &[i64], max: usize) -> ValidationResult<()> {
    let mut errors = ValidationErrors::default();
    errors.check(!ids.is_empty(), "ids", "must contain at least one id");
    check_id_set(&mut errors, "ids", ids, max);
    errors.into_result()
}
