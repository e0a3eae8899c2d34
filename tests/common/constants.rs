//! Shared constants for end-to-end tests
//!
//! Ids follow insertion order in `fixtures::create_test_catalogue`, so they
//! are stable across runs. When the seeded data changes, update only this file.
#![allow(dead_code)]

// ============================================================================
// Authors
// ============================================================================

/// "Ursula Le Guin", author of BOOK_1
pub const AUTHOR_1_ID: i64 = 1;
pub const AUTHOR_1_NAME: &str = "Ursula Le Guin";

/// "Italo Calvino", author of BOOK_2 and co-credited on BOOK_3
pub const AUTHOR_2_ID: i64 = 2;
pub const AUTHOR_2_NAME: &str = "Italo Calvino";

/// "Jorge Luis Borges", author of BOOK_3
pub const AUTHOR_3_ID: i64 = 3;
pub const AUTHOR_3_NAME: &str = "Jorge Luis Borges";

/// Author with no books
pub const AUTHOR_4_ID: i64 = 4;

// ============================================================================
// Categories
// ============================================================================

pub const CATEGORY_FICTION_ID: i64 = 1;
pub const CATEGORY_FICTION_NAME: &str = "Fiction";

pub const CATEGORY_ESSAYS_ID: i64 = 2;
pub const CATEGORY_ESSAYS_NAME: &str = "Essays";

/// Category with no books
pub const CATEGORY_POETRY_ID: i64 = 3;

// ============================================================================
// Books
// ============================================================================

/// "The Dispossessed": AUTHOR_1, Fiction, status 1
pub const BOOK_1_ID: i64 = 1;
pub const BOOK_1_TITLE: &str = "The Dispossessed";

/// "Invisible Cities": AUTHOR_2, Fiction, status 1
pub const BOOK_2_ID: i64 = 2;
pub const BOOK_2_TITLE: &str = "Invisible Cities";

/// "Labyrinths": AUTHOR_2 + AUTHOR_3, Fiction + Essays, status 2
pub const BOOK_3_ID: i64 = 3;
pub const BOOK_3_TITLE: &str = "Labyrinths";

pub const SEEDED_BOOKS: i64 = 3;

/// An id no seeded entity uses
pub const MISSING_ID: i64 = 9999;

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
