//! Filtered listing queries over books.
//!
//! Raw query-string values are parsed into [`BookFilters`] first; every
//! problem is reported as a validation error before any SQL is produced.
//! The SQL itself only ever contains fixed fragments and `?` placeholders.
//! Sort keys come from a closed allow-list and every value supplied by the
//! caller travels as a bound parameter.

use super::error::{CatalogueError, CatalogueResult};
use super::store::BOOK_COLUMNS;
use super::validation::ValidationErrors;
use rusqlite::types::Value;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE: i64 = 10_000_000;

/// Listing parameters exactly as they arrive from a client.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookListQuery {
    pub title: Option<String>,
    /// Comma-separated author ids.
    pub authors: Option<String>,
    /// Comma-separated category ids.
    pub categories: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    IdAsc,
    IdDesc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALLOWED: &'static [&'static str] = &["id", "title", "-id", "-title"];

    pub fn from_param(value: &str) -> Option<SortKey> {
        match value {
            "id" => Some(SortKey::IdAsc),
            "-id" => Some(SortKey::IdDesc),
            "title" => Some(SortKey::TitleAsc),
            "-title" => Some(SortKey::TitleDesc),
            _ => None,
        }
    }

    /// ORDER BY body. Non-id sorts fall back to ascending id so equal keys
    /// always come back in the same order.
    fn order_by(&self) -> &'static str {
        match self {
            SortKey::IdAsc => "b.id ASC",
            SortKey::IdDesc => "b.id DESC",
            SortKey::TitleAsc => "b.title ASC, b.id ASC",
            SortKey::TitleDesc => "b.title DESC, b.id ASC",
        }
    }
}

/// Parsed, bounded listing filters. Absent fields do not filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookFilters {
    pub title: Option<String>,
    pub author_ids: Option<Vec<i64>>,
    pub category_ids: Option<Vec<i64>>,
    pub status: Option<i64>,
    pub sort: SortKey,
    pub page: i64,
    pub page_size: i64,
}

impl Default for BookFilters {
    fn default() -> Self {
        BookFilters {
            title: None,
            author_ids: None,
            category_ids: None,
            status: None,
            sort: SortKey::default(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BookFilters {
    /// `max_filter_ids` bounds the distinct ids accepted in each of the
    /// `authors` and `categories` lists.
    pub fn parse(
        raw: &BookListQuery,
        max_page_size: i64,
        max_filter_ids: usize,
    ) -> CatalogueResult<BookFilters> {
        let mut errors = ValidationErrors::default();

        let title = raw
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let author_ids = parse_id_list(
            &mut errors,
            "authors",
            raw.authors.as_deref(),
            max_filter_ids,
        );
        let category_ids = parse_id_list(
            &mut errors,
            "categories",
            raw.categories.as_deref(),
            max_filter_ids,
        );
        let status = parse_int(&mut errors, "status", raw.status.as_deref());

        let sort = match raw.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => SortKey::default(),
            Some(value) => SortKey::from_param(value).unwrap_or_else(|| {
                errors.add(
                    "sort",
                    &format!("must be one of {}", SortKey::ALLOWED.join(", ")),
                );
                SortKey::default()
            }),
        };

        let page = parse_int(&mut errors, "page", raw.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        errors.check(page > 0, "page", "must be greater than zero");
        errors.check(
            page <= MAX_PAGE,
            "page",
            &format!("must be a maximum of {}", MAX_PAGE),
        );

        let page_size = parse_int(&mut errors, "page_size", raw.page_size.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE.min(max_page_size));
        errors.check(page_size > 0, "page_size", "must be greater than zero");
        errors.check(
            page_size <= max_page_size,
            "page_size",
            &format!("must be a maximum of {}", max_page_size),
        );

        if !errors.is_empty() {
            return Err(CatalogueError::Validation(errors));
        }

        Ok(BookFilters {
            title,
            author_ids,
            category_ids,
            status,
            sort,
            page,
            page_size,
        })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

fn parse_int(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<i64> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, "must be an integer value");
            None
        }
    }
}

/// Empty segments are skipped, so `"1,2,"` reads as `[1, 2]` and `""` as no
/// filter at all. Duplicates collapse, keeping first-seen order.
fn parse_id_list(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&str>,
    max_ids: usize,
) -> Option<Vec<i64>> {
    let raw = raw?;
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<i64>() {
            Ok(id) if id > 0 => {
                if seen.insert(id) {
                    if ids.len() == max_ids {
                        errors.add(field, &format!("must contain at most {} ids", max_ids));
                        return None;
                    }
                    ids.push(id);
                }
            }
            _ => {
                errors.add(field, "must be a comma-separated list of positive integer ids");
                return None;
            }
        }
    }
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// A page query and its matching count query. `count_params` is the prefix
/// of `params` without LIMIT and OFFSET.
#[derive(Clone, Debug, PartialEq)]
pub struct BookQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub count_sql: String,
    pub count_params: Vec<Value>,
}

pub fn build_book_query(filters: &BookFilters) -> BookQuery {
    let mut joins = String::new();
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(title) = &filters.title {
        conditions.push("b.title LIKE ? ESCAPE '\\'".to_string());
        params.push(Value::Text(format!("%{}%", escape_like(title))));
    }
    if let Some(ids) = &filters.author_ids {
        joins.push_str(" JOIN book_authors ba ON ba.book_id = b.id");
        conditions.push(format!("ba.author_id IN ({})", placeholders(ids.len())));
        params.extend(ids.iter().map(|id| Value::Integer(*id)));
    }
    if let Some(ids) = &filters.category_ids {
        joins.push_str(" JOIN book_categories bc ON bc.book_id = b.id");
        conditions.push(format!("bc.category_id IN ({})", placeholders(ids.len())));
        params.extend(ids.iter().map(|id| Value::Integer(*id)));
    }
    if let Some(status) = filters.status {
        conditions.push("b.status = ?".to_string());
        params.push(Value::Integer(status));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    // A book with several matching authors joins to several rows.
    let distinct = if joins.is_empty() { "" } else { "DISTINCT " };

    let count_sql = format!(
        "SELECT COUNT(DISTINCT b.id) FROM books b{}{}",
        joins, where_clause
    );
    let sql = format!(
        "SELECT {}{} FROM books b{}{} ORDER BY {} LIMIT ? OFFSET ?",
        distinct,
        BOOK_COLUMNS,
        joins,
        where_clause,
        filters.sort.order_by()
    );

    let count_params = params.clone();
    params.push(Value::Integer(filters.limit()));
    params.push(Value::Integer(filters.offset()));

    BookQuery {
        sql,
        params,
        count_sql,
        count_params,
    }
}

pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue_store::schema::CATALOGUE_VERSIONED_SCHEMAS;
    use rusqlite::{params_from_iter, Connection};

    fn raw() -> BookListQuery {
        BookListQuery::default()
    }

    fn parse(raw: &BookListQuery) -> CatalogueResult<BookFilters> {
        BookFilters::parse(raw, 100, 1000)
    }

    fn validation_field(err: CatalogueError, field: &str) -> bool {
        match err {
            CatalogueError::Validation(errors) => errors.get(field).is_some(),
            _ => false,
        }
    }

    #[test]
    fn defaults_apply_when_nothing_given() {
        let filters = parse(&raw()).unwrap();
        assert_eq!(filters, BookFilters::default());
        assert_eq!(filters.offset(), 0);
    }

    #[test]
    fn default_page_size_respects_smaller_maximum() {
        let filters = BookFilters::parse(&raw(), 5, 1000).unwrap();
        assert_eq!(filters.page_size, 5);
    }

    #[test]
    fn rejects_sort_outside_allow_list() {
        for bad in ["name", "id; DROP TABLE books", "b.title", "--id"] {
            let mut q = raw();
            q.sort = Some(bad.to_string());
            assert!(validation_field(parse(&q).unwrap_err(), "sort"), "{}", bad);
        }
    }

    #[test]
    fn rejects_non_numeric_id_lists() {
        let mut q = raw();
        q.authors = Some("1,two".to_string());
        assert!(validation_field(parse(&q).unwrap_err(), "authors"));

        let mut q = raw();
        q.categories = Some("1) OR 1=1 --".to_string());
        assert!(validation_field(parse(&q).unwrap_err(), "categories"));
    }

    #[test]
    fn rejects_id_lists_over_the_bound() {
        let ids = |n: i64| {
            (1..=n)
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };

        let mut q = raw();
        q.authors = Some(ids(40_000));
        assert!(validation_field(
            BookFilters::parse(&q, 100, 1000).unwrap_err(),
            "authors"
        ));

        let mut q = raw();
        q.categories = Some(ids(4));
        assert!(validation_field(
            BookFilters::parse(&q, 100, 3).unwrap_err(),
            "categories"
        ));

        // duplicates do not count against the bound
        let mut q = raw();
        q.categories = Some("2,2,2,1,1".to_string());
        let filters = BookFilters::parse(&q, 100, 2).unwrap();
        assert_eq!(filters.category_ids, Some(vec![2, 1]));
    }

    #[test]
    fn rejects_out_of_range_pagination() {
        let mut q = raw();
        q.page = Some("0".to_string());
        assert!(validation_field(parse(&q).unwrap_err(), "page"));

        let mut q = raw();
        q.page_size = Some("101".to_string());
        assert!(validation_field(parse(&q).unwrap_err(), "page_size"));

        let mut q = raw();
        q.page_size = Some("many".to_string());
        assert!(validation_field(parse(&q).unwrap_err(), "page_size"));
    }

    #[test]
    fn id_lists_tolerate_trailing_commas_and_duplicates() {
        let mut q = raw();
        q.authors = Some("3, 1,3,".to_string());
        q.categories = Some(",".to_string());
        let filters = parse(&q).unwrap();
        assert_eq!(filters.author_ids, Some(vec![3, 1]));
        assert_eq!(filters.category_ids, None);
    }

    #[test]
    fn no_filters_means_no_joins() {
        let query = build_book_query(&BookFilters::default());
        assert!(!query.sql.contains("JOIN"));
        assert!(!query.sql.contains("WHERE"));
        assert!(query.sql.ends_with("ORDER BY b.id ASC LIMIT ? OFFSET ?"));
        assert_eq!(query.params, vec![Value::Integer(20), Value::Integer(0)]);
        assert!(query.count_params.is_empty());
    }

    #[test]
    fn combines_filters_with_and_and_binds_every_value() {
        let filters = BookFilters {
            title: Some("dune".to_string()),
            author_ids: Some(vec![1, 2]),
            category_ids: Some(vec![7]),
            status: Some(1),
            sort: SortKey::TitleDesc,
            page: 3,
            page_size: 10,
        };
        let query = build_book_query(&filters);

        assert!(query.sql.contains("JOIN book_authors ba"));
        assert!(query.sql.contains("JOIN book_categories bc"));
        assert!(query.sql.contains(
            "b.title LIKE ? ESCAPE '\\' AND ba.author_id IN (?,?) AND bc.category_id IN (?) AND b.status = ?"
        ));
        assert!(query.sql.contains("ORDER BY b.title DESC, b.id ASC"));
        assert!(!query.sql.contains("dune"));
        assert_eq!(
            query.params,
            vec![
                Value::Text("%dune%".to_string()),
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(7),
                Value::Integer(1),
                Value::Integer(10),
                Value::Integer(20),
            ]
        );
        assert_eq!(query.count_params.len(), 5);
        assert!(query.count_sql.starts_with("SELECT COUNT(DISTINCT b.id)"));
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        CATALOGUE_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        let books = [
            (1, "Same"),
            (2, "Alpha"),
            (3, "Same"),
            (4, "Same"),
            (5, "Zeta"),
            (6, "50% off"),
        ];
        for (id, title) in books {
            conn.execute(
                "INSERT INTO books (id, title, subtitle, description, image, isbn, page_count, published_date, status)
                 VALUES (?1, ?2, '', '', '', '', 0, '', 1)",
                rusqlite::params![id, title],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO authors (id, first_name, last_name, description) VALUES (1, 'A', 'A', ''), (2, 'B', 'B', '')",
            [],
        )
        .unwrap();
        // book 1 has both authors, so a naive join would return it twice
        conn.execute(
            "INSERT INTO book_authors (book_id, author_id, created_at, updated_at) VALUES (1, 1, 0, 0), (1, 2, 0, 0), (3, 2, 0, 0)",
            [],
        )
        .unwrap();
        conn
    }

    fn run(conn: &Connection, filters: &BookFilters) -> (Vec<i64>, i64) {
        let query = build_book_query(filters);
        let mut stmt = conn.prepare(&query.sql).unwrap();
        let ids = stmt
            .query_map(params_from_iter(query.params.iter()), |r| r.get::<_, i64>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let total = conn
            .query_row(
                &query.count_sql,
                params_from_iter(query.count_params.iter()),
                |r| r.get::<_, i64>(0),
            )
            .unwrap();
        (ids, total)
    }

    #[test]
    fn ties_on_title_break_by_ascending_id() {
        let conn = seeded_connection();
        let filters = BookFilters {
            sort: SortKey::TitleAsc,
            ..Default::default()
        };
        let (ids, _) = run(&conn, &filters);
        assert_eq!(ids, vec![6, 2, 1, 3, 4, 5]);

        let filters = BookFilters {
            sort: SortKey::TitleDesc,
            ..Default::default()
        };
        let (ids, _) = run(&conn, &filters);
        assert_eq!(ids, vec![5, 1, 3, 4, 2, 6]);
    }

    #[test]
    fn pages_do_not_overlap_across_ties() {
        let conn = seeded_connection();
        let mut seen = Vec::new();
        for page in 1..=3 {
            let filters = BookFilters {
                sort: SortKey::TitleAsc,
                page,
                page_size: 2,
                ..Default::default()
            };
            seen.extend(run(&conn, &filters).0);
        }
        assert_eq!(seen, vec![6, 2, 1, 3, 4, 5]);
    }

    #[test]
    fn multi_author_filter_returns_each_book_once() {
        let conn = seeded_connection();
        let filters = BookFilters {
            author_ids: Some(vec![1, 2]),
            ..Default::default()
        };
        assert_eq!(run(&conn, &filters), (vec![1, 3], 2));
    }

    #[test]
    fn unknown_category_ids_match_nothing() {
        let conn = seeded_connection();
        let filters = BookFilters {
            category_ids: Some(vec![5, 7]),
            ..Default::default()
        };
        assert_eq!(run(&conn, &filters), (vec![], 0));
    }

    #[test]
    fn title_filter_treats_wildcards_literally() {
        let conn = seeded_connection();
        let filters = BookFilters {
            title: Some("%".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&conn, &filters), (vec![6], 1));

        let filters = BookFilters {
            title: Some("' OR 1=1 --".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&conn, &filters), (vec![], 0));
    }

    #[test]
    fn title_filter_is_case_insensitive_substring() {
        let conn = seeded_connection();
        let filters = BookFilters {
            title: Some("ALP".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&conn, &filters).0, vec![2]);
    }
}
