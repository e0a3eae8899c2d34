//! Replace-all maintenance of a book's author and category sets.
//!
//! Replacement is delete-then-insert inside the caller's transaction: the
//! stored set for one (book, relation) pair is cleared and the new complete
//! set is written back with a single multi-row INSERT. Any failure leaves the
//! transaction to be rolled back by the caller, which restores the old set.

use super::error::{CatalogueError, CatalogueResult};
use super::models::Relation;
use super::query_builder::placeholders;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Bump `updated_at` on the book, failing with `NotFound` when it does not
/// exist. Used as the existence check before a replacement.
pub fn touch_book(conn: &Connection, book_id: i64, now: i64) -> CatalogueResult<()> {
    let changed = conn.execute(
        "UPDATE books SET updated_at = ?1 WHERE id = ?2",
        params![now, book_id],
    )?;
    if changed == 0 {
        return Err(CatalogueError::not_found("book", book_id));
    }
    Ok(())
}

/// One INSERT carrying every edge. `?1` is the book id and `?2` the
/// timestamp, shared by all rows.
pub(crate) fn bulk_insert_statement(
    book_id: i64,
    relation: Relation,
    related_ids: &[i64],
    now: i64,
) -> (String, Vec<Value>) {
    let rows: Vec<String> = (0..related_ids.len())
        .map(|i| format!("(?1, ?{}, ?2, ?2)", i + 3))
        .collect();
    let sql = format!(
        "INSERT INTO {} (book_id, {}, created_at, updated_at) VALUES {}",
        relation.junction_table(),
        relation.related_column(),
        rows.join(", ")
    );
    let mut values = Vec::with_capacity(related_ids.len() + 2);
    values.push(Value::Integer(book_id));
    values.push(Value::Integer(now));
    values.extend(related_ids.iter().map(|id| Value::Integer(*id)));
    (sql, values)
}

/// Replace the book's set for `relation` with `ids`. Must run inside a
/// transaction. Duplicates collapse to one edge; an empty list clears the
/// relation. Returns the number of edges written.
pub fn replace_in_tx(
    conn: &Connection,
    book_id: i64,
    relation: Relation,
    ids: &[i64],
    now: i64,
) -> CatalogueResult<usize> {
    let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    let removed = conn.execute(
        &format!("DELETE FROM {} WHERE book_id = ?1", relation.junction_table()),
        params![book_id],
    )?;
    debug!(
        "Cleared {} {} edges of book {}",
        removed,
        relation.entity_name(),
        book_id
    );

    if unique.is_empty() {
        return Ok(0);
    }

    let (sql, values) = bulk_insert_statement(book_id, relation, &unique, now);
    match conn.execute(&sql, params_from_iter(values.iter())) {
        Ok(written) => Ok(written),
        Err(e) => {
            let err = CatalogueError::from(e);
            if let CatalogueError::ConstraintViolation(_) = err {
                let missing = missing_related_ids(conn, relation, &unique)?;
                if !missing.is_empty() {
                    return Err(CatalogueError::ConstraintViolation(format!(
                        "{} ids do not exist: {:?}",
                        relation.entity_name(),
                        missing
                    )));
                }
            }
            Err(err)
        }
    }
}

fn missing_related_ids(
    conn: &Connection,
    relation: Relation,
    ids: &[i64],
) -> CatalogueResult<Vec<i64>> {
    let sql = format!(
        "SELECT id FROM {} WHERE id IN ({})",
        relation.related_table(),
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let existing = stmt
        .query_map(params_from_iter(ids.iter()), |r| r.get::<_, i64>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(ids
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect())
}
