//! SQL access to records and counters. The store layer wraps these with
//! change notification.

use crate::errors::{AppError, AppResult};
use crate::store::collection::Collection;
use crate::store::record::{Fields, Record};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn parse_fields(collection: &str, id: &str, raw: &str) -> AppResult<Fields> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::CorruptRecord(format!("{collection}/{id}"), e.to_string()))
}

fn map_row(row: &Row) -> rusqlite::Result<(String, String)> {
    Ok((row.get("id")?, row.get("fields")?))
}

pub fn load_record(conn: &Connection, collection: Collection, id: &str) -> AppResult<Option<Record>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT fields FROM records WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(raw) => Ok(Some(Record::new(
            id,
            parse_fields(collection.name(), id, &raw)?,
        ))),
        None => Ok(None),
    }
}

/// All records of a collection, in insertion order.
pub fn load_collection(conn: &Connection, collection: Collection) -> AppResult<Vec<Record>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, fields FROM records
         WHERE collection = ?1
         ORDER BY rowid ASC",
    )?;

    let rows = stmt.query_map([collection.name()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        let (id, raw) = r?;
        let fields = parse_fields(collection.name(), &id, &raw)?;
        out.push(Record::new(id, fields));
    }
    Ok(out)
}

/// Insert or overwrite a record. An overwrite keeps the original rowid, so
/// insertion order survives updates.
pub fn upsert_record(conn: &Connection, collection: Collection, record: &Record) -> AppResult<()> {
    let now = Local::now().to_rfc3339();
    let raw = serde_json::to_string(&record.fields)?;

    conn.execute(
        "INSERT INTO records (collection, id, fields, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(collection, id) DO UPDATE
            SET fields = excluded.fields,
                updated_at = excluded.updated_at",
        params![collection.name(), record.id, raw, now],
    )?;
    Ok(())
}

/// Returns `true` when a record was actually deleted.
pub fn delete_record(conn: &Connection, collection: Collection, id: &str) -> AppResult<bool> {
    let n = conn.execute(
        "DELETE FROM records WHERE collection = ?1 AND id = ?2",
        params![collection.name(), id],
    )?;
    Ok(n > 0)
}

/// Increment-and-read in a single statement: two callers can never see the
/// same value, even from different processes.
pub fn increment_counter(conn: &Connection, name: &str) -> AppResult<i64> {
    let value: i64 = conn.query_row(
        "INSERT INTO counters (name, value) VALUES (?1, 1)
         ON CONFLICT(name) DO UPDATE SET value = value + 1
         RETURNING value",
        [name],
        |row| row.get(0),
    )?;
    Ok(value)
}

pub fn read_counter(conn: &Connection, name: &str) -> AppResult<i64> {
    let value: Option<i64> = conn
        .query_row("SELECT value FROM counters WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value.unwrap_or(0))
}

pub fn set_counter(conn: &Connection, name: &str, value: i64) -> AppResult<()> {
    conn.execute(
        "INSERT INTO counters (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![name, value],
    )?;
    Ok(())
}

/// Number of records per collection name.
pub fn count_by_collection(conn: &Connection) -> AppResult<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT collection, COUNT(*) FROM records
         GROUP BY collection
         ORDER BY collection ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Rows of the internal log table, oldest first.
pub fn load_log(conn: &Connection) -> AppResult<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
