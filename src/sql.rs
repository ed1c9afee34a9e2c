//! SQL text synthesis from column metadata.
//!
//! Table and column names come from static record metadata and are trusted
//! as identifiers. Only values travel as bound parameters.

use crate::column::ColumnInfo;
use crate::error::{Error, Result};
use tracing::warn;

/// Placeholder name for the key value in point lookups and deletes.
pub const KEY_PARAMETER: &str = "p_id";

/// Resolve the single key column of a record type.
pub fn key_column<'a>(table: &str, columns: &'a [ColumnInfo]) -> Result<&'a ColumnInfo> {
    let mut keys = columns.iter().filter(|c| c.is_key);
    match (keys.next(), keys.next()) {
        (Some(key), None) => Ok(key),
        _ => {
            let found = columns.iter().filter(|c| c.is_key).count();
            warn!(table, found, "key-based operation needs exactly one key column");
            Err(Error::KeyConfiguration {
                table: table.to_string(),
                found,
            })
        }
    }
}

pub fn insert_statement(table: &str, columns: &[ColumnInfo]) -> String {
    let names: Vec<String> = columns.iter().map(ColumnInfo::sql_name).collect();
    let placeholders: Vec<String> = columns.iter().map(|c| format!(":{}", c.name)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(","),
        placeholders.join(",")
    )
}

/// Non-key columns form the SET list, key columns the WHERE conjunction.
///
/// Fails when no key column is declared, since the statement would
/// otherwise have no predicate.
pub fn update_statement(table: &str, columns: &[ColumnInfo]) -> Result<String> {
    let assign = |c: &ColumnInfo| format!("{} = :{}", c.sql_name(), c.name);
    let set: Vec<String> = columns.iter().filter(|c| !c.is_key).map(assign).collect();
    let predicate: Vec<String> = columns.iter().filter(|c| c.is_key).map(assign).collect();
    if predicate.is_empty() {
        return Err(Error::KeyConfiguration {
            table: table.to_string(),
            found: 0,
        });
    }
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        set.join(","),
        predicate.join(" AND ")
    ))
}

pub fn select_by_key_statement(table: &str, key: &ColumnInfo) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = :{}",
        table,
        key.sql_name(),
        KEY_PARAMETER
    )
}

pub fn delete_by_key_statement(table: &str, key: &ColumnInfo) -> String {
    format!(
        "DELETE FROM {} WHERE {} = :{}",
        table,
        key.sql_name(),
        KEY_PARAMETER
    )
}
