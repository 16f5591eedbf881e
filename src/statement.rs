//! Statement builders: SQL text plus positional arguments.
//!
//! Builders are pure. They never touch a store, and they either
//! produce a complete statement with `args[i]` bound to placeholder
//! `?(i + 1)` or an error with no statement at all.

use std::collections::BTreeMap;

use crate::errors::{MapError, MapResult};
use crate::record::ColumnMap;
use crate::value::Value;

/// A parameterized statement ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Equality conditions for a select, keyed by column name.
///
/// Conjunctive: every condition must hold. Backed by an ordered map,
/// so the same conditions always serialize to the same clause order
/// (sorted by column name).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    filters: BTreeMap<String, Value>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`. Re-adding a column replaces its value.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.filters
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }
}

/// `INSERT INTO <table> (<columns>) VALUES (?1, ..., ?k)`, arguments
/// in map order.
pub fn build_insert(table: &str, map: &ColumnMap) -> Statement {
    let placeholders: Vec<String> = (1..=map.len()).map(|n| format!("?{n}")).collect();
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            map.columns().join(", "),
            placeholders.join(", ")
        ),
        args: map.values(),
    }
}

/// One multi-row `INSERT ... VALUES (...), (...)` with placeholder
/// numbers increasing across the whole statement: row r, column c
/// binds `?((r - 1) * k + c)`.
///
/// The column set and order come from the caller, not from the maps.
/// A map lacking one of `columns` contributes NULL in that slot.
pub fn build_insert_many(
    table: &str,
    columns: &[&str],
    rows: &[ColumnMap],
) -> MapResult<Statement> {
    if rows.is_empty() {
        return Err(MapError::EmptyRecordSet);
    }

    let mut args = Vec::with_capacity(rows.len() * columns.len());
    let mut groups = Vec::with_capacity(rows.len());
    let mut next = 1usize;
    for row in rows {
        let mut placeholders = Vec::with_capacity(columns.len());
        for column in columns {
            args.push(row.get(column).cloned().unwrap_or(Value::Null));
            placeholders.push(format!("?{next}"));
            next += 1;
        }
        groups.push(format!("({})", placeholders.join(", ")));
    }

    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            columns.join(", "),
            groups.join(", ")
        ),
        args,
    })
}

/// `SELECT <columns> FROM <table> [WHERE <a> = ?1 AND <b> = ?2 ...]
/// ORDER BY id DESC`.
///
/// Condition values go into the argument list, never into the SQL
/// text. Results are always ordered by descending id; caller-supplied
/// ordering is not part of this surface.
pub fn build_select(table: &str, columns: &[&str], conditions: &Conditions) -> Statement {
    let mut sql = format!("SELECT {} FROM {}", columns.join(", "), table);
    let mut args = Vec::with_capacity(conditions.len());

    if !conditions.is_empty() {
        let mut clauses = Vec::with_capacity(conditions.len());
        for (i, (column, value)) in conditions.iter().enumerate() {
            clauses.push(format!("{} = ?{}", column, i + 1));
            args.push(value.clone());
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(" ORDER BY id DESC");
    Statement { sql, args }
}
