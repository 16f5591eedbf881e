//! The provided store implementation over rusqlite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{self, ToSqlOutput, Type, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use crate::errors::{MapError, MapResult};
use crate::record::Row;
use crate::store::Backend;
use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(types::Value::Null),
            Value::Integer(v) => ToSqlOutput::Owned(types::Value::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Owned(types::Value::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Boolean(v) => ToSqlOutput::Owned(types::Value::Integer(i64::from(*v))),
            Value::Timestamp(v) => ToSqlOutput::Owned(types::Value::Text(v.to_rfc3339())),
        })
    }
}

/// A single SQLite connection behind a mutex.
///
/// Pooling, reconnection, and transactions stay outside this crate;
/// this is the smallest store a `Store` can delegate to.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) a database file and configure its connection.
    pub fn open<P: AsRef<Path>>(path: P) -> MapResult<Self> {
        let conn = Connection::open(path).map_err(|source| MapError::Open { source })?;
        configure_connection(&conn).map_err(|source| MapError::Open { source })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> MapResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| MapError::Open { source })?;
        configure_connection(&conn).map_err(|source| MapError::Open { source })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-call;
        // the connection holds no in-crate invariants, so recover it.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Backend for SqliteBackend {
    fn execute(&self, sql: &str, args: &[Value]) -> MapResult<usize> {
        let conn = self.lock();
        conn.execute(sql, params_from_iter(args.iter()))
            .map_err(|source| execution_error(sql, args, source))
    }

    fn query(&self, sql: &str, args: &[Value]) -> MapResult<Vec<Row>> {
        let conn = self.lock();
        query_all(&conn, sql, args).map_err(|source| execution_error(sql, args, source))
    }

    fn query_one(&self, sql: &str, args: &[Value]) -> MapResult<Option<Row>> {
        let conn = self.lock();
        query_first(&conn, sql, args).map_err(|source| execution_error(sql, args, source))
    }
}

/// Connection PRAGMAs, applied immediately after opening.
fn configure_connection(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA cache_size = -8000;
        PRAGMA temp_store = MEMORY;
        ",
    )
}

fn execution_error(sql: &str, args: &[Value], source: rusqlite::Error) -> MapError {
    MapError::Execution {
        sql: sql.to_string(),
        args: args.to_vec(),
        source,
    }
}

fn query_all(conn: &Connection, sql: &str, args: &[Value]) -> Result<Vec<Row>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(read_row(row)?);
    }
    Ok(out)
}

fn query_first(
    conn: &Connection,
    sql: &str,
    args: &[Value],
) -> Result<Option<Row>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    match rows.next()? {
        Some(row) => Ok(Some(read_row(row)?)),
        None => Ok(None),
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> Result<Row, rusqlite::Error> {
    let count = row.as_ref().column_count();
    let mut values = Vec::with_capacity(count);
    for index in 0..count {
        let name = row.as_ref().column_name(index)?.to_string();
        values.push(read_value(row.get_ref(index)?, index, &name)?);
    }
    Ok(Row::new(values))
}

fn read_value(raw: ValueRef<'_>, index: usize, name: &str) -> Result<Value, rusqlite::Error> {
    match raw {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::Integer(v)),
        ValueRef::Real(v) => Ok(Value::Real(v)),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(rusqlite::Error::Utf8Error)?;
            Ok(Value::Text(text.to_string()))
        }
        // Blobs sit outside the value set this crate maps.
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            index,
            name.to_string(),
            Type::Blob,
        )),
    }
}
