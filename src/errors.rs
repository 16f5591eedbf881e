//! Crate error types.

use thiserror::Error;

use crate::value::Value;

#[derive(Error, Debug)]
pub enum MapError {
    /// A record's value list did not line up with its column list.
    /// Unreachable for `record!`-generated types; hand-written `Record`
    /// implementations can diverge.
    #[error("Record for table {table} produced {values} values for {columns} columns")]
    MalformedRecord {
        table: &'static str,
        columns: usize,
        values: usize,
    },

    #[error("Cannot build a multi-row insert from zero records")]
    EmptyRecordSet,

    /// The store rejected or failed a statement. Carries the SQL text
    /// and argument list for diagnosis.
    #[error("Statement failed: {source} (sql: {sql})")]
    Execution {
        sql: String,
        args: Vec<Value>,
        source: rusqlite::Error,
    },

    #[error("Row binding failed for {table}: {reason}")]
    Binding { table: &'static str, reason: String },

    #[error("No row matched the given conditions on {table}")]
    RowNotFound { table: &'static str },

    #[error("Operation not supported: {operation} ({reason})")]
    NotSupported {
        operation: &'static str,
        reason: &'static str,
    },

    #[error("Failed to open database: {source}")]
    Open { source: rusqlite::Error },
}

pub type MapResult<T> = Result<T, MapError>;
