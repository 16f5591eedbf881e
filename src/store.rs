//! The execution boundary and the mapping facade over it.

use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::{MapError, MapResult};
use crate::record::{bind_row, ColumnMap, FromRow, Record, Row};
use crate::statement::{self, Conditions, Statement};
use crate::value::Value;

/// The opaque store handle the facade delegates to.
///
/// Implementations translate one parameterized statement into one
/// store call. They report real affected counts and materialized rows
/// and never interpret the SQL themselves.
pub trait Backend {
    /// Run a statement that returns no rows. Returns the store's
    /// changed-row count.
    fn execute(&self, sql: &str, args: &[Value]) -> MapResult<usize>;

    /// Run a query and materialize every result row, in result order.
    fn query(&self, sql: &str, args: &[Value]) -> MapResult<Vec<Row>>;

    /// Run a query and materialize the first result row, if any.
    fn query_one(&self, sql: &str, args: &[Value]) -> MapResult<Option<Row>>;

    /// Transactions are exposed but not implemented by this surface.
    fn begin_transaction(&self) -> MapResult<()> {
        Err(MapError::NotSupported {
            operation: "begin_transaction",
            reason: "transaction control belongs to the underlying store",
        })
    }
}

/// Maps records onto a backend: single and batch inserts, conditioned
/// selects. Holds no state beyond the backend handle, so a shared
/// reference can be used from multiple threads when the backend can.
///
/// Every operation emits a start event (operation, correlation id,
/// SQL, args), a completion event with the row count, and an error
/// event on failure, all under the same correlation id.
pub struct Store<B: Backend> {
    backend: B,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Direct backend access for statements outside the mapped surface.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Insert one record. Returns the store's affected-row count.
    pub fn insert_one<R: Record>(&self, record: &R) -> MapResult<usize> {
        let map = ColumnMap::from_record(record)?;
        let stmt = statement::build_insert(R::TABLE, &map);
        self.run_execute("insert_one", &stmt)
    }

    /// Insert a batch as one statement. Introspection failure on any
    /// element aborts the whole batch; an empty batch never reaches
    /// the store.
    pub fn insert_many<R: Record>(&self, records: &[R]) -> MapResult<usize> {
        if records.is_empty() {
            return Err(MapError::EmptyRecordSet);
        }
        let mut maps = Vec::with_capacity(records.len());
        for record in records {
            maps.push(ColumnMap::from_record(record)?);
        }
        let stmt = statement::build_insert_many(R::TABLE, R::COLUMNS, &maps)?;
        self.run_execute("insert_many", &stmt)
    }

    /// Select the single row matching `conditions` and bind it.
    /// Zero matches is [`MapError::RowNotFound`].
    pub fn select_one<R: Record + FromRow>(&self, conditions: &Conditions) -> MapResult<R> {
        let stmt = statement::build_select(R::TABLE, R::COLUMNS, conditions);
        match self.run_query_one("select_one", &stmt)? {
            Some(row) => bind_row(&row),
            None => Err(MapError::RowNotFound { table: R::TABLE }),
        }
    }

    /// Select every row matching `conditions`, bound in result order
    /// (descending id). The first binding failure aborts.
    pub fn select_many<R: Record + FromRow>(&self, conditions: &Conditions) -> MapResult<Vec<R>> {
        let stmt = statement::build_select(R::TABLE, R::COLUMNS, conditions);
        let rows = self.run_query("select_many", &stmt)?;
        rows.iter().map(|row| bind_row(row)).collect()
    }

    /// See [`Backend::begin_transaction`].
    pub fn begin_transaction(&self) -> MapResult<()> {
        self.backend.begin_transaction()
    }

    fn run_execute(&self, op: &'static str, stmt: &Statement) -> MapResult<usize> {
        let op_id = Uuid::new_v4();
        debug!(%op_id, op, sql = %stmt.sql, args = ?stmt.args, "Running statement");
        match self.backend.execute(&stmt.sql, &stmt.args) {
            Ok(count) => {
                debug!(%op_id, op, rows = count, "Statement complete");
                Ok(count)
            }
            Err(e) => {
                error!(%op_id, op, error = %e, "Statement failed");
                Err(e)
            }
        }
    }

    fn run_query(&self, op: &'static str, stmt: &Statement) -> MapResult<Vec<Row>> {
        let op_id = Uuid::new_v4();
        debug!(%op_id, op, sql = %stmt.sql, args = ?stmt.args, "Running statement");
        match self.backend.query(&stmt.sql, &stmt.args) {
            Ok(rows) => {
                debug!(%op_id, op, rows = rows.len(), "Statement complete");
                Ok(rows)
            }
            Err(e) => {
                error!(%op_id, op, error = %e, "Statement failed");
                Err(e)
            }
        }
    }

    fn run_query_one(&self, op: &'static str, stmt: &Statement) -> MapResult<Option<Row>> {
        let op_id = Uuid::new_v4();
        debug!(%op_id, op, sql = %stmt.sql, args = ?stmt.args, "Running statement");
        match self.backend.query_one(&stmt.sql, &stmt.args) {
            Ok(row) => {
                debug!(%op_id, op, rows = row.is_some() as usize, "Statement complete");
                Ok(row)
            }
            Err(e) => {
                error!(%op_id, op, error = %e, "Statement failed");
                Err(e)
            }
        }
    }
}
