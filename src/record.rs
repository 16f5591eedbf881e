//! Record metadata, column maps, and positional row binding.

use crate::errors::{MapError, MapResult};
use crate::value::{FromValue, Value};

/// Compile-time mapping between a record type and a table.
///
/// `COLUMNS` and `values()` are parallel: the value at index i belongs
/// to the column at index i, in field declaration order. The `record!`
/// macro generates both from one field list; hand-written
/// implementations must keep them aligned (a divergence is caught at
/// introspection time, see [`ColumnMap::from_record`]).
pub trait Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Mapped field values in column order.
    fn values(&self) -> Vec<Value>;
}

// One level of indirection is dereferenced transparently.
impl<R: Record> Record for &R {
    const TABLE: &'static str = R::TABLE;
    const COLUMNS: &'static [&'static str] = R::COLUMNS;

    fn values(&self) -> Vec<Value> {
        R::values(*self)
    }
}

/// An ordered column → value map produced by introspecting one record.
///
/// Iteration order is field declaration order and drives both column
/// lists and placeholder numbering downstream. Maps are built fresh
/// per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(&'static str, Value)>,
}

impl ColumnMap {
    /// Introspect one record.
    pub fn from_record<R: Record>(record: &R) -> MapResult<Self> {
        let values = record.values();
        if values.len() != R::COLUMNS.len() {
            return Err(MapError::MalformedRecord {
                table: R::TABLE,
                columns: R::COLUMNS.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            entries: R::COLUMNS.iter().copied().zip(values).collect(),
        })
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

impl FromIterator<(&'static str, Value)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (&'static str, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One result row as delivered by a store: values in select-column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Sequential reader labeled with `R`'s table and column names.
    pub fn cursor<R: Record>(&self) -> RowCursor<'_> {
        RowCursor {
            row: self,
            table: R::TABLE,
            columns: R::COLUMNS,
            index: 0,
        }
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Walks a row left to right, converting each value into the next
/// field's type. The position advances only on success.
pub struct RowCursor<'a> {
    row: &'a Row,
    table: &'static str,
    columns: &'static [&'static str],
    index: usize,
}

impl RowCursor<'_> {
    pub fn take<T: FromValue>(&mut self) -> MapResult<T> {
        let column = self.columns.get(self.index).copied().unwrap_or("?");
        let value = self.row.get(self.index).ok_or_else(|| MapError::Binding {
            table: self.table,
            reason: format!(
                "row ended at {} values, nothing left for column {}",
                self.row.len(),
                column
            ),
        })?;
        let bound = T::from_value(value.clone()).map_err(|e| MapError::Binding {
            table: self.table,
            reason: format!("column {column}: {e}"),
        })?;
        self.index += 1;
        Ok(bound)
    }
}

/// Positional reconstruction from a result row.
///
/// Field order must equal select-column order; the `record!` macro
/// guarantees this by generating both from the same field list.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> MapResult<Self>;
}

/// Check row arity against `R`'s column list, then scan.
pub fn bind_row<R: Record + FromRow>(row: &Row) -> MapResult<R> {
    if row.len() != R::COLUMNS.len() {
        return Err(MapError::Binding {
            table: R::TABLE,
            reason: format!(
                "row has {} values for {} mapped columns",
                row.len(),
                R::COLUMNS.len()
            ),
        });
    }
    R::from_row(row)
}
