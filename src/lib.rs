//! # rowmap
//!
//! A mapping layer between in-memory records and relational rows.
//!
//! `record!` declares a struct together with its table and column
//! mapping; the generated `Record` and `FromRow` impls share one field
//! order, so select-column order and binding order cannot drift apart.
//! The `statement` module builds parameterized INSERT, multi-row
//! INSERT, and conditioned SELECT statements (`?N` placeholders, every
//! value in the argument list). `Store` runs those statements against
//! a `Backend` and a SQLite backend is provided.
//!
//! ```
//! use rowmap::{Backend, Conditions, SqliteBackend, Store};
//!
//! rowmap::record! {
//!     table = "feeds",
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Feed {
//!         pub id: i64 => "id",
//!         pub url: String => "url",
//!     }
//! }
//!
//! # fn main() -> rowmap::MapResult<()> {
//! let store = Store::new(SqliteBackend::open_in_memory()?);
//! store.backend().execute(
//!     "CREATE TABLE feeds (id INTEGER PRIMARY KEY, url TEXT NOT NULL)",
//!     &[],
//! )?;
//!
//! store.insert_one(&Feed { id: 1, url: "https://example.com/a".into() })?;
//! let feed: Feed = store.select_one(&Conditions::new().eq("id", 1_i64))?;
//! assert_eq!(feed.url, "https://example.com/a");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - `errors` — MapError, MapResult
//! - `value` — the closed Value set and its conversions
//! - `record` — Record, FromRow, ColumnMap, Row, RowCursor
//! - `macros` — the record! declaration macro
//! - `statement` — Statement, Conditions, the three builders
//! - `store` — the Backend trait and the Store facade
//! - `sqlite` — SqliteBackend over rusqlite

#[macro_use]
mod macros;

pub mod errors;
pub mod record;
pub mod sqlite;
pub mod statement;
pub mod store;
pub mod value;

pub use errors::{MapError, MapResult};
pub use record::{bind_row, ColumnMap, FromRow, Record, Row, RowCursor};
pub use sqlite::SqliteBackend;
pub use statement::{build_insert, build_insert_many, build_select, Conditions, Statement};
pub use store::{Backend, Store};
pub use value::{FromValue, TypeMismatch, Value};
