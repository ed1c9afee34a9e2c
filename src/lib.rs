//! Metadata-driven record mapping for relational tables.
//!
//! # Intention
//!
//! - Describe a table once, as a constant list of [`ColumnInfo`].
//! - Derive INSERT, UPDATE, DELETE, point-lookup and query statements from
//!   that list and bind values by placeholder name.
//! - Stay agnostic of the database: statements run through the
//!   [`DbConnection`] trait, with [`SqliteConnection`] as the bundled driver.
//!
//! # Architectural Boundaries
//!
//! - No pooling, migrations or transaction orchestration beyond [`commit`].
//! - Connections belong to the caller. Operations open a closed connection
//!   (except [`DbObject::insert`]) and never close one.
//!
//! ```
//! use rust_dbobject::{ColumnInfo, DbObject, Error, Result, StorageType, Value};
//!
//! #[derive(Default)]
//! struct Tag {
//!     id: i64,
//!     label: String,
//! }
//!
//! impl DbObject for Tag {
//!     const TABLE_NAME: &'static str = "TAG";
//!     const COLUMNS: &'static [ColumnInfo] = &[
//!         ColumnInfo::key("id").with_type(StorageType::Integer),
//!         ColumnInfo::new("label"),
//!     ];
//!
//!     fn get_value(&self, column: &str) -> Result<Value> {
//!         match column {
//!             "id" => Ok(self.id.into()),
//!             "label" => Ok(self.label.as_str().into()),
//!             other => Err(Error::unknown_column(Self::TABLE_NAME, other)),
//!         }
//!     }
//!
//!     fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
//!         match column {
//!             "id" => self.id = value.as_i64()?,
//!             "label" => self.label = value.as_str()?.to_string(),
//!             other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
//!         }
//!         Ok(())
//!     }
//! }
//! ```

pub mod column;
pub mod command;
pub mod entity;
pub mod error;
pub mod sql;
pub mod sqlite;
pub mod value;

pub use column::{ColumnInfo, DEFAULT_SIZE};
pub use command::{
    commit, ensure_open, execute_command, execute_query, Command, DbConnection, Parameter,
    ParameterDirection, ResultSet, Row,
};
pub use entity::DbObject;
pub use error::{BoxError, Error, Result};
pub use sqlite::{SqliteConfig, SqliteConnection};
pub use value::{coerce_for_storage, StorageType, Value};
