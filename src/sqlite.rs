//! SQLite driver built on `rusqlite`.

use crate::command::{Command, DbConnection, ParameterDirection, ResultSet};
use crate::error::{Error, Result};
use crate::value::Value;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OpenFlags, Statement};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

const MEMORY_PATH: &str = ":memory:";

/// SQLite connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    #[serde(default)]
    pub read_only: bool,
    /// How long to wait on a locked database before failing
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl SqliteConfig {
    /// Create a new SQLite config for a file path
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            read_only: false,
            busy_timeout_ms: None,
        }
    }

    /// A private in-memory database; its contents are lost on close.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    fn flags(&self) -> OpenFlags {
        if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        }
    }
}

/// A lazily opened SQLite connection.
///
/// Created closed; [`DbConnection::open`] opens it and is a no-op when it is
/// already open.
#[derive(Debug)]
pub struct SqliteConnection {
    config: SqliteConfig,
    connection: Option<Connection>,
}

impl SqliteConnection {
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Open immediately.
    pub fn open_with(config: SqliteConfig) -> Result<Self> {
        let mut connection = Self::new(config);
        connection.open()?;
        Ok(connection)
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Close the underlying handle. Closing a closed connection does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            debug!(path = %self.config.db_path, "closing sqlite connection");
            connection.close().map_err(|(_, e)| Error::from(e))?;
        }
        Ok(())
    }

    /// Run a batch of `;`-separated statements without parameters.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.handle()?.execute_batch(sql)?;
        Ok(())
    }

    fn handle(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(Error::ConnectionClosed)
    }

    fn prepare<'c>(connection: &'c Connection, command: &Command) -> Result<Statement<'c>> {
        let mut statement = connection.prepare(&command.text)?;
        let mut bound = vec![false; statement.parameter_count()];
        for (position, parameter) in command.parameters.iter().enumerate() {
            if parameter.direction != ParameterDirection::Input {
                return Err(Error::Unsupported(format!(
                    "{:?} parameter {}",
                    parameter.direction, parameter.name
                )));
            }
            let index = if command.bind_by_name {
                statement
                    .parameter_index(&format!(":{}", parameter.name))?
                    .ok_or_else(|| Error::UnknownParameter(parameter.name.clone()))?
            } else {
                position + 1
            };
            trace!(name = %parameter.name, index, ty = ?parameter.storage_type, "binding");
            statement.raw_bind_parameter(index, &parameter.value)?;
            if let Some(slot) = bound.get_mut(index - 1) {
                *slot = true;
            }
        }
        // SQLite would run an unbound placeholder as NULL.
        if let Some(missing) = bound.iter().position(|b| !b) {
            let index = missing + 1;
            let name = statement
                .parameter_name(index)
                .map_or_else(
                    || format!("?{index}"),
                    |n| n.trim_start_matches([':', '@', '$']).to_string(),
                );
            return Err(Error::UnboundParameter(name));
        }
        Ok(statement)
    }
}

impl DbConnection for SqliteConnection {
    fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        debug!(path = %self.config.db_path, read_only = self.config.read_only, "opening sqlite connection");
        let connection = Connection::open_with_flags(&self.config.db_path, self.config.flags())?;
        if let Some(ms) = self.config.busy_timeout_ms {
            connection.busy_timeout(Duration::from_millis(ms))?;
        }
        self.connection = Some(connection);
        Ok(())
    }

    fn execute_non_query(&mut self, command: &Command) -> Result<usize> {
        let connection = self.handle()?;
        let mut statement = Self::prepare(connection, command)?;
        Ok(statement.raw_execute()?)
    }

    fn execute_query(&mut self, command: &Command) -> Result<ResultSet> {
        let connection = self.handle()?;
        let mut statement = Self::prepare(connection, command)?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();
        let mut result = ResultSet::new(columns);
        let mut rows = statement.raw_query();
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map_err(Error::from).and_then(from_sql))
                .collect::<Result<Vec<_>>>()?;
            result.rows.push(values);
        }
        Ok(result)
    }
}

fn from_sql(value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(
            std::str::from_utf8(t)
                .map_err(rusqlite::Error::Utf8Error)?
                .to_string(),
        ),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Boolean(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
            Value::Uuid(u) => ToSqlOutput::Borrowed(ValueRef::Blob(u.as_bytes())),
        })
    }
}
