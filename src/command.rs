//! Driver contract and the shared executors every record operation goes through.

use crate::error::{Error, Result};
use crate::value::{StorageType, Value};
use tracing::{debug, trace};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
}

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Placeholder name without the leading `:`
    pub name: String,
    pub storage_type: StorageType,
    pub value: Value,
    pub direction: ParameterDirection,
}

impl Parameter {
    /// Create an input parameter
    pub fn new(name: impl Into<String>, storage_type: StorageType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            storage_type,
            value: value.into(),
            direction: ParameterDirection::Input,
        }
    }
}

/// SQL text with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub text: String,
    pub parameters: Vec<Parameter>,
    /// Bind parameters by placeholder name instead of position
    pub bind_by_name: bool,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Vec::new(),
            bind_by_name: true,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn positional(mut self) -> Self {
        self.bind_by_name = false;
        self
    }
}

/// Eagerly materialized query result
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// One row of a [`ResultSet`], addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Exact-match lookup; callers pass the upper-cased column name.
    pub fn get(&self, name: &str) -> Result<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}

/// Database driver collaborator.
///
/// Connections are owned by the caller. This layer only inspects the open
/// state and opens closed connections; it never closes them.
pub trait DbConnection {
    fn is_open(&self) -> bool;

    fn open(&mut self) -> Result<()>;

    /// Run a statement and return the affected-row count.
    fn execute_non_query(&mut self, command: &Command) -> Result<usize>;

    /// Run a query and return every row.
    fn execute_query(&mut self, command: &Command) -> Result<ResultSet>;
}

impl<C: DbConnection + ?Sized> DbConnection for &mut C {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn execute_non_query(&mut self, command: &Command) -> Result<usize> {
        (**self).execute_non_query(command)
    }

    fn execute_query(&mut self, command: &Command) -> Result<ResultSet> {
        (**self).execute_query(command)
    }
}

/// Open the connection unless it already is.
pub fn ensure_open<C: DbConnection + ?Sized>(connection: &mut C) -> Result<()> {
    if !connection.is_open() {
        trace!("opening closed connection");
        connection.open()?;
    }
    Ok(())
}

/// Run a statement on a normalized connection and return the affected-row count.
pub fn execute_command<C: DbConnection + ?Sized>(
    connection: &mut C,
    command_text: &str,
    parameters: Vec<Parameter>,
) -> Result<usize> {
    ensure_open(connection)?;
    let command = Command::new(command_text).with_parameters(parameters);
    debug!(sql = %command.text, params = command.parameters.len(), "executing command");
    connection.execute_non_query(&command)
}

/// Run a query on a normalized connection.
pub fn execute_query<C: DbConnection + ?Sized>(
    connection: &mut C,
    command_text: &str,
    parameters: Vec<Parameter>,
) -> Result<ResultSet> {
    ensure_open(connection)?;
    let command = Command::new(command_text).with_parameters(parameters);
    debug!(sql = %command.text, params = command.parameters.len(), "executing query");
    connection.execute_query(&command)
}

pub fn commit<C: DbConnection + ?Sized>(connection: &mut C) -> Result<()> {
    ensure_open(connection)?;
    debug!("committing");
    connection.execute_non_query(&Command::new("COMMIT").positional())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Stub {
        open: bool,
        opened: usize,
        seen: Vec<Command>,
    }

    impl DbConnection for Stub {
        fn is_open(&self) -> bool {
            self.open
        }

        fn open(&mut self) -> Result<()> {
            self.open = true;
            self.opened += 1;
            Ok(())
        }

        fn execute_non_query(&mut self, command: &Command) -> Result<usize> {
            self.seen.push(command.clone());
            Ok(3)
        }

        fn execute_query(&mut self, command: &Command) -> Result<ResultSet> {
            self.seen.push(command.clone());
            Ok(ResultSet::new(vec!["A".into()]))
        }
    }

    #[test]
    fn execute_command_opens_once() {
        let mut conn = Stub::default();
        assert_eq!(execute_command(&mut conn, "DELETE FROM T", vec![]).unwrap(), 3);
        assert_eq!(execute_command(&mut conn, "DELETE FROM T", vec![]).unwrap(), 3);
        assert_eq!(conn.opened, 1);
        assert!(conn.seen.iter().all(|c| c.bind_by_name));
    }

    #[test]
    fn commit_sends_literal_statement() {
        let mut conn = Stub::default();
        commit(&mut conn).unwrap();
        assert_eq!(conn.opened, 1);
        assert_eq!(conn.seen[0].text, "COMMIT");
        assert!(conn.seen[0].parameters.is_empty());
    }

    #[test]
    fn row_lookup_is_exact() {
        let rs = ResultSet::new(vec!["ID".into(), "NAME".into()])
            .with_row(vec![Value::Integer(1), Value::Text("a".into())]);
        let row = rs.iter().next().unwrap();
        assert_eq!(row.get("NAME").unwrap(), &Value::Text("a".into()));
        assert!(matches!(row.get("name"), Err(Error::ColumnNotFound(c)) if c == "name"));
    }

    struct Unreachable;

    impl DbConnection for Unreachable {
        fn is_open(&self) -> bool {
            true
        }

        fn open(&mut self) -> Result<()> {
            Ok(())
        }

        fn execute_non_query(&mut self, _command: &Command) -> Result<usize> {
            Err(Error::driver("host unreachable"))
        }

        fn execute_query(&mut self, _command: &Command) -> Result<ResultSet> {
            Err(Error::driver("host unreachable"))
        }
    }

    #[test]
    fn driver_errors_propagate_unchanged() {
        let err = execute_command(&mut Unreachable, "DELETE FROM T", vec![]).unwrap_err();
        assert!(matches!(err, Error::Driver(ref inner) if inner.to_string() == "host unreachable"));
        let err = commit(&mut Unreachable).unwrap_err();
        assert!(err.is_execution());
    }

    #[test]
    fn query_through_reborrowed_connection() {
        let mut conn = Stub::default();
        let mut by_ref = &mut conn;
        let rs = execute_query(&mut by_ref, "SELECT A FROM T", vec![]).unwrap();
        assert!(rs.is_empty());
        assert!(conn.is_open());
    }
}
