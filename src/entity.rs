//! Record base: CRUD over any type that maps its fields by column name.

use crate::column::ColumnInfo;
use crate::command::{self, Command, DbConnection, Parameter};
use crate::error::Result;
use crate::sql;
use crate::value::{coerce_for_storage, Value};
use tracing::debug;

/// A record type mapped to one table.
///
/// Implementors declare the table and its columns as constants and map
/// column names to their own fields. Every name in `COLUMNS` must be
/// understood by `get_value` and `set_value`; a mismatch surfaces as
/// [`Error::UnknownColumn`](crate::Error::UnknownColumn) when an operation
/// runs.
pub trait DbObject: Default + Sized {
    const TABLE_NAME: &'static str;
    const COLUMNS: &'static [ColumnInfo];

    fn get_value(&self, column: &str) -> Result<Value>;

    fn set_value(&mut self, column: &str, value: Value) -> Result<()>;

    /// Insert this record.
    ///
    /// Unlike the other operations this does not open a closed connection.
    fn insert<C: DbConnection + ?Sized>(&self, connection: &mut C) -> Result<usize> {
        let text = sql::insert_statement(Self::TABLE_NAME, Self::COLUMNS);
        let command = Command::new(text).with_parameters(self.bind_columns()?);
        debug!(table = Self::TABLE_NAME, sql = %command.text, "insert");
        connection.execute_non_query(&command)
    }

    /// Update the row matching this record's key columns. Returns 0 when
    /// no row matches.
    fn update<C: DbConnection + ?Sized>(&self, connection: &mut C) -> Result<usize> {
        let text = sql::update_statement(Self::TABLE_NAME, Self::COLUMNS)?;
        command::execute_command(connection, &text, self.bind_columns()?)
    }

    fn select_by_key<C: DbConnection + ?Sized>(
        connection: &mut C,
        id: impl Into<Value>,
    ) -> Result<Option<Self>> {
        let key = sql::key_column(Self::TABLE_NAME, Self::COLUMNS)?;
        let text = sql::select_by_key_statement(Self::TABLE_NAME, key);
        let records = Self::select(connection, &text, vec![key_parameter(key, id.into())])?;
        Ok(records.into_iter().next())
    }

    /// Delete by key value. Returns 0 when no row matches.
    fn delete<C: DbConnection + ?Sized>(connection: &mut C, id: impl Into<Value>) -> Result<usize> {
        let key = sql::key_column(Self::TABLE_NAME, Self::COLUMNS)?;
        let text = sql::delete_by_key_statement(Self::TABLE_NAME, key);
        command::execute_command(connection, &text, vec![key_parameter(key, id.into())])
    }

    /// Run an arbitrary query and build one record per row, reading each
    /// column by its upper-cased name.
    fn select<C: DbConnection + ?Sized>(
        connection: &mut C,
        command_text: &str,
        parameters: Vec<Parameter>,
    ) -> Result<Vec<Self>> {
        let result = command::execute_query(connection, command_text, parameters)?;
        let mut records = Vec::with_capacity(result.len());
        for row in result.iter() {
            let mut record = Self::default();
            for column in Self::COLUMNS {
                let value = row.get(&column.sql_name())?;
                record.set_value(column.name, value.clone())?;
            }
            records.push(record);
        }
        debug!(table = Self::TABLE_NAME, rows = records.len(), "select");
        Ok(records)
    }

    /// One input parameter per column, named after the column.
    fn bind_columns(&self) -> Result<Vec<Parameter>> {
        Self::COLUMNS
            .iter()
            .map(|c| {
                let value = coerce_for_storage(self.get_value(c.name)?);
                Ok(Parameter::new(c.name, c.storage_type, value))
            })
            .collect()
    }
}

fn key_parameter(key: &ColumnInfo, id: Value) -> Parameter {
    Parameter::new(sql::KEY_PARAMETER, key.storage_type, coerce_for_storage(id))
}
