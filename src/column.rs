use crate::value::StorageType;

/// Size hint used when a column does not declare one.
pub const DEFAULT_SIZE: u32 = 256;

/// Static description of one mapped table column.
///
/// Declared once per record type, typically in a `const` slice:
///
/// ```
/// use rust_dbobject::{ColumnInfo, StorageType};
///
/// const COLUMNS: &[ColumnInfo] = &[
///     ColumnInfo::key("id").with_type(StorageType::Raw).with_size(16),
///     ColumnInfo::new("name").with_size(100),
/// ];
/// assert!(COLUMNS[0].is_key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub storage_type: StorageType,
    pub is_key: bool,
    /// Advisory only, never checked against values.
    pub size: u32,
}

impl ColumnInfo {
    /// A non-key `Varchar` column of the default size.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            storage_type: StorageType::Varchar,
            is_key: false,
            size: DEFAULT_SIZE,
        }
    }

    pub const fn key(name: &'static str) -> Self {
        let mut column = Self::new(name);
        column.is_key = true;
        column
    }

    pub const fn with_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Identifier used in synthesized SQL.
    pub fn sql_name(&self) -> String {
        self.name.to_uppercase()
    }
}
