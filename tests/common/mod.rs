#![allow(dead_code)]

use rust_dbobject::{
    ColumnInfo, Command, DbConnection, DbObject, Error, ResultSet, Result, StorageType, Value,
};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i64>,
    pub score: f64,
    pub active: bool,
    pub avatar: Vec<u8>,
}

impl DbObject for User {
    const TABLE_NAME: &'static str = "USERS";
    const COLUMNS: &'static [ColumnInfo] = &[
        ColumnInfo::key("id").with_type(StorageType::Raw).with_size(16),
        ColumnInfo::new("name").with_size(100),
        ColumnInfo::new("age").with_type(StorageType::Integer),
        ColumnInfo::new("score").with_type(StorageType::Real),
        ColumnInfo::new("active").with_type(StorageType::Boolean),
        ColumnInfo::new("avatar").with_type(StorageType::Blob),
    ];

    fn get_value(&self, column: &str) -> Result<Value> {
        Ok(match column {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "age" => self.age.into(),
            "score" => self.score.into(),
            "active" => self.active.into(),
            "avatar" => self.avatar.clone().into(),
            other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
        })
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "id" => self.id = value.as_uuid()?,
            "name" => self.name = value.as_str()?.to_string(),
            "age" => self.age = if value.is_null() { None } else { Some(value.as_i64()?) },
            "score" => self.score = value.as_f64()?,
            "active" => self.active = value.as_bool()?,
            "avatar" => self.avatar = value.as_blob()?.to_vec(),
            other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
        }
        Ok(())
    }
}

pub const USERS_DDL: &str = r#"
    CREATE TABLE USERS (
        ID BLOB PRIMARY KEY,
        NAME TEXT NOT NULL,
        AGE INTEGER,
        SCORE REAL NOT NULL,
        ACTIVE INTEGER NOT NULL,
        AVATAR BLOB NOT NULL
    );
"#;

pub fn user(n: u128, name: &str) -> User {
    User {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        age: Some(30),
        score: 4.5,
        active: true,
        avatar: vec![0xde, 0xad, n as u8],
    }
}

/// A record type that declares no key column.
#[derive(Debug, Default)]
pub struct AuditLine {
    pub message: String,
}

impl DbObject for AuditLine {
    const TABLE_NAME: &'static str = "AUDIT";
    const COLUMNS: &'static [ColumnInfo] = &[ColumnInfo::new("message")];

    fn get_value(&self, column: &str) -> Result<Value> {
        match column {
            "message" => Ok(self.message.as_str().into()),
            other => Err(Error::unknown_column(Self::TABLE_NAME, other)),
        }
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "message" => self.message = value.as_str()?.to_string(),
            other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
        }
        Ok(())
    }
}

/// A record type with a composite key.
#[derive(Debug, Default)]
pub struct Membership {
    pub tenant: i64,
    pub member: i64,
    pub role: String,
}

impl DbObject for Membership {
    const TABLE_NAME: &'static str = "MEMBERSHIP";
    const COLUMNS: &'static [ColumnInfo] = &[
        ColumnInfo::key("tenant").with_type(StorageType::Integer),
        ColumnInfo::key("member").with_type(StorageType::Integer),
        ColumnInfo::new("role").with_type(StorageType::Char).with_size(16),
    ];

    fn get_value(&self, column: &str) -> Result<Value> {
        Ok(match column {
            "tenant" => self.tenant.into(),
            "member" => self.member.into(),
            "role" => self.role.as_str().into(),
            other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
        })
    }

    fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "tenant" => self.tenant = value.as_i64()?,
            "member" => self.member = value.as_i64()?,
            "role" => self.role = value.as_str()?.to_string(),
            other => return Err(Error::unknown_column(Self::TABLE_NAME, other)),
        }
        Ok(())
    }
}

/// Driver double that records every command and replays canned results.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    pub open: bool,
    pub open_calls: usize,
    pub commands: Vec<Command>,
    pub affected: usize,
    pub results: VecDeque<ResultSet>,
}

impl RecordingConnection {
    pub fn opened() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn last(&self) -> &Command {
        self.commands.last().expect("no command recorded")
    }
}

impl DbConnection for RecordingConnection {
    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> Result<()> {
        self.open = true;
        self.open_calls += 1;
        Ok(())
    }

    fn execute_non_query(&mut self, command: &Command) -> Result<usize> {
        self.commands.push(command.clone());
        Ok(self.affected)
    }

    fn execute_query(&mut self, command: &Command) -> Result<ResultSet> {
        self.commands.push(command.clone());
        Ok(self.results.pop_front().unwrap_or_default())
    }
}
