//! Manager-level error taxonomy.
//!
//! # Responsibility
//! - Separate caller contract violations from execution and decode failures.
//! - Carry driver errors unchanged so callers can inspect them.
//!
//! # Invariants
//! - `PrimaryKeyArity` is never produced after a statement was issued.
//! - Driver errors are wrapped, never reinterpreted.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

#[derive(Debug)]
pub enum ManagerError {
    /// Number of key values does not match the table's primary-key arity.
    PrimaryKeyArity {
        table: String,
        expected: usize,
        given: usize,
    },
    UnknownColumn {
        table: String,
        column: String,
    },
    /// The manager has no connection bound via `using`/`set_conn`.
    NoConnection {
        table: String,
    },
    InvalidStatement(String),
    Db(DbError),
    Decode {
        column: String,
        message: String,
    },
    NotFound {
        table: String,
    },
    RowCountMismatch {
        expected: usize,
        actual: usize,
    },
}

impl ManagerError {
    /// Returns `true` for programming errors in the caller or table definition.
    ///
    /// These are not transient and must not be retried.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::PrimaryKeyArity { .. } | Self::UnknownColumn { .. } | Self::NoConnection { .. }
        )
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKeyArity {
                table,
                expected,
                given,
            } => write!(
                f,
                "table {table} has {expected} primary keys - {given} were given"
            ),
            Self::UnknownColumn { table, column } => {
                write!(f, "table {table} has no column named `{column}`")
            }
            Self::NoConnection { table } => {
                write!(f, "manager for table {table} has no connection")
            }
            Self::InvalidStatement(message) => write!(f, "invalid statement: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode { column, message } => {
                write!(f, "failed to decode column `{column}`: {message}")
            }
            Self::NotFound { table } => write!(f, "no matching row in table {table}"),
            Self::RowCountMismatch { expected, actual } => write!(
                f,
                "statement returned {actual} rows but destination expects {expected}"
            ),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ManagerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ManagerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
