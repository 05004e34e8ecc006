use crate::error::{ManagerError, ManagerResult};
use rusqlite::types::{FromSql, Value, ValueRef};
use std::sync::Arc;

/// One result row with its column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Builds a row. Column names are usually shared by every row of a result.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    /// Decodes one column; a missing column is a decode failure.
    pub fn get<T: FromSql>(&self, column: &str) -> ManagerResult<T> {
        let value = self.value(column).ok_or_else(|| ManagerError::Decode {
            column: column.to_string(),
            message: "column missing from result row".to_string(),
        })?;
        T::column_result(ValueRef::from(value)).map_err(|err| ManagerError::Decode {
            column: column.to_string(),
            message: err.to_string(),
        })
    }

    /// Decodes one column, treating absence as `None`.
    pub fn get_opt<T: FromSql>(&self, column: &str) -> ManagerResult<Option<T>> {
        match self.value(column) {
            Some(_) => self.get::<Option<T>>(column),
            None => Ok(None),
        }
    }
}
