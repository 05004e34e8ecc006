//! Table descriptor: columns, primary key and statement factories.
//!
//! # Responsibility
//! - Describe one table once, then hand out statements bound to it.
//! - Render `CREATE TABLE` DDL for schema dumps and test setup.
//!
//! # Invariants
//! - Identifiers match `^[A-Za-z_][A-Za-z0-9_]*$`.
//! - The primary-key list is non-empty, duplicate-free, and fixed at build time.
//! - Every primary-key column is a declared column.

use crate::error::{ManagerError, ManagerResult};
use crate::sql::{quote_ident, ColumnRef, DeleteStmt, InsertStmt, SelectStmt, UpdateStmt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Returns whether `value` is usable as a table or column name.
pub fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

/// Table definition errors. Raised once, when the descriptor is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidIdentifier(String),
    DuplicateColumn { table: String, column: String },
    MissingPrimaryKey(String),
    UnknownPrimaryKeyColumn { table: String, column: String },
    DuplicatePrimaryKeyColumn { table: String, column: String },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier(value) => write!(f, "invalid identifier `{value}`"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "table {table} declares column `{column}` twice")
            }
            Self::MissingPrimaryKey(table) => write!(f, "table {table} has no primary key"),
            Self::UnknownPrimaryKeyColumn { table, column } => write!(
                f,
                "primary key column `{column}` is not a column of table {table}"
            ),
            Self::DuplicatePrimaryKeyColumn { table, column } => write!(
                f,
                "primary key column `{column}` is listed twice for table {table}"
            ),
        }
    }
}

impl Error for SchemaError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Boolean,
    Blob,
    Timestamp,
}

impl ColumnType {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Blob => "BLOB",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
    pub not_null: bool,
    /// Raw SQL default expression, e.g. `CURRENT_TIMESTAMP`.
    pub default: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            not_null: false,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default_sql(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }

    /// Integer identity assigned by the database when omitted on insert.
    ///
    /// Must be the table's sole primary key to alias SQLite's rowid.
    pub fn serial(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    /// `created_at` and `updated_at`, both defaulting to the insert time.
    pub fn timestamps() -> [Self; 2] {
        [
            Self::new("created_at", ColumnType::Timestamp)
                .not_null()
                .default_sql("CURRENT_TIMESTAMP"),
            Self::new("updated_at", ColumnType::Timestamp)
                .not_null()
                .default_sql("CURRENT_TIMESTAMP"),
        ]
    }

    fn render(&self, out: &mut String) {
        quote_ident(out, &self.name);
        out.push(' ');
        out.push_str(self.ty.as_sql());
        if self.not_null {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            out.push_str(" DEFAULT ");
            out.push_str(default);
        }
    }
}

/// Immutable table descriptor, usually shared as `Arc<Table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    primary_key: Vec<String>,
}

pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnDef>,
    primary_key: Vec<String>,
}

impl TableBuilder {
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Declares the primary key, in the order entity keys are reported.
    pub fn primary_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Table, SchemaError> {
        if !is_valid_identifier(&self.name) {
            return Err(SchemaError::InvalidIdentifier(self.name));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !is_valid_identifier(&column.name) {
                return Err(SchemaError::InvalidIdentifier(column.name.clone()));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        if self.primary_key.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(self.name));
        }
        let mut seen_keys = HashSet::new();
        for key in &self.primary_key {
            if !seen.contains(key.as_str()) {
                return Err(SchemaError::UnknownPrimaryKeyColumn {
                    table: self.name.clone(),
                    column: key.clone(),
                });
            }
            if !seen_keys.insert(key.as_str()) {
                return Err(SchemaError::DuplicatePrimaryKeyColumn {
                    table: self.name.clone(),
                    column: key.clone(),
                });
            }
        }

        Ok(Table {
            name: self.name,
            columns: self.columns,
            primary_key: self.primary_key,
        })
    }
}

impl Table {
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.name == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> ManagerResult<ColumnRef> {
        if !self.has_column(name) {
            return Err(ManagerError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        Ok(ColumnRef::new(self.name.as_str(), name))
    }

    /// Shorthand for [`Table::column`].
    pub fn c(&self, name: &str) -> ManagerResult<ColumnRef> {
        self.column(name)
    }

    /// Primary-key column names in declared order.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn primary_key_columns(&self) -> Vec<ColumnRef> {
        self.primary_key
            .iter()
            .map(|key| ColumnRef::new(self.name.as_str(), key.as_str()))
            .collect()
    }

    pub fn select(&self) -> SelectStmt {
        SelectStmt::new(self.name.as_str(), self.column_names())
    }

    pub fn insert(&self) -> InsertStmt {
        InsertStmt::new(self.name.as_str(), self.column_names())
    }

    pub fn update(&self) -> UpdateStmt {
        UpdateStmt::new(self.name.as_str())
    }

    pub fn delete(&self) -> DeleteStmt {
        DeleteStmt::new(self.name.as_str())
    }

    /// `CREATE TABLE` DDL for this table.
    pub fn create(&self) -> String {
        self.render_create(false)
    }

    pub fn create_if_not_exists(&self) -> String {
        self.render_create(true)
    }

    fn render_create(&self, if_not_exists: bool) -> String {
        let mut out = String::from("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        quote_ident(&mut out, &self.name);
        out.push_str(" (\n");
        for column in &self.columns {
            out.push_str("  ");
            column.render(&mut out);
            out.push_str(",\n");
        }
        out.push_str("  PRIMARY KEY (");
        for (index, key) in self.primary_key.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            quote_ident(&mut out, key);
        }
        out.push_str(")\n);");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_identifier, ColumnDef, ColumnType, SchemaError, Table};
    use crate::error::ManagerError;

    fn items() -> Table {
        Table::builder("items")
            .column(ColumnDef::serial("id"))
            .column(ColumnDef::new("name", ColumnType::Text).not_null())
            .column(ColumnDef::new("is_free", ColumnType::Boolean).not_null())
            .columns(ColumnDef::timestamps())
            .primary_key(["id"])
            .build()
            .unwrap()
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(is_valid_identifier("items_2"));
        assert!(!is_valid_identifier("2items"));
        assert!(!is_valid_identifier("items; DROP"));

        let err = Table::builder("bad name")
            .column(ColumnDef::serial("id"))
            .primary_key(["id"])
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidIdentifier("bad name".to_string()));
    }

    #[test]
    fn primary_key_must_be_declared_and_known() {
        let missing = Table::builder("items")
            .column(ColumnDef::serial("id"))
            .build()
            .unwrap_err();
        assert_eq!(missing, SchemaError::MissingPrimaryKey("items".to_string()));

        let unknown = Table::builder("items")
            .column(ColumnDef::serial("id"))
            .primary_key(["uuid"])
            .build()
            .unwrap_err();
        assert!(matches!(unknown, SchemaError::UnknownPrimaryKeyColumn { .. }));

        let duplicate = Table::builder("items")
            .column(ColumnDef::serial("id"))
            .primary_key(["id", "id"])
            .build()
            .unwrap_err();
        assert!(matches!(
            duplicate,
            SchemaError::DuplicatePrimaryKeyColumn { .. }
        ));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Table::builder("items")
            .column(ColumnDef::serial("id"))
            .column(ColumnDef::new("id", ColumnType::Text))
            .primary_key(["id"])
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn column_lookup_reports_unknown_names() {
        let table = items();
        assert_eq!(table.column("name").unwrap().name(), "name");
        let err = table.c("missing").unwrap_err();
        assert!(matches!(err, ManagerError::UnknownColumn { .. }));
    }

    #[test]
    fn create_renders_columns_and_primary_key() {
        let ddl = items().create();
        assert_eq!(
            ddl,
            "CREATE TABLE \"items\" (\n  \"id\" INTEGER,\n  \"name\" TEXT NOT NULL,\n  \"is_free\" BOOLEAN NOT NULL,\n  \"created_at\" TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,\n  \"updated_at\" TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,\n  PRIMARY KEY (\"id\")\n);"
        );
        assert!(items()
            .create_if_not_exists()
            .starts_with("CREATE TABLE IF NOT EXISTS \"items\""));
    }
}
