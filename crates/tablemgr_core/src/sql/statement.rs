use super::{quote_ident, Clause, ColumnRef, Values};
use crate::error::{ManagerError, ManagerResult};
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};

/// Operation kind of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text plus positional parameters, ready for the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    table: String,
    columns: Vec<String>,
    wheres: Vec<Clause>,
    order_by: Vec<(ColumnRef, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectStmt {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            columns,
            wheres: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.wheres.push(clause);
        self
    }

    pub fn where_all(mut self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        self.wheres.extend(clauses);
        self
    }

    pub fn order_by(mut self, column: ColumnRef, order: Order) -> Self {
        self.order_by.push((column, order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn wheres(&self) -> &[Clause] {
        &self.wheres
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub(crate) fn add_conditionals(&mut self, clauses: &[Clause]) {
        self.wheres.extend_from_slice(clauses);
    }

    fn compile(&self) -> ManagerResult<CompiledSql> {
        if self.columns.is_empty() {
            return Err(ManagerError::InvalidStatement(format!(
                "select from {} has no columns",
                self.table
            )));
        }

        let mut sql = String::from("SELECT ");
        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            ColumnRef::new(self.table.as_str(), column.as_str()).render(&mut sql);
            sql.push_str(" AS ");
            quote_ident(&mut sql, column);
        }
        sql.push_str(" FROM ");
        quote_ident(&mut sql, &self.table);

        let mut params = Vec::new();
        render_wheres(&mut sql, &mut params, &self.wheres);

        for (index, (column, order)) in self.order_by.iter().enumerate() {
            sql.push_str(if index == 0 { " ORDER BY " } else { ", " });
            column.render(&mut sql);
            sql.push_str(match order {
                Order::Asc => " ASC",
                Order::Desc => " DESC",
            });
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        Ok(CompiledSql { sql, params })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    table: String,
    table_columns: Vec<String>,
    rows: Vec<Values>,
    returning: Vec<String>,
}

impl InsertStmt {
    pub fn new(table: impl Into<String>, table_columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            table_columns,
            rows: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Appends one row.
    pub fn values(mut self, row: Values) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Values>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Returns every column of the table for each inserted row.
    pub fn returning(mut self) -> Self {
        self.returning = self.table_columns.clone();
        self
    }

    fn compile(&self) -> ManagerResult<CompiledSql> {
        let Some(first) = self.rows.first() else {
            return Err(ManagerError::InvalidStatement(format!(
                "insert into {} has no rows",
                self.table
            )));
        };
        let columns: Vec<&str> = first.columns().collect();
        if self
            .rows
            .iter()
            .any(|row| !row.columns().eq(columns.iter().copied()))
        {
            return Err(ManagerError::InvalidStatement(format!(
                "rows of a multi-row insert into {} must set the same columns",
                self.table
            )));
        }

        let mut sql = String::from("INSERT INTO ");
        quote_ident(&mut sql, &self.table);
        let mut params = Vec::new();

        if columns.is_empty() {
            if self.rows.len() > 1 {
                return Err(ManagerError::InvalidStatement(format!(
                    "multi-row insert into {} must set at least one column",
                    self.table
                )));
            }
            sql.push_str(" DEFAULT VALUES");
        } else {
            sql.push_str(" (");
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    sql.push_str(", ");
                }
                quote_ident(&mut sql, column);
            }
            sql.push_str(") VALUES ");
            for (row_index, row) in self.rows.iter().enumerate() {
                if row_index > 0 {
                    sql.push_str(", ");
                }
                sql.push('(');
                for (index, (_, value)) in row.iter().enumerate() {
                    if index > 0 {
                        sql.push_str(", ");
                    }
                    sql.push('?');
                    params.push(value.clone());
                }
                sql.push(')');
            }
        }

        for (index, column) in self.returning.iter().enumerate() {
            sql.push_str(if index == 0 { " RETURNING " } else { ", " });
            quote_ident(&mut sql, column);
        }

        Ok(CompiledSql { sql, params })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    table: String,
    values: Values,
    wheres: Vec<Clause>,
}

impl UpdateStmt {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: Values::new(),
            wheres: Vec::new(),
        }
    }

    /// Sets the assignments; merges with any earlier call, later values win.
    pub fn values(mut self, values: Values) -> Self {
        self.values = self.values.merge(&values);
        self
    }

    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.wheres.push(clause);
        self
    }

    pub fn where_all(mut self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        self.wheres.extend(clauses);
        self
    }

    pub fn wheres(&self) -> &[Clause] {
        &self.wheres
    }

    pub(crate) fn add_conditionals(&mut self, clauses: &[Clause]) {
        self.wheres.extend_from_slice(clauses);
    }

    fn compile(&self) -> ManagerResult<CompiledSql> {
        if self.values.is_empty() {
            return Err(ManagerError::InvalidStatement(format!(
                "update of {} has no values",
                self.table
            )));
        }

        let mut sql = String::from("UPDATE ");
        quote_ident(&mut sql, &self.table);
        sql.push_str(" SET ");
        let mut params = Vec::new();
        for (index, (column, value)) in self.values.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            quote_ident(&mut sql, column);
            sql.push_str(" = ?");
            params.push(value.clone());
        }
        render_wheres(&mut sql, &mut params, &self.wheres);

        Ok(CompiledSql { sql, params })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    table: String,
    wheres: Vec<Clause>,
}

impl DeleteStmt {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
        }
    }

    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.wheres.push(clause);
        self
    }

    pub fn where_all(mut self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        self.wheres.extend(clauses);
        self
    }

    pub fn wheres(&self) -> &[Clause] {
        &self.wheres
    }

    pub(crate) fn add_conditionals(&mut self, clauses: &[Clause]) {
        self.wheres.extend_from_slice(clauses);
    }

    fn compile(&self) -> ManagerResult<CompiledSql> {
        let mut sql = String::from("DELETE FROM ");
        quote_ident(&mut sql, &self.table);
        let mut params = Vec::new();
        render_wheres(&mut sql, &mut params, &self.wheres);
        Ok(CompiledSql { sql, params })
    }
}

/// Any statement a manager can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Select(_) => StatementKind::Select,
            Self::Insert(_) => StatementKind::Insert,
            Self::Update(_) => StatementKind::Update,
            Self::Delete(_) => StatementKind::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::Select(stmt) => &stmt.table,
            Self::Insert(stmt) => &stmt.table,
            Self::Update(stmt) => &stmt.table,
            Self::Delete(stmt) => &stmt.table,
        }
    }

    /// Predicates currently attached to the statement. Inserts have none.
    pub fn wheres(&self) -> &[Clause] {
        match self {
            Self::Select(stmt) => stmt.wheres(),
            Self::Insert(_) => &[],
            Self::Update(stmt) => stmt.wheres(),
            Self::Delete(stmt) => stmt.wheres(),
        }
    }

    /// Appends `clauses` to the WHERE list. Inserts have no WHERE and are
    /// left as they are.
    pub(crate) fn add_conditionals(&mut self, clauses: &[Clause]) {
        match self {
            Self::Select(stmt) => stmt.add_conditionals(clauses),
            Self::Insert(_) => {}
            Self::Update(stmt) => stmt.add_conditionals(clauses),
            Self::Delete(stmt) => stmt.add_conditionals(clauses),
        }
    }

    pub fn compile(&self) -> ManagerResult<CompiledSql> {
        match self {
            Self::Select(stmt) => stmt.compile(),
            Self::Insert(stmt) => stmt.compile(),
            Self::Update(stmt) => stmt.compile(),
            Self::Delete(stmt) => stmt.compile(),
        }
    }
}

impl From<SelectStmt> for Statement {
    fn from(value: SelectStmt) -> Self {
        Self::Select(value)
    }
}

impl From<InsertStmt> for Statement {
    fn from(value: InsertStmt) -> Self {
        Self::Insert(value)
    }
}

impl From<UpdateStmt> for Statement {
    fn from(value: UpdateStmt) -> Self {
        Self::Update(value)
    }
}

impl From<DeleteStmt> for Statement {
    fn from(value: DeleteStmt) -> Self {
        Self::Delete(value)
    }
}

fn render_wheres(sql: &mut String, params: &mut Vec<Value>, wheres: &[Clause]) {
    for (index, clause) in wheres.iter().enumerate() {
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        clause.render(sql, params);
    }
}
