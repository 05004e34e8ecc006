//! Narrow SQL statement model used by managers.
//!
//! # Responsibility
//! - Represent SELECT/INSERT/UPDATE/DELETE as one tagged sum type.
//! - Render statements to SQLite SQL with positional parameters.
//!
//! # Invariants
//! - Identifiers are always double-quoted.
//! - WHERE clauses are ANDed in insertion order.
//! - Values are never interpolated into SQL text.

mod clause;
mod statement;
mod values;

pub use clause::{Clause, ColumnRef, CompareOp};
pub use rusqlite::types::Value;
pub use statement::{
    CompiledSql, DeleteStmt, InsertStmt, Order, SelectStmt, Statement, StatementKind, UpdateStmt,
};
pub use values::Values;

pub(crate) fn quote_ident(out: &mut String, ident: &str) {
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
