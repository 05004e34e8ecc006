//! Connection collaborator: executes statements and hands back decoded rows.
//!
//! # Responsibility
//! - Define the narrow `Conn` contract managers dispatch through.
//! - Provide the SQLite-backed implementation and row destinations.
//!
//! # Invariants
//! - `Conn::query` returns zero rows for statements without a result set.
//! - Driver and decode failures are returned unchanged, never retried.

mod destination;
mod record;
mod sqlite;

pub use destination::{Destination, FromRecord};
pub use record::Record;
pub use sqlite::SqliteConn;

use crate::error::ManagerResult;
use crate::sql::Statement;

/// Executes statements on behalf of a manager.
///
/// Implementations must be shareable across threads; managers hold them as
/// `Arc<dyn Conn>`.
pub trait Conn: Send + Sync {
    fn query(&self, stmt: &Statement) -> ManagerResult<Vec<Record>>;
}
