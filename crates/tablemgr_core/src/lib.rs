//! Table managers over a SQL statement model.
//!
//! A [`Manager`] binds one [`Table`] to a connection and a set of filter
//! clauses that are merged into every SELECT, UPDATE and DELETE it runs.
//! Managers are values: `using` and `filter*` return new managers, so
//! request-scoped variants can be derived freely across threads.

pub mod config;
pub mod conn;
pub mod db;
pub mod error;
pub mod logging;
pub mod manager;
pub mod registry;
pub mod sql;
pub mod table;

pub use config::{ConfigError, DatabaseSettings, LoggingSettings, Settings};
pub use conn::{Conn, Destination, FromRecord, Record, SqliteConn};
pub use error::{ManagerError, ManagerResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use manager::{ClauseSet, Insertable, Manageable, Manager};
pub use registry::{App, Apps, Named, Registry, RegistryError, Schema, Schemas};
pub use sql::{Clause, ColumnRef, Statement, StatementKind, Value, Values};
pub use table::{ColumnDef, ColumnType, SchemaError, Table};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
