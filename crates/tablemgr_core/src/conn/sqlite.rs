use super::{Conn, Record};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::error::ManagerResult;
use crate::sql::{CompiledSql, Statement};
use crate::table::Table;
use log::{debug, error};
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// SQLite-backed `Conn`.
///
/// One `rusqlite::Connection` serialized behind a mutex; statements from
/// concurrent managers sharing it run one at a time.
pub struct SqliteConn {
    inner: Mutex<Connection>,
}

impl SqliteConn {
    /// Wraps an already bootstrapped connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            inner: Mutex::new(conn),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn execute_batch(&self, sql: &str) -> ManagerResult<()> {
        self.inner.lock().execute_batch(sql)?;
        Ok(())
    }

    /// Creates `table` unless it already exists.
    pub fn create_table(&self, table: &Table) -> ManagerResult<()> {
        self.execute_batch(&table.create_if_not_exists())
    }
}

impl Conn for SqliteConn {
    fn query(&self, stmt: &Statement) -> ManagerResult<Vec<Record>> {
        let compiled = stmt.compile()?;
        let started_at = Instant::now();
        let result = {
            let conn = self.inner.lock();
            run(&conn, &compiled)
        };

        match &result {
            Ok(records) => debug!(
                "event=query module=conn status=ok kind={} table={} rows={} duration_ms={}",
                stmt.kind(),
                stmt.table(),
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=query module=conn status=error kind={} table={} duration_ms={} error={}",
                stmt.kind(),
                stmt.table(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn run(conn: &Connection, compiled: &CompiledSql) -> ManagerResult<Vec<Record>> {
    let mut prepared = conn.prepare(&compiled.sql)?;
    let columns: Arc<[String]> = prepared
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        prepared.execute(params_from_iter(compiled.params.iter()))?;
        return Ok(Vec::new());
    }

    let mut rows = prepared.query(params_from_iter(compiled.params.iter()))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|index| row.get::<_, Value>(index))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        records.push(Record::new(Arc::clone(&columns), values));
    }
    Ok(records)
}
