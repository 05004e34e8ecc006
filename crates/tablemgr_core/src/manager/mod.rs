//! Table manager: clause-injecting dispatcher plus primary-key CRUD helpers.
//!
//! # Responsibility
//! - Bind one table to a connection and three kind-specific clause sets.
//! - Merge the matching clause set into every SELECT/UPDATE/DELETE it runs.
//! - Derive primary-key predicates from entity keys.
//!
//! # Invariants
//! - `using`/`filter*` return new managers; the receiver is never mutated.
//! - INSERT statements are forwarded unmodified.
//! - A primary-key arity mismatch fails before any statement is issued.

mod clause_set;
mod entity;

pub use clause_set::ClauseSet;
pub use entity::{Insertable, Manageable};

use crate::conn::{Conn, Destination, FromRecord, Record};
use crate::error::{ManagerError, ManagerResult};
use crate::registry::{App, RegistryError};
use crate::sql::{Clause, Statement, StatementKind, Value, Values};
use crate::table::Table;
use log::{debug, error};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Manager for one table.
///
/// Cloning is cheap: the table, connection and clause sets are shared.
#[derive(Clone)]
pub struct Manager {
    table: Arc<Table>,
    conn: Option<Arc<dyn Conn>>,
    on_select: ClauseSet,
    on_update: ClauseSet,
    on_delete: ClauseSet,
}

impl Debug for Manager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("table", &self.table.name())
            .field("has_conn", &self.conn.is_some())
            .field("on_select", &self.on_select.len())
            .field("on_update", &self.on_update.len())
            .field("on_delete", &self.on_delete.len())
            .finish()
    }
}

impl Manager {
    /// Creates a manager with no connection and empty clause sets.
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            conn: None,
            on_select: ClauseSet::new(),
            on_update: ClauseSet::new(),
            on_delete: ClauseSet::new(),
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// `CREATE TABLE` DDL of the managed table.
    pub fn create(&self) -> String {
        self.table.create()
    }

    pub fn conn(&self) -> Option<&Arc<dyn Conn>> {
        self.conn.as_ref()
    }

    /// Replaces the connection of this manager value in place.
    ///
    /// Clones made earlier keep their own connection.
    pub fn set_conn(&mut self, conn: Arc<dyn Conn>) {
        self.conn = Some(conn);
    }

    /// Returns a copy of this manager bound to `conn`.
    pub fn using(&self, conn: Arc<dyn Conn>) -> Self {
        let mut manager = self.clone();
        manager.conn = Some(conn);
        manager
    }

    /// Alias of [`Manager::using`].
    pub fn use_conn(&self, conn: Arc<dyn Conn>) -> Self {
        self.using(conn)
    }

    /// Registers this manager with `app`.
    pub fn add_to(&self, app: &mut App) -> Result<(), RegistryError> {
        app.add(self.clone())
    }

    pub fn select_clauses(&self) -> &ClauseSet {
        &self.on_select
    }

    pub fn update_clauses(&self) -> &ClauseSet {
        &self.on_update
    }

    pub fn delete_clauses(&self) -> &ClauseSet {
        &self.on_delete
    }

    /// Clause set merged into statements of `kind`; `None` for inserts.
    ///
    /// [`Manager::prepare`] and [`Manager::dispatch`] both read this mapping.
    pub fn clauses_for(&self, kind: StatementKind) -> Option<&ClauseSet> {
        match kind {
            StatementKind::Select => Some(&self.on_select),
            StatementKind::Update => Some(&self.on_update),
            StatementKind::Delete => Some(&self.on_delete),
            StatementKind::Insert => None,
        }
    }

    /// Returns a manager that also applies `clauses` to every SELECT.
    pub fn filter_select(&self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = clauses.into_iter().collect();
        let mut manager = self.clone();
        manager.on_select = self.on_select.appended(&clauses);
        manager
    }

    /// Returns a manager that also applies `clauses` to every UPDATE.
    pub fn filter_update(&self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = clauses.into_iter().collect();
        let mut manager = self.clone();
        manager.on_update = self.on_update.appended(&clauses);
        manager
    }

    /// Returns a manager that also applies `clauses` to every DELETE.
    pub fn filter_delete(&self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = clauses.into_iter().collect();
        let mut manager = self.clone();
        manager.on_delete = self.on_delete.appended(&clauses);
        manager
    }

    /// Returns a manager that applies `clauses` to SELECT, UPDATE and DELETE.
    pub fn filter(&self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = clauses.into_iter().collect();
        let mut manager = self.clone();
        manager.on_select = self.on_select.appended(&clauses);
        manager.on_update = self.on_update.appended(&clauses);
        manager.on_delete = self.on_delete.appended(&clauses);
        manager
    }

    /// Merges the matching clause set into `stmt` without executing it.
    pub fn prepare(&self, stmt: impl Into<Statement>) -> Statement {
        let mut stmt = stmt.into();
        if let Some(clauses) = self.clauses_for(stmt.kind()) {
            stmt.add_conditionals(clauses.as_slice());
        }
        stmt
    }

    /// Injects clauses into `stmt` and executes it, returning raw rows.
    pub fn dispatch(&self, stmt: impl Into<Statement>) -> ManagerResult<Vec<Record>> {
        let stmt = stmt.into();
        let kind = stmt.kind();
        let injected = self.clauses_for(kind).map_or(0, ClauseSet::len);

        let Some(conn) = self.conn.as_ref() else {
            error!(
                "event=dispatch module=manager status=error kind={kind} table={} error_code=no_connection",
                self.table.name()
            );
            return Err(ManagerError::NoConnection {
                table: self.table.name().to_string(),
            });
        };

        debug!(
            "event=dispatch module=manager status=start kind={kind} table={} injected={injected}",
            self.table.name()
        );
        conn.query(&self.prepare(stmt))
    }

    /// Like [`Manager::dispatch`], decoding the rows into `dest`.
    pub fn dispatch_into<D: Destination + ?Sized>(
        &self,
        stmt: impl Into<Statement>,
        dest: &mut D,
    ) -> ManagerResult<()> {
        let records = self.dispatch(stmt)?;
        dest.decode(records)
    }

    /// Builds one equality predicate per primary-key column.
    ///
    /// # Errors
    /// - `PrimaryKeyArity` when `keys.len()` differs from the table's
    ///   primary-key arity. This is a caller bug; nothing is executed.
    pub fn where_primary_key(&self, keys: &[Value]) -> ManagerResult<Vec<Clause>> {
        let columns = self.table.primary_key_columns();
        if columns.len() != keys.len() {
            error!(
                "event=primary_key_arity module=manager status=error table={} expected={} given={}",
                self.table.name(),
                columns.len(),
                keys.len()
            );
            return Err(ManagerError::PrimaryKeyArity {
                table: self.table.name().to_string(),
                expected: columns.len(),
                given: keys.len(),
            });
        }

        Ok(columns
            .iter()
            .zip(keys)
            .map(|(column, key)| column.equals(key.clone()))
            .collect())
    }

    /// Loads the row with the given primary key into `dest`.
    ///
    /// Returns `NotFound` when no (visible) row matches.
    pub fn get<T: FromRecord>(&self, dest: &mut T, keys: &[Value]) -> ManagerResult<()> {
        let clauses = self.where_primary_key(keys)?;
        self.fetch_one(dest, self.table.select().where_all(clauses).limit(1))
    }

    /// Loads the first row whose `column` equals `value` into `dest`.
    pub fn get_by<T: FromRecord>(
        &self,
        dest: &mut T,
        column: &str,
        value: impl Into<Value>,
    ) -> ManagerResult<()> {
        let clause = self.table.column(column)?.equals(value);
        self.fetch_one(dest, self.table.select().where_clause(clause).limit(1))
    }

    /// Loads every visible row into `dest`.
    pub fn all<T: FromRecord>(&self, dest: &mut Vec<T>) -> ManagerResult<()> {
        self.dispatch_into(self.table.select(), dest)
    }

    /// Inserts `entity` unless it already exists, then refreshes it from the
    /// returned row. Existing entities are left alone; use
    /// [`Manager::update_values`] to change them.
    pub fn save<E: Insertable>(&self, entity: &mut E) -> ManagerResult<()> {
        if entity.exists() {
            debug!(
                "event=save module=manager status=skipped table={} reason=exists",
                self.table.name()
            );
            return Ok(());
        }
        let stmt = self.table.insert().values(entity.values()).returning();
        self.dispatch_into(stmt, std::slice::from_mut(entity))
    }

    /// Inserts all `entities` with one multi-row INSERT and refreshes each
    /// from its returned row. On failure no entity is modified.
    ///
    /// Every entity must produce the same set of columns from
    /// [`Insertable::values`]. A batch mixing entities with and without a
    /// preset key fails with [`ManagerError::InvalidStatement`]; insert those
    /// in separate batches.
    pub fn bulk_create<E: Insertable>(&self, entities: &mut [E]) -> ManagerResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let stmt = self
            .table
            .insert()
            .rows(entities.iter().map(Insertable::values))
            .returning();
        self.dispatch_into(stmt, entities)
    }

    /// Updates the row identified by `entity`'s keys with the merged `values`.
    ///
    /// Later value sets override earlier ones on column collisions.
    pub fn update_values<E: Manageable>(&self, entity: &E, values: &[Values]) -> ManagerResult<()> {
        let clauses = self.where_primary_key(&entity.keys())?;
        let merged = values
            .iter()
            .fold(Values::new(), |merged, next| merged.merge(next));
        self.dispatch(self.table.update().values(merged).where_all(clauses))?;
        Ok(())
    }

    /// Deletes the row identified by `entity`'s keys.
    pub fn delete<E: Manageable>(&self, entity: &E) -> ManagerResult<()> {
        let clauses = self.where_primary_key(&entity.keys())?;
        self.dispatch(self.table.delete().where_all(clauses))?;
        Ok(())
    }

    fn fetch_one<T: FromRecord>(
        &self,
        dest: &mut T,
        stmt: impl Into<Statement>,
    ) -> ManagerResult<()> {
        let mut found: Option<T> = None;
        self.dispatch_into(stmt, &mut found)?;
        match found {
            Some(value) => {
                *dest = value;
                Ok(())
            }
            None => Err(ManagerError::NotFound {
                table: self.table.name().to_string(),
            }),
        }
    }
}
