//! Named registries of apps (managers) and schemas (tables).
//!
//! # Responsibility
//! - Group managers/tables under a name for listing and DDL dumps.
//! - Own registration explicitly; there is no process-global registry.
//!
//! # Invariants
//! - Names are unique per registry and per app/schema.
//! - Registered items are immutable; readers never block each other.

mod app;
mod schema;

pub use app::App;
pub use schema::Schema;

use log::{info, warn};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Registration errors. Expected only at startup, while wiring the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidName(String),
    Duplicate { kind: &'static str, name: String },
    DuplicateTable { scope: String, table: String },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "registry name is invalid: `{value}`"),
            Self::Duplicate { kind, name } => write!(f, "{kind} already registered: {name}"),
            Self::DuplicateTable { scope, table } => {
                write!(f, "a table named {table} already exists in {scope}")
            }
        }
    }
}

impl Error for RegistryError {}

/// Something a [`Registry`] can hold.
pub trait Named: Display {
    /// Plural label used in listings, e.g. `apps`.
    const KIND: &'static str;

    fn name(&self) -> &str;
}

/// Ordered, thread-safe collection of named items.
pub struct Registry<T: Named> {
    items: RwLock<Vec<Arc<T>>>,
}

pub type Apps = Registry<App>;
pub type Schemas = Registry<Schema>;

impl<T: Named> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Named> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `item`, keeping registration order.
    pub fn register(&self, item: T) -> Result<Arc<T>, RegistryError> {
        let name = item.name().trim();
        if name.is_empty() {
            warn!(
                "event=register module=registry status=error kind={} error_code=invalid_name",
                T::KIND
            );
            return Err(RegistryError::InvalidName(item.name().to_string()));
        }

        let mut items = self.items.write();
        if items.iter().any(|existing| existing.name() == item.name()) {
            warn!(
                "event=register module=registry status=error kind={} name={} error_code=duplicate",
                T::KIND,
                item.name()
            );
            return Err(RegistryError::Duplicate {
                kind: T::KIND,
                name: item.name().to_string(),
            });
        }

        info!(
            "event=register module=registry status=ok kind={} name={}",
            T::KIND,
            item.name()
        );
        let item = Arc::new(item);
        items.push(Arc::clone(&item));
        Ok(item)
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.items
            .read()
            .iter()
            .find(|item| item.name() == name)
            .cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.items.read().iter().any(|item| item.name() == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.items
            .read()
            .iter()
            .map(|item| item.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Human-readable listing of registered names.
    pub fn list(&self) -> String {
        let items = self.items.read();
        if items.is_empty() {
            return format!("No {}", T::KIND);
        }
        let mut out = format!("Available {}:\n", T::KIND);
        for item in items.iter() {
            out.push_str(&format!(" * {}\n", item.name()));
        }
        out
    }

    /// Concatenated rendering of every item.
    pub fn render_all(&self) -> String {
        self.items
            .read()
            .iter()
            .map(|item| item.to_string())
            .collect()
    }

    /// DDL dump entry point for tooling.
    ///
    /// - `all`: every item.
    /// - no names, or any unknown name: the listing.
    /// - otherwise: each named item followed by a blank line.
    pub fn sql(&self, all: bool, names: &[&str]) -> String {
        if all {
            return self.render_all();
        }
        if names.is_empty() || names.iter().any(|name| !self.has(name)) {
            return self.list();
        }
        names
            .iter()
            .filter_map(|name| self.get(name))
            .map(|item| format!("{item}\n"))
            .collect()
    }
}
