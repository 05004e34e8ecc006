use super::{Named, RegistryError};
use crate::manager::Manager;
use std::fmt::{Display, Formatter};

/// Named group of managers.
#[derive(Debug, Clone, Default)]
pub struct App {
    name: String,
    managers: Vec<Manager>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            managers: Vec::new(),
        }
    }

    /// Adds a manager; its table name must be unique within the app.
    pub fn add(&mut self, manager: Manager) -> Result<(), RegistryError> {
        let table = manager.table().name();
        if self.manager(table).is_some() {
            return Err(RegistryError::DuplicateTable {
                scope: format!("app {}", self.name),
                table: table.to_string(),
            });
        }
        self.managers.push(manager);
        Ok(())
    }

    pub fn managers(&self) -> &[Manager] {
        &self.managers
    }

    /// Manager whose table is named `table`.
    pub fn manager(&self, table: &str) -> Option<&Manager> {
        self.managers
            .iter()
            .find(|manager| manager.table().name() == table)
    }
}

impl Named for App {
    const KIND: &'static str = "apps";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Display for App {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.managers.is_empty() {
            return writeln!(f, "-- {} (no tables)", self.name);
        }
        writeln!(f, "-- {}", self.name)?;
        for manager in &self.managers {
            writeln!(f, "{}", manager.create())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::manager::Manager;
    use crate::registry::{Apps, RegistryError};
    use crate::table::{ColumnDef, Table};
    use std::sync::Arc;

    fn manager(name: &str) -> Manager {
        Manager::new(Arc::new(
            Table::builder(name)
                .column(ColumnDef::serial("id"))
                .primary_key(["id"])
                .build()
                .unwrap(),
        ))
    }

    #[test]
    fn add_to_rejects_second_manager_for_same_table() {
        let mut app = App::new("shop");
        let items = manager("items");
        items.add_to(&mut app).unwrap();

        let free_items = items.filter_select([items.table().c("id").unwrap().gt(0_i64)]);
        let err = free_items.add_to(&mut app).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTable { .. }));
        assert!(app.manager("items").is_some());
    }

    #[test]
    fn apps_render_and_list() {
        let apps = Apps::new();
        assert_eq!(apps.list(), "No apps");

        let mut shop = App::new("shop");
        shop.add(manager("items")).unwrap();
        apps.register(shop).unwrap();
        apps.register(App::new("empty")).unwrap();

        let all = apps.render_all();
        assert!(all.starts_with("-- shop\nCREATE TABLE \"items\""));
        assert!(all.ends_with("-- empty (no tables)\n"));
        assert_eq!(apps.sql(false, &["empty"]), "-- empty (no tables)\n\n");
    }
}
