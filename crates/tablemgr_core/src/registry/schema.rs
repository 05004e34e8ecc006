use super::{Named, RegistryError};
use crate::table::Table;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Named group of table descriptors.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: String,
    tables: Vec<Arc<Table>>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    /// Adds a table; a table with the same name must not exist yet.
    pub fn add(&mut self, table: Arc<Table>) -> Result<(), RegistryError> {
        if self.has_table(table.name()) {
            return Err(RegistryError::DuplicateTable {
                scope: format!("schema {}", self.name),
                table: table.name().to_string(),
            });
        }
        self.tables.push(table);
        Ok(())
    }

    /// Builder-style [`Schema::add`].
    pub fn with_table(mut self, table: Arc<Table>) -> Result<Self, RegistryError> {
        self.add(table)?;
        Ok(self)
    }

    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.iter().find(|table| table.name() == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }
}

impl Named for Schema {
    const KIND: &'static str = "schemas";

    fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.tables.is_empty() {
            return writeln!(f, "-- {} (no tables)", self.name);
        }
        writeln!(f, "-- {}", self.name)?;
        for table in &self.tables {
            writeln!(f, "{}", table.create())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Schema;
    use crate::registry::RegistryError;
    use crate::table::{ColumnDef, Table};
    use std::sync::Arc;

    fn table(name: &str) -> Arc<Table> {
        Arc::new(
            Table::builder(name)
                .column(ColumnDef::serial("id"))
                .primary_key(["id"])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn add_rejects_duplicate_table_names() {
        let mut schema = Schema::new("core");
        schema.add(table("items")).unwrap();
        let err = schema.add(table("items")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTable {
                scope: "schema core".to_string(),
                table: "items".to_string()
            }
        );
        assert_eq!(schema.tables().len(), 1);
    }

    #[test]
    fn display_renders_each_table_ddl() {
        let schema = Schema::new("core")
            .with_table(table("items"))
            .unwrap()
            .with_table(table("tags"))
            .unwrap();
        let rendered = schema.to_string();
        assert!(rendered.starts_with("-- core\nCREATE TABLE \"items\""));
        assert!(rendered.contains("\nCREATE TABLE \"tags\""));
        assert!(rendered.ends_with(");\n"));
    }
}
