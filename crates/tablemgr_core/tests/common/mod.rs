#![allow(dead_code)]

use std::sync::Arc;
use tablemgr_core::{
    ColumnDef, ColumnType, Conn, FromRecord, Insertable, Manageable, Manager, ManagerResult,
    Record, SqliteConn, Table, Value, Values,
};

/// `items` table: serial id, name, is_free and insert timestamps.
pub fn items_table() -> Arc<Table> {
    Arc::new(
        Table::builder("items")
            .column(ColumnDef::serial("id"))
            .column(ColumnDef::new("name", ColumnType::Text).not_null())
            .column(
                ColumnDef::new("is_free", ColumnType::Boolean)
                    .not_null()
                    .default_sql("0"),
            )
            .columns(ColumnDef::timestamps())
            .primary_key(["id"])
            .build()
            .unwrap(),
    )
}

/// Fresh in-memory database with `tables` created.
pub fn sqlite_with(tables: &[&Arc<Table>]) -> Arc<SqliteConn> {
    let conn = SqliteConn::open_in_memory().unwrap();
    for table in tables {
        conn.create_table(table).unwrap();
    }
    Arc::new(conn)
}

pub fn items_manager() -> (Manager, Arc<SqliteConn>) {
    let table = items_table();
    let conn = sqlite_with(&[&table]);
    let manager = Manager::new(table).using(conn.clone() as Arc<dyn Conn>);
    (manager, conn)
}

/// id and timestamps are assigned by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub id: Option<i64>,
    pub name: String,
    pub is_free: bool,
    pub created_at: Option<String>,
}

impl Item {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn free(name: &str) -> Self {
        Self {
            is_free: true,
            ..Self::new(name)
        }
    }
}

impl Manageable for Item {
    fn exists(&self) -> bool {
        self.id.is_some()
    }

    fn keys(&self) -> Vec<Value> {
        vec![Value::from(self.id)]
    }
}

impl FromRecord for Item {
    fn from_record(record: &Record) -> ManagerResult<Self> {
        Ok(Self {
            id: record.get("id")?,
            name: record.get("name")?,
            is_free: record.get("is_free")?,
            created_at: record.get_opt("created_at")?,
        })
    }
}

impl Insertable for Item {
    fn values(&self) -> Values {
        let values = Values::new()
            .set("name", self.name.clone())
            .set("is_free", self.is_free);
        match self.id {
            Some(id) => values.set("id", id),
            None => values,
        }
    }
}
