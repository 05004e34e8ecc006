//! Built-in `shop` app used by the dump tool.

use std::sync::Arc;
use tablemgr_core::{App, ColumnDef, ColumnType, Conn, Manager, Table};

pub fn shop_app(conn: &Arc<dyn Conn>) -> Result<App, Box<dyn std::error::Error>> {
    let items = Table::builder("items")
        .column(ColumnDef::serial("id"))
        .column(ColumnDef::new("name", ColumnType::Text).not_null())
        .column(
            ColumnDef::new("is_free", ColumnType::Boolean)
                .not_null()
                .default_sql("0"),
        )
        .columns(ColumnDef::timestamps())
        .primary_key(["id"])
        .build()?;

    let mut app = App::new("shop");
    Manager::new(Arc::new(items))
        .using(Arc::clone(conn))
        .add_to(&mut app)?;
    Ok(app)
}
