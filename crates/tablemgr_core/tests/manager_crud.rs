mod common;

use common::{items_manager, sqlite_with, Item};
use std::sync::Arc;
use tablemgr_core::{
    ColumnDef, ColumnType, Conn, FromRecord, Manageable, Manager, ManagerError, ManagerResult,
    Record, Table, Value, Values,
};

#[test]
fn save_assigns_identity_and_timestamps() {
    let (items, _conn) = items_manager();

    let mut a = Item::new("a");
    assert!(!a.exists());
    items.save(&mut a).unwrap();

    assert_eq!(a.id, Some(1));
    assert_eq!(a.name, "a");
    assert!(a.created_at.as_deref().is_some_and(|value| !value.is_empty()));
}

#[test]
fn save_update_get_scenario() {
    let (items, _conn) = items_manager();

    let mut a = Item::new("a");
    items.save(&mut a).unwrap();

    let mut loaded = Item::default();
    items.get(&mut loaded, &[Value::Integer(1)]).unwrap();
    assert_eq!(loaded.id, Some(1));
    assert_eq!(loaded.name, "a");

    items
        .update_values(&a, &[Values::new().set("name", "b".to_string())])
        .unwrap();
    items.get(&mut loaded, &[Value::Integer(1)]).unwrap();
    assert_eq!(loaded.id, Some(1));
    assert_eq!(loaded.name, "b");
}

#[test]
fn save_of_existing_entity_does_not_write() {
    let (items, _conn) = items_manager();

    let mut a = Item::new("a");
    items.save(&mut a).unwrap();

    let mut renamed = a.clone();
    renamed.name = "changed locally".to_string();
    items.save(&mut renamed).unwrap();
    assert_eq!(renamed.name, "changed locally");

    let mut all: Vec<Item> = Vec::new();
    items.all(&mut all).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "a");
}

#[test]
fn bulk_create_then_all_returns_created_rows() {
    let (items, _conn) = items_manager();

    let mut created = vec![Item::new("e1"), Item::new("e2")];
    items.bulk_create(&mut created).unwrap();
    assert!(created.iter().all(Manageable::exists));
    assert_eq!(created[0].name, "e1");
    assert_eq!(created[1].name, "e2");

    let ids: Vec<Value> = created.iter().map(|item| Value::from(item.id)).collect();
    let by_ids = items.filter_select([items.table().c("id").unwrap().in_list(ids)]);
    let mut all: Vec<Item> = Vec::new();
    by_ids.all(&mut all).unwrap();
    assert_eq!(all, created);
}

#[test]
fn bulk_create_rejects_mixed_preset_keys() {
    let (items, _conn) = items_manager();

    let mut preset = Item::new("preset");
    preset.id = Some(40);
    let mut mixed = vec![preset, Item::new("fresh")];
    let err = items.bulk_create(&mut mixed).unwrap_err();

    assert!(matches!(err, ManagerError::InvalidStatement(_)));
    assert_eq!(mixed[0].id, Some(40));
    assert!(!mixed[1].exists());
    let mut all: Vec<Item> = Vec::new();
    items.all(&mut all).unwrap();
    assert!(all.is_empty());
}

#[test]
fn get_missing_row_is_not_found() {
    let (items, _conn) = items_manager();
    let mut dest = Item::default();
    let err = items.get(&mut dest, &[Value::Integer(42)]).unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { .. }));
    assert!(!err.is_contract_violation());
}

#[test]
fn get_by_matches_arbitrary_column() {
    let (items, _conn) = items_manager();
    let mut created = vec![Item::new("a"), Item::free("b")];
    items.bulk_create(&mut created).unwrap();

    let mut dest = Item::default();
    items.get_by(&mut dest, "name", "b".to_string()).unwrap();
    assert_eq!(dest, created[1]);
}

#[test]
fn primary_key_arity_mismatch_is_a_contract_violation() {
    let (items, _conn) = items_manager();
    let mut dest = Item::default();

    let err = items.get(&mut dest, &[]).unwrap_err();
    assert!(err.is_contract_violation());
    assert!(matches!(
        err,
        ManagerError::PrimaryKeyArity {
            expected: 1,
            given: 0,
            ..
        }
    ));
}

#[test]
fn delete_removes_row_by_primary_key() {
    let (items, _conn) = items_manager();
    let mut created = vec![Item::new("a"), Item::new("b")];
    items.bulk_create(&mut created).unwrap();

    items.delete(&created[0]).unwrap();

    let mut all: Vec<Item> = Vec::new();
    items.all(&mut all).unwrap();
    assert_eq!(all, vec![created[1].clone()]);
}

#[test]
fn driver_failure_is_propagated_and_entities_untouched() {
    let (items, _conn) = items_manager();
    let mut first = Item::new("a");
    items.save(&mut first).unwrap();

    // Reusing an assigned id violates the primary key.
    let mut batch = vec![
        Item::new("b"),
        Item {
            id: first.id,
            ..Item::new("dup")
        },
    ];
    batch[0].id = Some(99);
    let before = batch.clone();

    let err = items.bulk_create(&mut batch).unwrap_err();
    assert!(matches!(err, ManagerError::Db(_)));
    assert!(!err.is_contract_violation());
    assert_eq!(batch, before);

    let mut all: Vec<Item> = Vec::new();
    items.all(&mut all).unwrap();
    assert_eq!(all, vec![first]);
}

/// Two-column primary key: keys must follow the declared order.
#[derive(Debug, Clone, PartialEq)]
struct Membership {
    org_id: i64,
    user_id: i64,
    role: String,
}

impl Manageable for Membership {
    fn exists(&self) -> bool {
        true
    }

    fn keys(&self) -> Vec<Value> {
        vec![Value::Integer(self.org_id), Value::Integer(self.user_id)]
    }
}

impl FromRecord for Membership {
    fn from_record(record: &Record) -> ManagerResult<Self> {
        Ok(Self {
            org_id: record.get("org_id")?,
            user_id: record.get("user_id")?,
            role: record.get("role")?,
        })
    }
}

#[test]
fn composite_primary_key_update_and_get() {
    let table = Arc::new(
        Table::builder("memberships")
            .column(ColumnDef::new("org_id", ColumnType::Integer).not_null())
            .column(ColumnDef::new("user_id", ColumnType::Integer).not_null())
            .column(ColumnDef::new("role", ColumnType::Text).not_null())
            .primary_key(["org_id", "user_id"])
            .build()
            .unwrap(),
    );
    let conn = sqlite_with(&[&table]);
    conn.execute_batch(
        "INSERT INTO memberships (org_id, user_id, role) VALUES (1, 2, 'member'), (2, 1, 'owner');",
    )
    .unwrap();
    let memberships = Manager::new(table).using(conn as Arc<dyn Conn>);

    let member = Membership {
        org_id: 1,
        user_id: 2,
        role: "member".to_string(),
    };
    memberships
        .update_values(&member, &[Values::new().set("role", "admin".to_string())])
        .unwrap();

    let mut loaded = member.clone();
    memberships
        .get(&mut loaded, &[Value::Integer(1), Value::Integer(2)])
        .unwrap();
    assert_eq!(loaded.role, "admin");

    let mut other = member.clone();
    memberships
        .get(&mut other, &[Value::Integer(2), Value::Integer(1)])
        .unwrap();
    assert_eq!(other.role, "owner");

    let err = memberships
        .get(&mut other, &[Value::Integer(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        ManagerError::PrimaryKeyArity {
            expected: 2,
            given: 1,
            ..
        }
    ));
}
