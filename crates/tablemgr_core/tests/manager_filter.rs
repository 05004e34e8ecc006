mod common;

use common::{items_manager, items_table, sqlite_with, Item};
use std::sync::Arc;
use std::thread;
use tablemgr_core::{Conn, Manager, Value, Values};

#[test]
fn filtered_manager_sees_only_matching_rows() {
    let (items, _conn) = items_manager();
    let free_items = items.filter([items.table().c("is_free").unwrap().equals(true)]);

    let mut created = vec![Item::new("A"), Item::free("B")];
    free_items.bulk_create(&mut created).unwrap();
    assert!(created.iter().all(|item| item.id.is_some()));

    let mut free: Vec<Item> = Vec::new();
    free_items.all(&mut free).unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].name, "B");

    let mut everything: Vec<Item> = Vec::new();
    items.all(&mut everything).unwrap();
    assert_eq!(everything.len(), 2);
    assert!(items.select_clauses().is_empty());
}

#[test]
fn select_filter_hides_rows_from_get() {
    let (items, _conn) = items_manager();
    let free_items = items.filter_select([items.table().c("is_free").unwrap().equals(true)]);

    let mut paid = Item::new("paid");
    items.save(&mut paid).unwrap();

    let mut dest = Item::default();
    assert!(free_items
        .get(&mut dest, &[Value::from(paid.id)])
        .is_err());
    items.get(&mut dest, &[Value::from(paid.id)]).unwrap();
    assert_eq!(dest, paid);
}

#[test]
fn update_filter_guards_update_values() {
    let (items, _conn) = items_manager();
    let free_only = items.filter_update([items.table().c("is_free").unwrap().equals(true)]);

    let mut created = vec![Item::new("paid"), Item::free("free")];
    items.bulk_create(&mut created).unwrap();

    let rename = [Values::new().set("name", "renamed".to_string())];
    free_only.update_values(&created[0], &rename).unwrap();
    free_only.update_values(&created[1], &rename).unwrap();

    let mut all: Vec<Item> = Vec::new();
    items.all(&mut all).unwrap();
    let names: Vec<&str> = all.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["paid", "renamed"]);
}

#[test]
fn delete_filter_guards_deletes() {
    let (items, _conn) = items_manager();
    let free_only = items.filter_delete([items.table().c("is_free").unwrap().equals(true)]);

    let mut created = vec![Item::new("paid"), Item::free("free")];
    items.bulk_create(&mut created).unwrap();

    free_only.dispatch(items.table().delete()).unwrap();

    let mut remaining: Vec<Item> = Vec::new();
    items.all(&mut remaining).unwrap();
    assert_eq!(remaining, vec![created[0].clone()]);
}

#[test]
fn inserts_bypass_filters() {
    let (items, _conn) = items_manager();
    let free_items = items.filter([items.table().c("is_free").unwrap().equals(true)]);

    let mut paid = Item::new("paid");
    free_items.save(&mut paid).unwrap();
    assert!(paid.id.is_some());
    assert!(!paid.is_free);
}

#[test]
fn managers_derived_per_thread_use_their_own_connection() {
    let table = items_table();
    let base = Manager::new(table.clone());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let base = base.clone();
            let conn = sqlite_with(&[&table]);
            thread::spawn(move || {
                let scoped = base.using(conn as Arc<dyn Conn>);
                let mut created: Vec<Item> = (0..=worker)
                    .map(|index| Item::new(&format!("w{worker}-{index}")))
                    .collect();
                scoped.bulk_create(&mut created).unwrap();

                let mut all: Vec<Item> = Vec::new();
                scoped.all(&mut all).unwrap();
                all.len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
    assert!(base.conn().is_none());
}
