mod common;

use std::sync::Arc;

use common::*;
use opsgrid_lib::catalog::{AllowAll, ColumnCatalog, ColumnDescriptor};
use opsgrid_lib::persist::{
    LayoutSection, MemoryStore, StorageKeys, encode_section, persist, restore,
};
use opsgrid_lib::{LayoutState, SortSpec};

fn keys() -> StorageKeys {
    StorageKeys::new(NS)
}

fn store(entries: &[(&str, &str)]) -> MemoryStore {
    MemoryStore::with_entries(entries.iter().copied())
}

#[tokio::test]
async fn test_restore_empty_store_gives_defaults() {
    let catalog = catalog();
    let state = restore(&catalog, &admin(), &MemoryStore::new(), &keys()).await;

    assert_eq!(state, LayoutState::from_catalog(&catalog, &admin()));
}

#[tokio::test]
async fn test_restore_drops_unknown_keys() {
    let catalog = catalog();
    let store = store(&[
        ("orders.columns.v1", r#"["amount","ghost","date"]"#),
        ("orders.widths.v1", r#"{"amount":180,"phantom":300}"#),
    ]);

    let state = restore(&catalog, &admin(), &store, &keys()).await;

    assert_eq!(state.visible_columns(), ["amount", "date"]);
    assert_eq!(state.column_widths().len(), 1);
    assert_eq!(state.width_of("amount", &catalog), 180);
    assert!(
        state
            .visible_columns()
            .iter()
            .chain(state.column_widths().keys())
            .all(|key| catalog.contains(key))
    );
}

#[tokio::test]
async fn test_restore_only_restricted_columns_falls_back() {
    let catalog = catalog();
    let store = store(&[("orders.columns.v1", r#"["cost","margin"]"#)]);

    let state = restore(&catalog, &clerk(), &store, &keys()).await;

    assert_eq!(
        state.visible_columns(),
        ["order_no", "date", "customer", "amount"]
    );
    assert!(!state.visible_columns().is_empty());
}

#[tokio::test]
async fn test_restore_fallback_never_empty() {
    // nothing is default-visible for this actor
    let catalog = ColumnCatalog::new(vec![
        ColumnDescriptor::new("secret", "Secret", 80).restricted_to(["admin"]),
        ColumnDescriptor::new("extra", "Extra", 80).hidden(),
    ]);
    let clerk = opsgrid_lib::catalog::ActorRoles::new(&catalog, ["clerk"]);
    let store = store(&[("orders.columns.v1", r#"["secret"]"#)]);

    let state = restore(&catalog, &clerk, &store, &keys()).await;

    assert_eq!(state.visible_columns(), ["extra"]);
}

#[tokio::test]
async fn test_restore_malformed_blobs_as_nothing_stored() {
    let catalog = catalog();
    let store = store(&[
        ("orders.columns.v1", "{not json"),
        ("orders.widths.v1", r#"["amount"]"#),
        ("orders.sort.v1", r#"{"key":"amount","direction":"sideways"}"#),
    ]);

    let state = restore(&catalog, &admin(), &store, &keys()).await;

    assert_eq!(state, LayoutState::from_catalog(&catalog, &admin()));
}

#[tokio::test]
async fn test_restore_clamps_and_filters_widths() {
    let catalog = catalog();
    let store = store(&[(
        "orders.widths.v1",
        r#"{"date":12,"amount":"wide","customer":200.6}"#,
    )]);

    let state = restore(&catalog, &AllowAll, &store, &keys()).await;

    assert_eq!(state.width_of("date", &catalog), 50);
    assert_eq!(state.width_of("customer", &catalog), 201);
    assert_eq!(state.column_widths().get("amount"), None);
}

#[tokio::test]
async fn test_restore_sort() {
    let catalog = catalog();

    let sorted = store(&[("orders.sort.v1", r#"{"key":"date","direction":"ascending"}"#)]);
    let state = restore(&catalog, &admin(), &sorted, &keys()).await;
    assert_eq!(state.sort(), Some(&SortSpec::asc("date")));

    let unsortable = store(&[("orders.sort.v1", r#"{"key":"note","direction":"descending"}"#)]);
    let state = restore(&catalog, &admin(), &unsortable, &keys()).await;
    assert_eq!(state.sort(), None);

    let restricted = store(&[("orders.sort.v1", r#"{"key":"cost","direction":"descending"}"#)]);
    let state = restore(&catalog, &clerk(), &restricted, &keys()).await;
    assert_eq!(state.sort(), None);

    let cleared = store(&[("orders.sort.v1", "null")]);
    let state = restore(&catalog, &admin(), &cleared, &keys()).await;
    assert_eq!(state.sort(), None);
}

#[tokio::test]
async fn test_sections_are_versioned_independently() {
    let catalog = catalog();
    let store = store(&[
        ("orders.columns.v0", r#"["amount"]"#),
        ("orders.widths.v1", r#"{"amount":222}"#),
    ]);

    let state = restore(&catalog, &admin(), &store, &keys()).await;

    assert_eq!(state.visible_columns().len(), 5);
    assert_eq!(state.width_of("amount", &catalog), 222);
}

#[tokio::test]
async fn test_persist_then_restore() {
    let catalog = catalog();
    let store = Arc::new(MemoryStore::new());
    let mut state = LayoutState::from_catalog(&catalog, &admin());
    state.move_column("cost", "order_no", false);
    state.set_width("cost", 140);
    state.set_sort(Some(SortSpec::desc("cost")));

    assert_eq!(persist(&state, &*store, &keys()).await, 3);
    assert_eq!(
        encode_section(&state, LayoutSection::Sort).unwrap(),
        r#"{"key":"cost","direction":"descending"}"#
    );

    let restored = restore(&catalog, &admin(), &*store, &keys()).await;
    assert_eq!(restored, state);

    // the same blob restored for a clerk loses everything admin-only
    let restored = restore(&catalog, &clerk(), &*store, &keys()).await;
    assert!(!restored.is_visible("cost"));
    assert_eq!(restored.sort(), None);
}
