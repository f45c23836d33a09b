use std::path::PathBuf;

use opsgrid_lib::catalog::AllowAll;
use opsgrid_lib::persist::{PersistenceAdapter, SqliteStore, StorageKeys, persist, restore};
use opsgrid_lib::{ColumnCatalog, ColumnDescriptor, LayoutState, SortSpec};

fn db_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("opsgrid-{}-{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    let path = db_path("reopen");

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(store.get("orders.columns.v1").await.unwrap(), None);
    store.set("orders.columns.v1", r#"["date"]"#.to_string()).await.unwrap();
    store.set("orders.columns.v1", r#"["amount"]"#.to_string()).await.unwrap();
    drop(store);

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(
        store.get("orders.columns.v1").await.unwrap().as_deref(),
        Some(r#"["amount"]"#)
    );

    store.remove("orders.columns.v1").await.unwrap();
    assert_eq!(store.get("orders.columns.v1").await.unwrap(), None);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_layout_round_trip_through_sqlite() {
    let path = db_path("layout");
    let catalog = ColumnCatalog::new(vec![
        ColumnDescriptor::new("date", "Date", 110),
        ColumnDescriptor::new("amount", "Amount", 120),
    ]);
    let keys = StorageKeys::new("orders");

    let mut state = LayoutState::from_catalog(&catalog, &AllowAll);
    state.move_column("amount", "date", false);
    state.set_width("date", 90);
    state.set_sort(Some(SortSpec::asc("amount")));

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(persist(&state, &store, &keys).await, 3);
    drop(store);

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(restore(&catalog, &AllowAll, &store, &keys).await, state);

    let _ = std::fs::remove_file(&path);
}
