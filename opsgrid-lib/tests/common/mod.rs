//! Shared fixtures for engine tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use opsgrid_lib::catalog::{ActorRoles, ColumnCatalog, ColumnDescriptor};
use opsgrid_lib::error::{FetchError, PersistError};
use opsgrid_lib::model::Row;
use opsgrid_lib::persist::{MemoryStore, PersistenceAdapter};
use opsgrid_lib::source::{DataSource, MemorySource, PageQuery, PageResult};
use opsgrid_lib::{EngineConfig, TableEngine};

pub const NS: &str = "orders";

pub fn catalog() -> ColumnCatalog {
    ColumnCatalog::new(vec![
        ColumnDescriptor::new("order_no", "Order", 120),
        ColumnDescriptor::new("date", "Date", 110),
        ColumnDescriptor::new("customer", "Customer", 160),
        ColumnDescriptor::new("amount", "Amount", 100).category("Sales"),
        ColumnDescriptor::new("cost", "Cost", 100)
            .category("Finance")
            .restricted_to(["admin"]),
        ColumnDescriptor::new("margin", "Margin", 90)
            .category("Finance")
            .hidden()
            .restricted_to(["admin"]),
        ColumnDescriptor::new("note", "Note", 200).hidden().unsortable(),
    ])
}

pub fn admin() -> ActorRoles {
    ActorRoles::new(&catalog(), ["admin"])
}

pub fn clerk() -> ActorRoles {
    ActorRoles::new(&catalog(), ["clerk"])
}

/// 30 orders, one per day, amounts rising with the id.
pub fn rows() -> Vec<Row> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    (1..=30)
        .map(|i| {
            Row::new(i.to_string())
                .set("order_no", format!("SO-{:04}", i))
                .set("date", start + Duration::days(i64::from(i)))
                .set("customer", format!("Customer {}", i % 7))
                .set("amount", Decimal::new(i64::from(i) * 1250, 2))
                .set("cost", Decimal::new(i64::from(i) * 800, 2))
        })
        .collect()
}

pub fn config() -> EngineConfig {
    EngineConfig::new(NS).with_page_size(10)
}

pub async fn open_engine(store: Arc<dyn PersistenceAdapter>) -> TableEngine {
    TableEngine::builder(catalog(), Arc::new(MemorySource::new(rows())))
        .config(config())
        .store(store)
        .role_check(admin())
        .open()
        .await
}

/// Store that records every write.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes_to(&self, key: &str) -> usize {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.peek(key)
    }
}

#[async_trait]
impl PersistenceAdapter for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistError> {
        self.writes.lock().unwrap().push(key.to_string());
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.inner.remove(key).await
    }
}

/// Store that is always full.
#[derive(Debug, Default)]
pub struct FullStore;

#[async_trait]
impl PersistenceAdapter for FullStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Err(PersistError::Unavailable("storage disabled".to_string()))
    }

    async fn set(&self, key: &str, _value: String) -> Result<(), PersistError> {
        Err(PersistError::QuotaExceeded { key: key.to_string() })
    }

    async fn remove(&self, _key: &str) -> Result<(), PersistError> {
        Err(PersistError::Unavailable("storage disabled".to_string()))
    }
}

/// Source that can be switched to fail.
#[derive(Debug)]
pub struct FlakySource {
    inner: MemorySource,
    failing: AtomicBool,
}

impl FlakySource {
    pub fn new() -> Self {
        Self {
            inner: MemorySource::new(rows()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataSource for FlakySource {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult, FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::rejected(503, "service unavailable"));
        }
        self.inner.page(query)
    }
}
