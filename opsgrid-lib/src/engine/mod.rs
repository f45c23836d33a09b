//! Table engine
//!
//! [`TableEngine`] ties the controllers together for one table instance:
//! it owns the layout, the pointer sessions and the current page, routes
//! every mutation through the role check, flushes persistence, and keeps a
//! [`RenderedTable`] in step with all of it.
//!
//! The engine is a cheap-to-clone handle. Clones share state, so a host can
//! hand one clone to a spawned fetch task while the UI keeps interacting.
//! No lock is held across an `.await`.

mod columns;
mod fetch;
mod pointer;

pub use columns::ColumnChoice;
pub use fetch::{FetchOutcome, FetchTicket};
pub use pointer::PointerCapture;

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::catalog::AllowAll;
use crate::catalog::ColumnCatalog;
use crate::catalog::RoleCheck;
use crate::config::EngineConfig;
use crate::format::Formatters;
use crate::layout::LayoutState;
use crate::model::Row;
use crate::notify::LogNotifier;
use crate::notify::Notifier;
use crate::pagination::PageWindow;
use crate::pagination::compute_window;
use crate::persist::LayoutSection;
use crate::persist::MemoryStore;
use crate::persist::PersistenceAdapter;
use crate::persist::StorageKeys;
use crate::persist::persist_sections;
use crate::persist::restore;
use crate::render::RenderedTable;
use crate::render::TableRenderer;
use crate::reorder::ReorderController;
use crate::resize::ResizeController;
use crate::source::DataSource;
use crate::source::FilterSet;
use crate::sort::SortSpec;

/// Collaborators fixed for the engine's lifetime.
struct Services {
    config: EngineConfig,
    catalog: Arc<ColumnCatalog>,
    source: Arc<dyn DataSource>,
    store: Arc<dyn PersistenceAdapter>,
    notifier: Arc<dyn Notifier>,
    renderer: TableRenderer,
    keys: StorageKeys,
}

/// Mutable engine state.
struct EngineInner {
    layout: LayoutState,
    role: Arc<dyn RoleCheck>,
    reorder: ReorderController,
    resize: ResizeController,
    capture: Option<PointerCapture>,
    /// Width override the resized column had before the drag.
    resize_origin: Option<u32>,
    rows: Vec<Row>,
    rendered: RenderedTable,
    pagination: PageWindow,
    /// Sort the on-screen rows were fetched with.
    applied_sort: Option<SortSpec>,
    current_page: u32,
    page_size: u32,
    filters: FilterSet,
    total_count: u64,
    latest_request: u64,
    loading: bool,
}

impl EngineInner {
    /// Re-lays-out the current rows without fetching.
    fn rerender(&mut self, services: &Services) {
        self.rendered = services.renderer.render(&self.layout, &self.rows, &*self.role);
    }
}

/// Configurable data table engine for one table instance.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use opsgrid_lib::{ColumnCatalog, ColumnDescriptor, TableEngine};
/// use opsgrid_lib::source::MemorySource;
///
/// let catalog = ColumnCatalog::new(vec![
///     ColumnDescriptor::new("date", "Date", 110),
///     ColumnDescriptor::new("amount", "Amount", 120),
/// ]);
/// let engine = TableEngine::builder(catalog, Arc::new(MemorySource::new(rows)))
///     .open()
///     .await;
///
/// engine.refresh().await;
/// engine.toggle_sort("amount").await;
/// ```
#[derive(Clone)]
pub struct TableEngine {
    inner: Arc<RwLock<EngineInner>>,
    services: Arc<Services>,
}

impl TableEngine {
    /// Creates a builder for an engine over a catalog and data source.
    pub fn builder(catalog: impl Into<Arc<ColumnCatalog>>, source: Arc<dyn DataSource>) -> TableEngineBuilder {
        TableEngineBuilder::new(catalog.into(), source)
    }

    fn read<R>(&self, f: impl FnOnce(&EngineInner) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn update<R>(&self, f: impl FnOnce(&mut EngineInner, &Services) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard, &self.services)
    }

    /// Writes layout sections through the persistence adapter.
    ///
    /// Failures are logged by the persist layer and never surface here.
    async fn flush(&self, sections: &[LayoutSection]) {
        let snapshot = self.read(|inner| inner.layout.clone());
        let written = persist_sections(&snapshot, &*self.services.store, &self.services.keys, sections).await;
        if written < sections.len() {
            log::debug!("layout flush wrote {}/{} section(s)", written, sections.len());
        }
    }

    /// The column catalog.
    pub fn catalog(&self) -> &ColumnCatalog {
        &self.services.catalog
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.services.config
    }

    /// Snapshot of the layout.
    pub fn layout(&self) -> LayoutState {
        self.read(|inner| inner.layout.clone())
    }

    /// Visible column keys, left to right.
    pub fn visible_columns(&self) -> Vec<String> {
        self.read(|inner| inner.layout.visible_columns().to_vec())
    }

    /// Snapshot of the rendered header and body.
    pub fn rendered(&self) -> RenderedTable {
        self.read(|inner| inner.rendered.clone())
    }

    /// Rows of the last applied page.
    pub fn rows(&self) -> Vec<Row> {
        self.read(|inner| inner.rows.clone())
    }

    /// Pagination of the last applied page.
    pub fn pagination(&self) -> PageWindow {
        self.read(|inner| inner.pagination.clone())
    }

    pub fn current_page(&self) -> u32 {
        self.read(|inner| inner.current_page)
    }

    pub fn page_size(&self) -> u32 {
        self.read(|inner| inner.page_size)
    }

    pub fn total_count(&self) -> u64 {
        self.read(|inner| inner.total_count)
    }

    pub fn filters(&self) -> FilterSet {
        self.read(|inner| inner.filters.clone())
    }

    /// Returns `true` while the latest fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.read(|inner| inner.loading)
    }

    /// Swaps the actor's role check.
    ///
    /// The layout is re-validated immediately: columns the new actor may not
    /// see leave the visible set (falling back to a single default column if
    /// necessary) and a sort on such a column is dropped, which re-fetches.
    pub async fn set_role_check<R: RoleCheck + 'static>(&self, role: R) {
        let (changed, sort_changed) = self.update(|inner, services| {
            inner.role = Arc::new(role);
            let sort_before = inner.layout.sort().cloned();
            let changed = inner.layout.sanitize(&services.catalog, &*inner.role);
            inner.rerender(services);
            (changed, inner.layout.sort() != sort_before.as_ref())
        });

        if changed {
            log::debug!("layout re-sanitized after role change");
            self.flush(&LayoutSection::ALL).await;
        }
        if sort_changed {
            self.update(|inner, _| inner.current_page = 1);
            self.refresh().await;
        }
    }

    /// Tears the engine down: ends any drag or resize, releases the pointer
    /// capture, and discards in-flight fetches.
    ///
    /// An unfinished resize is rolled back to the width the column had when
    /// the drag began.
    pub fn teardown(&self) {
        self.update(|inner, services| {
            inner.reorder.cancel();
            if let Some(session) = inner.resize.end() {
                log::debug!("resize of {} abandoned at teardown", session.key);
                let origin = inner.resize_origin.take();
                inner.layout.restore_width(&session.key, origin);
                let width = inner.layout.width_of(&session.key, &services.catalog);
                inner.rendered.apply_column_width(&session.key, width);
            }
            if let Some(capture) = inner.capture.take() {
                log::debug!("released {:?} pointer capture", capture);
            }
            inner.latest_request += 1;
            inner.loading = false;
        });
    }
}

/// Builder for [`TableEngine`].
pub struct TableEngineBuilder {
    catalog: Arc<ColumnCatalog>,
    source: Arc<dyn DataSource>,
    config: EngineConfig,
    store: Option<Arc<dyn PersistenceAdapter>>,
    role: Option<Arc<dyn RoleCheck>>,
    notifier: Option<Arc<dyn Notifier>>,
    formatters: Formatters,
}

impl TableEngineBuilder {
    fn new(catalog: Arc<ColumnCatalog>, source: Arc<dyn DataSource>) -> Self {
        Self {
            catalog,
            source,
            config: EngineConfig::default(),
            store: None,
            role: None,
            notifier: None,
            formatters: Formatters::default(),
        }
    }

    /// Sets the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the persistence adapter.
    ///
    /// Defaults to an in-memory store, so the layout lasts for the session only.
    pub fn store(mut self, store: Arc<dyn PersistenceAdapter>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the role check. Defaults to [`AllowAll`].
    pub fn role_check<R: RoleCheck + 'static>(mut self, role: R) -> Self {
        self.role = Some(Arc::new(role));
        self
    }

    /// Sets the notifier for fetch failures. Defaults to [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the cell formatters.
    pub fn formatters(mut self, formatters: Formatters) -> Self {
        self.formatters = formatters;
        self
    }

    /// Restores the stored layout and builds the engine.
    ///
    /// No page is fetched yet; call [`TableEngine::refresh`].
    pub async fn open(self) -> TableEngine {
        let store: Arc<dyn PersistenceAdapter> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let role: Arc<dyn RoleCheck> = match self.role {
            Some(role) => role,
            None => Arc::new(AllowAll),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(LogNotifier),
        };
        let keys = StorageKeys::new(&self.config.storage_namespace);

        let layout = restore(&self.catalog, &*role, &*store, &keys).await;
        log::debug!(
            "opened table {} with {} visible column(s)",
            self.config.storage_namespace,
            layout.visible_columns().len()
        );

        let page_size = self.config.page_size.max(1);
        let pagination = compute_window(1, 1, self.config.page_window_radius);
        let applied_sort = layout.sort().cloned();
        let services = Services {
            renderer: TableRenderer::new(self.catalog.clone(), self.formatters),
            config: self.config,
            catalog: self.catalog,
            source: self.source,
            store,
            notifier,
            keys,
        };

        let mut inner = EngineInner {
            layout,
            role,
            reorder: ReorderController::new(),
            resize: ResizeController::new(),
            capture: None,
            resize_origin: None,
            rows: Vec::new(),
            rendered: RenderedTable::default(),
            pagination,
            applied_sort,
            current_page: 1,
            page_size,
            filters: FilterSet::default(),
            total_count: 0,
            latest_request: 0,
            loading: false,
        };
        inner.rerender(&services);

        TableEngine {
            inner: Arc::new(RwLock::new(inner)),
            services: Arc::new(services),
        }
    }
}
