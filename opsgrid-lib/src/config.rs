//! Engine configuration

use crate::pagination::DEFAULT_WINDOW_RADIUS;
use crate::resize::DEFAULT_GRAB_ZONE;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Tunables for a [`TableEngine`](crate::TableEngine).
///
/// # Example
///
/// ```
/// use opsgrid_lib::EngineConfig;
///
/// let config = EngineConfig::new("orders")
///     .with_page_size(50)
///     .with_window_radius(3);
///
/// assert_eq!(config.storage_namespace, "orders");
/// assert_eq!(config.grab_zone_px, 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Rows requested per page.
    ///
    /// Default: 25
    pub page_size: u32,

    /// Pages shown on each side of the current page in pagination links.
    ///
    /// Default: 2
    pub page_window_radius: u32,

    /// Width of the resize grab zone at the right edge of each header.
    ///
    /// Default: 6.0
    pub grab_zone_px: f32,

    /// Prefix for the layout storage keys of this table.
    ///
    /// Default: `"table"`
    pub storage_namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_window_radius: DEFAULT_WINDOW_RADIUS,
            grab_zone_px: DEFAULT_GRAB_ZONE,
            storage_namespace: "table".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with default values for the given storage namespace.
    pub fn new(storage_namespace: impl Into<String>) -> Self {
        Self {
            storage_namespace: storage_namespace.into(),
            ..Self::default()
        }
    }

    /// Sets the page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the pagination window radius.
    pub fn with_window_radius(mut self, radius: u32) -> Self {
        self.page_window_radius = radius;
        self
    }
}
