//! Configurable data table engine
//!
//! Owns the presentation state of paged list views: which columns are
//! visible, their order and widths, the active sort, and how that layout
//! survives reloads for each actor. Rendering targets consume the
//! [`render::RenderedTable`] the engine produces.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod layout;
pub mod model;
pub mod notify;
pub mod pagination;
pub mod persist;
pub mod render;
pub mod reorder;
pub mod resize;
pub mod sort;
pub mod source;

pub use catalog::{ColumnCatalog, ColumnDescriptor, RoleCheck};
pub use config::EngineConfig;
pub use engine::{FetchOutcome, FetchTicket, PointerCapture, TableEngine, TableEngineBuilder};
pub use layout::LayoutState;
pub use sort::{SortDirection, SortSpec};
