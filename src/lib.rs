//! Performance Center Core - Fund Performance Tables
//!
//! Data engine behind the Performance Center widget, compiled to WebAssembly
//! for the browser and usable natively for tooling and tests:
//! - Filtering the fund catalog by asset category, Morningstar category,
//!   minimum rating and portfolio manager
//! - Flattening funds into table rows for the standardized and
//!   non-standardized return series, with an independent three-state column
//!   sort per table
//! - CSV export of the filtered funds
//!
//! The presentation layer renders what this crate computes; it never
//! touches the catalog directly.
//!
//! ## Usage in JavaScript
//!
//! ```javascript
//! import init, { PerformanceCenterHandle } from 'performance-center-core';
//!
//! await init();
//!
//! const center = new PerformanceCenterHandle();
//! center.set_min_rating("4");
//! center.click_sort(true, "ytd");
//! const table = JSON.parse(center.table_json(true));
//!
//! const blob = center.export_blob();
//! ```
//!
//! ## Usage in Rust
//!
//! ```rust
//! use performance_center_core::{ColumnKey, PerformanceCenter, ReturnVariant};
//!
//! let mut center = PerformanceCenter::with_sample().unwrap();
//! center.set_asset_category("Fixed Income");
//! center.click_sort(ReturnVariant::NonStandardized, ColumnKey::SinceInception);
//!
//! let table = center.table(ReturnVariant::NonStandardized);
//! assert_eq!(table.groups.len(), 1);
//! ```
//!
//! ## Build
//!
//! ```bash
//! wasm-pack build --target web --out-dir pkg
//! ```

// Fund/category data model and bundled catalog
pub mod catalog;

// Presentation configuration
pub mod config;

// Error types
pub mod error;

// CSV export
pub mod export;

// Filter engine
pub mod filter;

// Sort/flatten engine
pub mod sort;

// Session state and table views
pub mod view;

// Browser bindings
pub mod wasm;

pub use catalog::{Catalog, Category, Footnote, Fund, ReturnSet, ReturnVariant};
pub use config::CenterConfig;
pub use error::{PerformanceError, Result};
pub use export::{format_percent, to_csv, ExportFile};
pub use filter::{filter, FilterCriteria, FilterOptions, FilteredCatalog, RatingFilter};
pub use sort::{
    flatten, grouped_rows, sorted_rows, ColumnKey, FlattenedRow, RowGroup, SortDirection,
    SortState, SortStates,
};
pub use view::{rating_label, PerformanceCenter, TableView};
