//! JavaScript-facing facade
//!
//! Wraps a [`PerformanceCenter`] session for the browser. Structured views
//! cross the boundary as JSON strings; exports come back as an
//! [`ExportResult`] that carries its own error instead of throwing.

use crate::catalog::{Catalog, ReturnVariant};
use crate::config::CenterConfig;
use crate::export::ExportFile;
use crate::sort::ColumnKey;
use crate::view::PerformanceCenter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            web_sys::console::error_1(&JsValue::from_str(&format!("JSON encoding failed: {}", e)));
            "null".to_string()
        }
    }
}

fn to_js_error(err: crate::error::PerformanceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// Export Result
// ============================================================================

/// Result of a CSV export
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ExportResult {
    content: String,
    filename: String,
    mime_type: String,
    row_count: u32,
    error: Option<String>,
}

#[wasm_bindgen]
impl ExportResult {
    /// CSV text, empty on error
    #[wasm_bindgen(getter)]
    pub fn content(&self) -> String {
        self.content.clone()
    }

    /// Download file name
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// MIME type for the download blob
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// Number of fund rows, excluding the header
    #[wasm_bindgen(getter)]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Error message if the export failed
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    fn new_success(export: ExportFile) -> Self {
        Self {
            content: export.content,
            filename: export.filename,
            mime_type: export.mime_type,
            row_count: export.row_count as u32,
            error: None,
        }
    }

    fn new_error(config: &CenterConfig, error_msg: String) -> Self {
        Self {
            content: String::new(),
            filename: config.export_filename.clone(),
            mime_type: config.export_mime_type.clone(),
            row_count: 0,
            error: Some(error_msg),
        }
    }
}

// ============================================================================
// Session Handle
// ============================================================================

/// Performance Center session for the browser
///
/// # Example (JavaScript)
/// ```javascript
/// const center = new PerformanceCenterHandle();
/// center.set_asset_category("Fixed Income");
/// center.click_sort(false, "sinceInception");
/// const table = JSON.parse(center.table_json(false));
/// const csv = center.export_csv();
/// ```
#[wasm_bindgen]
pub struct PerformanceCenterHandle {
    center: PerformanceCenter,
}

#[wasm_bindgen]
impl PerformanceCenterHandle {
    /// Create a session over the bundled catalog
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PerformanceCenterHandle, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let center = PerformanceCenter::with_sample().map_err(to_js_error)?;
        Ok(Self { center })
    }

    /// Create a session from catalog JSON and optional config JSON
    pub fn from_json(
        catalog_json: &str,
        config_json: Option<String>,
    ) -> Result<PerformanceCenterHandle, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let catalog = Catalog::from_json(catalog_json).map_err(to_js_error)?;
        let config = match config_json {
            Some(json) => CenterConfig::from_json(&json).map_err(to_js_error)?,
            None => CenterConfig::default(),
        };
        Ok(Self {
            center: PerformanceCenter::new(catalog, config),
        })
    }

    pub fn set_asset_category(&mut self, value: &str) {
        self.center.set_asset_category(value);
    }

    pub fn set_morningstar_category(&mut self, value: &str) {
        self.center.set_morningstar_category(value);
    }

    pub fn set_min_rating(&mut self, value: &str) {
        self.center.set_min_rating(value);
    }

    pub fn set_manager(&mut self, value: &str) {
        self.center.set_manager(value);
    }

    pub fn reset_filters(&mut self) {
        self.center.reset_filters();
    }

    #[wasm_bindgen(getter)]
    pub fn has_active_filters(&self) -> bool {
        self.center.has_active_filters()
    }

    /// Whether the "no funds match" message should show
    #[wasm_bindgen(getter)]
    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// Flip a category's expansion; returns the new state (false for unknown ids)
    pub fn toggle_category(&mut self, category_id: u32) -> bool {
        self.center.toggle_category(category_id).unwrap_or(false)
    }

    pub fn is_expanded(&self, category_id: u32) -> bool {
        self.center.is_expanded(category_id)
    }

    /// Header click on one table; returns false for an unknown column key
    pub fn click_sort(&mut self, standardized: bool, column: &str) -> bool {
        match ColumnKey::parse(column) {
            Ok(column) => {
                self.center
                    .click_sort(ReturnVariant::from_flag(standardized), column);
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring sort click: {}", e);
                false
            }
        }
    }

    pub fn set_table_visible(&mut self, standardized: bool, visible: bool) {
        self.center
            .set_table_visible(ReturnVariant::from_flag(standardized), visible);
    }

    pub fn is_table_visible(&self, standardized: bool) -> bool {
        self.center
            .is_table_visible(ReturnVariant::from_flag(standardized))
    }

    /// Grouped rows, sort state and headers for one table, as JSON
    pub fn table_json(&self, standardized: bool) -> String {
        to_json(&self.center.table(ReturnVariant::from_flag(standardized)))
    }

    /// Footnotes referenced by visible funds, as JSON
    pub fn footnotes_json(&self) -> String {
        to_json(&self.center.visible_footnotes())
    }

    /// Option lists for the filter panel, as JSON
    pub fn filter_options_json(&self) -> String {
        to_json(&self.center.filter_options())
    }

    /// Presentation configuration, as JSON
    pub fn config_json(&self) -> String {
        to_json(self.center.config())
    }

    #[wasm_bindgen(getter)]
    pub fn disclaimer(&self) -> String {
        self.center.catalog().disclaimer.clone()
    }

    /// CSV export of the current filter state
    pub fn export_csv(&self) -> ExportResult {
        match self.center.export() {
            Ok(export) => ExportResult::new_success(export),
            Err(e) => ExportResult::new_error(self.center.config(), e.to_string()),
        }
    }

    /// CSV export wrapped in a `Blob` ready for an object URL
    pub fn export_blob(&self) -> Result<web_sys::Blob, JsValue> {
        let export = self.center.export().map_err(to_js_error)?;

        let parts = js_sys::Array::of1(&JsValue::from_str(&export.content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(&export.mime_type);
        web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
    }
}

/// Get the WASM module version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// WASM-specific Tests
// ============================================================================

#[cfg(test)]
mod wasm_tests {
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    use super::*;

    #[wasm_bindgen_test]
    fn test_wasm_export_blob() {
        let handle = PerformanceCenterHandle::new().unwrap();
        let blob = handle.export_blob().unwrap();

        assert_eq!(blob.type_(), "text/csv;charset=utf-8");
        assert!(blob.size() > 0.0);
    }

    #[wasm_bindgen_test]
    fn test_wasm_table_json() {
        let mut handle = PerformanceCenterHandle::new().unwrap();
        handle.set_asset_category("Alternative");

        let table: serde_json::Value = serde_json::from_str(&handle.table_json(true)).unwrap();
        assert_eq!(table["groups"].as_array().unwrap().len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_wasm_bad_catalog_is_error() {
        assert!(PerformanceCenterHandle::from_json("{", None).is_err());
    }
}
