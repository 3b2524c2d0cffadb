//! Session state and the rendering boundary
//!
//! [`PerformanceCenter`] holds the immutable catalog together with the
//! session-local UI state: filter criteria, one sort record per table,
//! category expansion flags keyed by category id, and table visibility.
//! Everything the presentation layer renders is derived from these on
//! demand.

use crate::catalog::{Catalog, Footnote, ReturnVariant};
use crate::config::CenterConfig;
use crate::error::Result;
use crate::export::ExportFile;
use crate::filter::{FilterCriteria, FilterOptions, FilteredCatalog};
use crate::sort::{grouped_rows, ColumnKey, RowGroup, SortState, SortStates};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accessible label for a star rating
pub fn rating_label(rating: u8) -> String {
    format!("{} out of 5 stars", rating)
}

/// One sortable column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub key: ColumnKey,
    pub label: &'static str,
    pub active: bool,
    pub aria_sort: &'static str,
}

/// Everything needed to render one performance table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub variant: ReturnVariant,
    pub title: String,
    pub sort: SortState,
    pub headers: Vec<HeaderView>,
    pub groups: Vec<RowGroup>,
}

impl TableView {
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

/// Columns that get their own header cell; net expense shares the
/// expense-ratio header.
const HEADER_COLUMNS: [ColumnKey; 10] = [
    ColumnKey::Name,
    ColumnKey::Category,
    ColumnKey::Rating,
    ColumnKey::ExpenseGross,
    ColumnKey::Ytd,
    ColumnKey::Year1,
    ColumnKey::Year3,
    ColumnKey::Year5,
    ColumnKey::Year10,
    ColumnKey::SinceInception,
];

/// A Performance Center session
#[derive(Debug, Clone)]
pub struct PerformanceCenter {
    catalog: Catalog,
    config: CenterConfig,
    criteria: FilterCriteria,
    filtered: FilteredCatalog,
    sort_states: SortStates,
    expanded: BTreeMap<u32, bool>,
    visible_tables: BTreeMap<ReturnVariant, bool>,
}

impl PerformanceCenter {
    pub fn new(catalog: Catalog, config: CenterConfig) -> Self {
        let expanded = catalog
            .categories
            .iter()
            .map(|c| (c.id, config.default_expanded.unwrap_or(c.expanded)))
            .collect();
        let visible_tables = BTreeMap::from([
            (ReturnVariant::Standardized, config.show_standardized),
            (ReturnVariant::NonStandardized, config.show_non_standardized),
        ]);
        let criteria = FilterCriteria::default();
        let filtered = FilteredCatalog::apply(&catalog, &criteria);

        Self {
            catalog,
            config,
            criteria,
            filtered,
            sort_states: SortStates::default(),
            expanded,
            visible_tables,
        }
    }

    /// Session over the bundled catalog with default configuration
    pub fn with_sample() -> Result<Self> {
        Ok(Self::new(Catalog::sample()?, CenterConfig::default()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.refilter();
        }
    }

    pub fn set_asset_category(&mut self, value: &str) {
        let mut criteria = self.criteria.clone();
        criteria.set_asset_category(value);
        self.set_criteria(criteria);
    }

    pub fn set_morningstar_category(&mut self, value: &str) {
        let mut criteria = self.criteria.clone();
        criteria.set_morningstar_category(value);
        self.set_criteria(criteria);
    }

    pub fn set_min_rating(&mut self, value: &str) {
        let mut criteria = self.criteria.clone();
        criteria.set_min_rating(value);
        self.set_criteria(criteria);
    }

    pub fn set_manager(&mut self, value: &str) {
        let mut criteria = self.criteria.clone();
        criteria.set_manager(value);
        self.set_criteria(criteria);
    }

    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    pub fn filtered(&self) -> &FilteredCatalog {
        &self.filtered
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_catalog(&self.catalog)
    }

    /// True when the filters leave no funds at all
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    fn refilter(&mut self) {
        debug!("Filter criteria changed: {:?}", self.criteria);
        self.filtered = FilteredCatalog::apply(&self.catalog, &self.criteria);
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Flip a category's expansion flag, returning the new state.
    ///
    /// Unknown ids are ignored.
    pub fn toggle_category(&mut self, category_id: u32) -> Option<bool> {
        let flag = self.expanded.get_mut(&category_id)?;
        *flag = !*flag;
        Some(*flag)
    }

    pub fn is_expanded(&self, category_id: u32) -> bool {
        self.expanded.get(&category_id).copied().unwrap_or(false)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Apply a header click to one table
    pub fn click_sort(&mut self, variant: ReturnVariant, column: ColumnKey) -> SortState {
        self.sort_states.toggle(variant, column)
    }

    pub fn sort_state(&self, variant: ReturnVariant) -> SortState {
        self.sort_states.get(variant)
    }

    pub fn set_table_visible(&mut self, variant: ReturnVariant, visible: bool) {
        self.visible_tables.insert(variant, visible);
    }

    pub fn is_table_visible(&self, variant: ReturnVariant) -> bool {
        self.visible_tables.get(&variant).copied().unwrap_or(true)
    }

    /// Visible tables in display order
    pub fn visible_tables(&self) -> Vec<ReturnVariant> {
        ReturnVariant::ALL
            .into_iter()
            .filter(|v| self.is_table_visible(*v))
            .collect()
    }

    /// Grouped, sorted rows plus header state for one table
    pub fn table(&self, variant: ReturnVariant) -> TableView {
        let sort = self.sort_states.get(variant);
        let groups = grouped_rows(&self.filtered.categories, sort, variant, |id| {
            self.is_expanded(id)
        });
        let headers = HEADER_COLUMNS
            .into_iter()
            .map(|key| HeaderView {
                key,
                label: key.label(),
                active: sort.active().map_or(false, |(column, _)| column == key),
                aria_sort: sort.aria_sort(key),
            })
            .collect();

        TableView {
            variant,
            title: self.config.table_title(variant).to_string(),
            sort,
            headers,
            groups,
        }
    }

    // =========================================================================
    // Footnotes and export
    // =========================================================================

    /// Footnotes referenced by a visible fund, ascending.
    ///
    /// Dangling references are skipped.
    pub fn visible_footnotes(&self) -> Vec<&Footnote> {
        self.filtered
            .active_footnotes
            .iter()
            .filter_map(|id| {
                let note = self.catalog.footnote(*id);
                if note.is_none() {
                    warn!("Footnote {} is referenced but not defined", id);
                }
                note
            })
            .collect()
    }

    /// Footnote texts for one fund, for screen-reader annotations
    pub fn fund_footnotes(&self, footnote_refs: &[u32]) -> Vec<&Footnote> {
        footnote_refs
            .iter()
            .filter_map(|id| self.catalog.footnote(*id))
            .collect()
    }

    /// CSV export of the current filter state
    pub fn export(&self) -> Result<ExportFile> {
        ExportFile::build(&self.filtered.categories, &self.config)
    }
}
