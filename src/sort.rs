//! Sort/flatten engine
//!
//! Each table shows the filtered funds flattened into rows that carry one
//! resolved return series. A table can be ordered by any column under a
//! three-state toggle (ascending → descending → unsorted). Sorting is global
//! across all rows and stable; the sorted rows are then bucketed back under
//! their category headers, whose order never changes.

use crate::catalog::{Category, ReturnSet, ReturnVariant};
use crate::error::{PerformanceError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    Name,
    /// Morningstar category
    Category,
    Rating,
    ExpenseGross,
    ExpenseNet,
    Ytd,
    Year1,
    Year3,
    Year5,
    Year10,
    SinceInception,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 11] = [
        Self::Name,
        Self::Category,
        Self::Rating,
        Self::ExpenseGross,
        Self::ExpenseNet,
        Self::Ytd,
        Self::Year1,
        Self::Year3,
        Self::Year5,
        Self::Year10,
        Self::SinceInception,
    ];

    /// Parse from the header key used by the presentation layer
    pub fn parse(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| PerformanceError::UnknownColumn(s.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Rating => "rating",
            Self::ExpenseGross => "expenseGross",
            Self::ExpenseNet => "expenseNet",
            Self::Ytd => "ytd",
            Self::Year1 => "year1",
            Self::Year3 => "year3",
            Self::Year5 => "year5",
            Self::Year10 => "year10",
            Self::SinceInception => "sinceInception",
        }
    }

    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Sub-Account",
            Self::Category => "Morningstar Category",
            Self::Rating => "Morningstar Rating",
            Self::ExpenseGross => "Expense Ratio",
            Self::ExpenseNet => "Net Expense Ratio",
            Self::Ytd => "YTD Return",
            Self::Year1 => "1-Year",
            Self::Year3 => "3-Year",
            Self::Year5 => "5-Year",
            Self::Year10 => "10-Year",
            Self::SinceInception => "Since Inception",
        }
    }

    /// Compare two rows on this column, ascending.
    ///
    /// Text compares case-insensitively; numbers by [`f64::total_cmp`], with
    /// `-0.0` folded into `0.0` and NaN after every number. Equal keys are
    /// `Equal` so a stable sort keeps input order.
    pub fn compare(&self, a: &FlattenedRow, b: &FlattenedRow) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Category => a
                .morningstar_category
                .to_lowercase()
                .cmp(&b.morningstar_category.to_lowercase()),
            _ => match (self.numeric(a), self.numeric(b)) {
                (Some(x), Some(y)) => sort_key(x).total_cmp(&sort_key(y)),
                _ => Ordering::Equal,
            },
        }
    }

    /// Numeric cell value; `None` for the text columns
    pub fn numeric(&self, row: &FlattenedRow) -> Option<f64> {
        let value = match self {
            Self::Name | Self::Category => return None,
            Self::Rating => f64::from(row.rating),
            Self::ExpenseGross => row.expense_gross,
            Self::ExpenseNet => row.expense_net,
            Self::Ytd => row.returns.ytd,
            Self::Year1 => row.returns.year1,
            Self::Year3 => row.returns.year3,
            Self::Year5 => row.returns.year5,
            Self::Year10 => row.returns.year10,
            Self::SinceInception => row.returns.since_inception,
        };
        Some(value)
    }
}

// Canonical NaN and unsigned zero, so total_cmp only sees value differences
fn sort_key(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction, including the cleared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
    #[default]
    #[serde(rename = "none")]
    Unsorted,
}

impl SortDirection {
    /// Next state when the active column is clicked again
    pub fn cycle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Unsorted,
            Self::Unsorted => Self::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
            Self::Unsorted => "none",
        }
    }
}

/// Sort configuration of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<ColumnKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: ColumnKey, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Apply a header click.
    ///
    /// A new column starts ascending; the active column cycles
    /// asc → desc → none. Reaching none clears the column.
    pub fn toggle(&mut self, column: ColumnKey) {
        let next = if self.column == Some(column) {
            self.direction.cycle()
        } else {
            SortDirection::Ascending
        };

        self.column = match next {
            SortDirection::Unsorted => None,
            _ => Some(column),
        };
        self.direction = next;
    }

    /// Column and direction, if rows should be reordered at all
    pub fn active(&self) -> Option<(ColumnKey, SortDirection)> {
        match (self.column, self.direction) {
            (Some(_), SortDirection::Unsorted) | (None, _) => None,
            (Some(column), direction) => Some((column, direction)),
        }
    }

    /// `aria-sort` value for a header
    pub fn aria_sort(&self, column: ColumnKey) -> &'static str {
        match self.active() {
            Some((active, SortDirection::Ascending)) if active == column => "ascending",
            Some((active, SortDirection::Descending)) if active == column => "descending",
            _ => "none",
        }
    }
}

/// Independent sort state per table variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortStates {
    states: BTreeMap<ReturnVariant, SortState>,
}

impl Default for SortStates {
    fn default() -> Self {
        Self {
            states: ReturnVariant::ALL
                .into_iter()
                .map(|variant| (variant, SortState::default()))
                .collect(),
        }
    }
}

impl SortStates {
    pub fn get(&self, variant: ReturnVariant) -> SortState {
        self.states.get(&variant).copied().unwrap_or_default()
    }

    /// Apply a header click to one table only
    pub fn toggle(&mut self, variant: ReturnVariant, column: ColumnKey) -> SortState {
        let state = self.states.entry(variant).or_default();
        state.toggle(column);
        debug!(
            "Sort {} table: column={:?} direction={}",
            variant,
            state.column,
            state.direction.as_str()
        );
        *state
    }

    pub fn set(&mut self, variant: ReturnVariant, state: SortState) {
        self.states.insert(variant, state);
    }
}

/// One fund projected for a table, with its return series resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedRow {
    #[serde(rename = "id")]
    pub fund_id: u32,
    pub category_id: u32,
    pub category_name: String,
    pub name: String,
    pub number: String,
    #[serde(rename = "footnotes")]
    pub footnote_refs: Vec<u32>,
    pub portfolio_managers: Vec<String>,
    #[serde(rename = "category")]
    pub morningstar_category: String,
    pub rating: u8,
    pub expense_gross: f64,
    pub expense_net: f64,
    #[serde(flatten)]
    pub returns: ReturnSet,
}

/// Flatten categories into rows in catalog order
pub fn flatten(categories: &[Category], variant: ReturnVariant) -> Vec<FlattenedRow> {
    categories
        .iter()
        .flat_map(|category| {
            category.funds.iter().map(move |fund| FlattenedRow {
                fund_id: fund.id,
                category_id: category.id,
                category_name: category.name.clone(),
                name: fund.name.clone(),
                number: fund.number.clone(),
                footnote_refs: fund.footnote_refs.clone(),
                portfolio_managers: fund.portfolio_managers.clone(),
                morningstar_category: fund.morningstar.category.clone(),
                rating: fund.morningstar.rating,
                expense_gross: fund.expense.gross,
                expense_net: fund.expense.net,
                returns: *fund.returns(variant),
            })
        })
        .collect()
}

/// Stable global sort of rows by one column
pub fn sort_rows(rows: &mut [FlattenedRow], column: ColumnKey, direction: SortDirection) {
    match direction {
        SortDirection::Ascending => rows.sort_by(|a, b| column.compare(a, b)),
        SortDirection::Descending => rows.sort_by(|a, b| column.compare(a, b).reverse()),
        SortDirection::Unsorted => {}
    }
}

/// Rows of one category header in a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowGroup {
    pub category_id: u32,
    pub category_name: String,
    pub expanded: bool,
    pub rows: Vec<FlattenedRow>,
}

impl RowGroup {
    /// Header text, e.g. "Equity (2)"
    pub fn header(&self) -> String {
        format!("{} ({})", self.category_name, self.rows.len())
    }
}

/// Bucket rows under their categories, keeping the categories' order and
/// the rows' relative order.
pub fn group_rows(
    categories: &[Category],
    rows: Vec<FlattenedRow>,
    is_expanded: impl Fn(u32) -> bool,
) -> Vec<RowGroup> {
    let mut buckets: BTreeMap<u32, Vec<FlattenedRow>> = BTreeMap::new();
    for row in rows {
        buckets.entry(row.category_id).or_default().push(row);
    }

    categories
        .iter()
        .map(|category| RowGroup {
            category_id: category.id,
            category_name: category.name.clone(),
            expanded: is_expanded(category.id),
            rows: buckets.remove(&category.id).unwrap_or_default(),
        })
        .collect()
}

/// Grouped rows for one table
pub fn grouped_rows(
    categories: &[Category],
    sort: SortState,
    variant: ReturnVariant,
    is_expanded: impl Fn(u32) -> bool,
) -> Vec<RowGroup> {
    let mut rows = flatten(categories, variant);
    if let Some((column, direction)) = sort.active() {
        sort_rows(&mut rows, column, direction);
    }
    group_rows(categories, rows, is_expanded)
}

/// Rows for one table in display order: sorted, then bucketed by category
pub fn sorted_rows(
    categories: &[Category],
    sort: SortState,
    variant: ReturnVariant,
) -> Vec<FlattenedRow> {
    grouped_rows(categories, sort, variant, |_| true)
        .into_iter()
        .flat_map(|group| group.rows)
        .collect()
}
