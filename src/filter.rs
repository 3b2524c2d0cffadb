//! Filter engine
//!
//! Narrows the two-level catalog (category → funds) by four independent
//! criteria. Each criterion has a sentinel meaning "no filtering", and all
//! active criteria combine with AND. Categories left without funds are
//! dropped, so nothing downstream ever sees an empty group.

use crate::catalog::{Catalog, Category, Fund};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Sentinel for the asset category, Morningstar category and manager selects
pub const ALL: &str = "All";

/// Sentinel for the rating radio group
pub const ALL_RATINGS: &str = "all";

/// Minimum Morningstar rating filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RatingFilter {
    #[default]
    Any,
    AtLeast(i64),
}

impl RatingFilter {
    /// Parse the UI value ("all", "5", "4", "4+", ...).
    ///
    /// The minimum is the leading integer of the value, so `"4.5"` means 4
    /// and `"300"` matches nothing. A value with no leading integer fails
    /// open to [`RatingFilter::Any`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(ALL_RATINGS) {
            return Self::Any;
        }

        match leading_integer(&value.replacen('+', "", 1)) {
            Some(min) => Self::AtLeast(min),
            None => {
                warn!("Unparseable rating filter {:?}, showing all ratings", value);
                Self::Any
            }
        }
    }

    /// UI value for this filter
    pub fn as_value(&self) -> String {
        match self {
            Self::Any => ALL_RATINGS.to_string(),
            Self::AtLeast(min) => min.to_string(),
        }
    }

    pub fn accepts(&self, rating: u8) -> bool {
        match self {
            Self::Any => true,
            Self::AtLeast(min) => i64::from(rating) >= *min,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

// Optionally signed run of digits at the start, saturating on overflow
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let mut seen = false;
    let mut magnitude: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen.then_some(if negative { -magnitude } else { magnitude })
}

/// The four filter selections. `None` is the "All" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub asset_category: Option<String>,
    pub morningstar_category: Option<String>,
    pub min_rating: RatingFilter,
    pub manager: Option<String>,
}

/// Map a select value to an optional criterion
fn selection(value: &str) -> Option<String> {
    if value == ALL {
        None
    } else {
        Some(value.to_string())
    }
}

impl FilterCriteria {
    /// Build criteria from raw UI values, sentinels included
    pub fn from_values(
        asset_category: &str,
        morningstar_category: &str,
        min_rating: &str,
        manager: &str,
    ) -> Self {
        Self {
            asset_category: selection(asset_category),
            morningstar_category: selection(morningstar_category),
            min_rating: RatingFilter::parse(min_rating),
            manager: selection(manager),
        }
    }

    pub fn set_asset_category(&mut self, value: &str) {
        self.asset_category = selection(value);
    }

    pub fn set_morningstar_category(&mut self, value: &str) {
        self.morningstar_category = selection(value);
    }

    pub fn set_min_rating(&mut self, value: &str) {
        self.min_rating = RatingFilter::parse(value);
    }

    pub fn set_manager(&mut self, value: &str) {
        self.manager = selection(value);
    }

    /// Whether any criterion differs from its sentinel
    pub fn has_active_filters(&self) -> bool {
        self.asset_category.is_some()
            || self.morningstar_category.is_some()
            || !self.min_rating.is_any()
            || self.manager.is_some()
    }

    /// Restore every criterion to its sentinel
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn keeps_category(&self, category: &Category) -> bool {
        self.asset_category
            .as_deref()
            .map_or(true, |name| category.name == name)
    }

    /// Whether a fund satisfies every fund-level criterion
    pub fn keeps_fund(&self, fund: &Fund) -> bool {
        let category_ok = self
            .morningstar_category
            .as_deref()
            .map_or(true, |c| fund.morningstar.category == c);
        let manager_ok = self
            .manager
            .as_deref()
            .map_or(true, |m| fund.is_managed_by(m));

        category_ok && self.min_rating.accepts(fund.morningstar.rating) && manager_ok
    }
}

/// Apply the criteria to a category list.
///
/// Category order and fund order within each category are preserved.
pub fn filter(categories: &[Category], criteria: &FilterCriteria) -> Vec<Category> {
    categories
        .iter()
        .filter(|category| criteria.keeps_category(category))
        .filter_map(|category| {
            let funds: Vec<Fund> = category
                .funds
                .iter()
                .filter(|fund| criteria.keeps_fund(fund))
                .cloned()
                .collect();

            if funds.is_empty() {
                None
            } else {
                Some(Category {
                    funds,
                    ..category.clone()
                })
            }
        })
        .collect()
}

/// Footnote ids referenced by any fund in `categories`, ascending and
/// deduplicated. Dangling ids are kept here and skipped on resolution.
pub fn active_footnotes(categories: &[Category]) -> Vec<u32> {
    categories
        .iter()
        .flat_map(|category| category.funds.iter())
        .flat_map(|fund| fund.footnote_refs.iter().copied())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

/// Result of one filter pass
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCatalog {
    pub categories: Vec<Category>,
    pub active_footnotes: Vec<u32>,
}

impl FilteredCatalog {
    /// Run the filter over a catalog and collect the footnotes it leaves visible
    pub fn apply(catalog: &Catalog, criteria: &FilterCriteria) -> Self {
        let categories = filter(&catalog.categories, criteria);
        let active_footnotes = active_footnotes(&categories);

        debug!(
            "Filter kept {} categories, {} funds, {} footnotes",
            categories.len(),
            categories.iter().map(|c| c.funds.len()).sum::<usize>(),
            active_footnotes.len()
        );

        Self {
            categories,
            active_footnotes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn fund_count(&self) -> usize {
        self.categories.iter().map(|c| c.funds.len()).sum()
    }
}

/// One entry in the rating radio group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingOption {
    pub value: String,
    pub label: String,
}

/// Choices offered by the filter panel, each list led by its sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub asset_categories: Vec<String>,
    pub morningstar_categories: Vec<String>,
    pub ratings: Vec<RatingOption>,
    pub managers: Vec<String>,
}

impl FilterOptions {
    /// Derive the option lists from the catalog in first-seen order
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut asset_categories = vec![ALL.to_string()];
        let mut morningstar_categories = vec![ALL.to_string()];
        let mut managers = vec![ALL.to_string()];

        for category in &catalog.categories {
            push_unique(&mut asset_categories, &category.name);
            for fund in &category.funds {
                push_unique(&mut morningstar_categories, &fund.morningstar.category);
                for manager in &fund.portfolio_managers {
                    push_unique(&mut managers, manager);
                }
            }
        }

        let ratings = [
            (ALL_RATINGS, "All Ratings"),
            ("5", "5 Stars"),
            ("4", "4+ Stars"),
            ("3", "3+ Stars"),
        ]
        .into_iter()
        .map(|(value, label)| RatingOption {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect();

        Self {
            asset_categories,
            morningstar_categories,
            ratings,
            managers,
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
