//! Fund catalog data model
//!
//! The catalog is static configuration: a fixed, ordered list of asset
//! categories, each holding its funds, plus the footnote texts and the legal
//! disclaimer shown under the tables. It is loaded once and never mutated;
//! every view the widget shows is re-derived from it.

use crate::error::{PerformanceError, Result};
use serde::{Deserialize, Serialize};

/// Catalog compiled into the crate
const SAMPLE_CATALOG_JSON: &str = include_str!("sample_catalog.json");

/// Which of the two parallel return series a table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnVariant {
    /// Includes the effect of surrender charges
    Standardized,
    /// Excludes the effect of surrender charges
    NonStandardized,
}

impl ReturnVariant {
    /// Both variants in table display order
    pub const ALL: [ReturnVariant; 2] = [Self::Standardized, Self::NonStandardized];

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "standardized" => Ok(Self::Standardized),
            "nonStandardized" | "non-standardized" => Ok(Self::NonStandardized),
            other => Err(PerformanceError::UnknownVariant(other.to_string())),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standardized => "standardized",
            Self::NonStandardized => "nonStandardized",
        }
    }

    pub fn from_flag(standardized: bool) -> Self {
        if standardized {
            Self::Standardized
        } else {
            Self::NonStandardized
        }
    }
}

impl std::fmt::Display for ReturnVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Annualised returns for one variant, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSet {
    pub ytd: f64,
    pub year1: f64,
    pub year3: f64,
    pub year5: f64,
    pub year10: f64,
    pub since_inception: f64,
}

impl ReturnSet {
    /// Values in table column order (YTD first, since inception last)
    pub fn values(&self) -> [f64; 6] {
        [
            self.ytd,
            self.year1,
            self.year3,
            self.year5,
            self.year10,
            self.since_inception,
        ]
    }
}

/// Morningstar classification and star rating (1..=5)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morningstar {
    pub category: String,
    pub rating: u8,
}

/// Expense ratios in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRatio {
    pub gross: f64,
    pub net: f64,
}

/// Surrender charge schedule in percent, by contract year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurrenderCharges {
    pub year1: f64,
    pub year3: f64,
    pub year5: f64,
    pub year7: f64,
    pub year9: f64,
}

/// A single investable sub-account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: u32,
    pub name: String,
    /// Opaque fund identifier shown as "Fund Number"
    pub number: String,
    /// Ids into the catalog's footnote list; may dangle
    #[serde(rename = "footnotes", default)]
    pub footnote_refs: Vec<u32>,
    pub portfolio_managers: Vec<String>,
    #[serde(rename = "morningStar")]
    pub morningstar: Morningstar,
    pub expense: ExpenseRatio,
    #[serde(default)]
    pub surrender_charges: SurrenderCharges,
    pub standardized_returns: ReturnSet,
    pub non_standardized_returns: ReturnSet,
}

impl Fund {
    /// Return series for the given table variant
    pub fn returns(&self, variant: ReturnVariant) -> &ReturnSet {
        match variant {
            ReturnVariant::Standardized => &self.standardized_returns,
            ReturnVariant::NonStandardized => &self.non_standardized_returns,
        }
    }

    pub fn is_managed_by(&self, manager: &str) -> bool {
        self.portfolio_managers.iter().any(|m| m == manager)
    }
}

/// Top-level asset class grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    /// Initial expansion state; the session tracks changes separately
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    pub funds: Vec<Fund>,
}

fn default_expanded() -> bool {
    true
}

/// Numbered disclosure text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub id: u32,
    pub text: String,
}

/// The full static dataset behind the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
    #[serde(default)]
    pub disclaimer: String,
}

impl Catalog {
    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| PerformanceError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the widget
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG_JSON)
    }

    /// Look up a footnote; `None` for dangling references
    pub fn footnote(&self, id: u32) -> Option<&Footnote> {
        self.footnotes.iter().find(|f| f.id == id)
    }

    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Total number of funds across all categories
    pub fn fund_count(&self) -> usize {
        self.categories.iter().map(|c| c.funds.len()).sum()
    }

    /// Category ids must be unique, since expansion state and row grouping
    /// are keyed by them.
    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for category in &self.categories {
            if !seen.insert(category.id) {
                return Err(PerformanceError::Catalog(format!(
                    "duplicate category id {}",
                    category.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = Catalog::sample().unwrap();

        let names: Vec<&str> = catalog.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Equity", "Fixed Income", "Alternative"]);
        assert_eq!(catalog.fund_count(), 6);
        assert_eq!(catalog.footnotes.len(), 5);
        assert!(catalog.disclaimer.starts_with("The information contained herein"));
    }

    #[test]
    fn test_fund_fields_parse() {
        let catalog = Catalog::sample().unwrap();
        let growth = &catalog.categories[0].funds[0];

        assert_eq!(growth.name, "Growth Fund");
        assert_eq!(growth.number, "ABCDE");
        assert_eq!(growth.footnote_refs, vec![1, 4]);
        assert_eq!(growth.morningstar.category, "Large Growth");
        assert_eq!(growth.morningstar.rating, 4);
        assert_eq!(growth.expense.gross, 0.85);
        assert_eq!(growth.surrender_charges.year7, 2.0);
        assert_eq!(growth.standardized_returns.since_inception, 10.33);
        assert_eq!(growth.non_standardized_returns.since_inception, 11.23);
    }

    #[test]
    fn test_returns_by_variant() {
        let catalog = Catalog::sample().unwrap();
        let value = &catalog.categories[0].funds[1];

        assert_eq!(value.returns(ReturnVariant::Standardized).ytd, 7.85);
        assert_eq!(value.returns(ReturnVariant::NonStandardized).ytd, 8.75);
    }

    #[test]
    fn test_dangling_footnote_is_none() {
        let catalog = Catalog::sample().unwrap();
        assert!(catalog.footnote(3).is_some());
        assert!(catalog.footnote(42).is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "categories": [{
                "id": 9,
                "name": "Solo",
                "funds": [{
                    "id": 1,
                    "name": "Plain Fund",
                    "number": "PLAIN",
                    "portfolioManagers": [],
                    "morningStar": { "category": "Misc", "rating": 2 },
                    "expense": { "gross": 1.0, "net": 1.0 },
                    "standardizedReturns": { "ytd": -1.5, "year1": 0, "year3": 0, "year5": 0, "year10": 0, "sinceInception": 0 },
                    "nonStandardizedReturns": { "ytd": -1.0, "year1": 0, "year3": 0, "year5": 0, "year10": 0, "sinceInception": 0 }
                }]
            }]
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        let category = &catalog.categories[0];
        assert!(category.expanded);
        assert!(category.funds[0].footnote_refs.is_empty());
        assert!(catalog.footnotes.is_empty());
        assert_eq!(category.funds[0].standardized_returns.ytd, -1.5);
    }

    #[test]
    fn test_duplicate_category_id_rejected() {
        let json = r#"{
            "categories": [
                { "id": 1, "name": "A", "funds": [] },
                { "id": 1, "name": "B", "funds": [] }
            ]
        }"#;

        let err = Catalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate category id 1"));
    }

    #[test]
    fn test_malformed_catalog_is_error() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(PerformanceError::Catalog(_))
        ));
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!(ReturnVariant::parse("standardized").unwrap(), ReturnVariant::Standardized);
        assert_eq!(
            ReturnVariant::parse("nonStandardized").unwrap(),
            ReturnVariant::NonStandardized
        );
        assert!(ReturnVariant::parse("gross").is_err());
    }
}
