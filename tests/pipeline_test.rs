//! End-to-end pipeline tests over the bundled catalog

use performance_center_core::{
    filter, sorted_rows, to_csv, Catalog, ColumnKey, FilterCriteria, FilterOptions,
    PerformanceCenter, ReturnVariant, SortDirection, SortState,
};
use std::collections::BTreeSet;

fn catalog() -> Catalog {
    Catalog::sample().expect("bundled catalog parses")
}

/// Every criteria combination offered by the filter panel
fn all_criteria(catalog: &Catalog) -> Vec<FilterCriteria> {
    let options = FilterOptions::from_catalog(catalog);
    let mut out = Vec::new();
    for asset in &options.asset_categories {
        for category in &options.morningstar_categories {
            for rating in &options.ratings {
                for manager in &options.managers {
                    out.push(FilterCriteria::from_values(asset, category, &rating.value, manager));
                }
            }
        }
    }
    out
}

#[test]
fn test_filter_invariants_hold_for_every_combination() {
    let catalog = catalog();
    for criteria in all_criteria(&catalog) {
        let result = filter(&catalog.categories, &criteria);

        for category in &result {
            assert!(!category.funds.is_empty(), "empty category for {:?}", criteria);
            if let Some(asset) = &criteria.asset_category {
                assert_eq!(&category.name, asset);
            }
            for fund in &category.funds {
                assert!(criteria.keeps_fund(fund));
            }
        }

        assert_eq!(filter(&result, &criteria), result, "not idempotent for {:?}", criteria);
    }
}

#[test]
fn test_sorted_rows_and_csv_cover_same_funds() {
    let catalog = catalog();
    let sorts = [
        SortState::default(),
        SortState::new(ColumnKey::Name, SortDirection::Descending),
        SortState::new(ColumnKey::SinceInception, SortDirection::Ascending),
    ];

    for criteria in all_criteria(&catalog) {
        let filtered = filter(&catalog.categories, &criteria);
        let csv = to_csv(&filtered).unwrap();
        let exported: BTreeSet<String> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(2).unwrap().to_string())
            .collect();

        for variant in ReturnVariant::ALL {
            for sort in sorts {
                let shown: BTreeSet<String> = sorted_rows(&filtered, sort, variant)
                    .into_iter()
                    .map(|row| row.number)
                    .collect();
                assert_eq!(shown, exported);
            }
        }
    }
}

#[test]
fn test_fixed_income_four_stars_example() {
    let catalog = catalog();
    let criteria = FilterCriteria::from_values("Fixed Income", "All", "4", "All");
    let result = filter(&catalog.categories, &criteria);

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].funds.len(), 1);
    assert_eq!(result[0].funds[0].name, "High Yield Fund");
    assert_eq!(result[0].funds[0].morningstar.rating, 4);
}

#[test]
fn test_session_round_trip() {
    let mut center = PerformanceCenter::with_sample().unwrap();
    let unsorted = center.table(ReturnVariant::Standardized);

    for _ in 0..3 {
        center.click_sort(ReturnVariant::Standardized, ColumnKey::ExpenseGross);
    }
    assert_eq!(center.table(ReturnVariant::Standardized), unsorted);

    center.set_morningstar_category("Large Value");
    let export = center.export().unwrap();
    assert_eq!(export.row_count, 1);
    assert!(export.content.lines().nth(1).unwrap().starts_with("Equity,Value Fund,FGHIJ,"));

    let footnotes: Vec<u32> = center.visible_footnotes().iter().map(|f| f.id).collect();
    assert_eq!(footnotes, vec![2, 5]);
}
