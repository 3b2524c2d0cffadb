//! CSV export engine
//!
//! Serializes the filtered (never the sorted) hierarchy in catalog order:
//! one header row, then one row per fund carrying both return series.

use crate::catalog::{Category, Fund};
use crate::config::CenterConfig;
use crate::error::{PerformanceError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

/// Header row, in field order
pub const CSV_HEADERS: [&str; 21] = [
    "Asset Category",
    "Fund Name",
    "Fund Number",
    "Morningstar Category",
    "Morningstar Rating",
    "Gross Expense Ratio",
    "Net Expense Ratio",
    "Standardized YTD Return",
    "Standardized 1-Year Return",
    "Standardized 3-Year Return",
    "Standardized 5-Year Return",
    "Standardized 10-Year Return",
    "Standardized Since Inception Return",
    "Non-Standardized YTD Return",
    "Non-Standardized 1-Year Return",
    "Non-Standardized 3-Year Return",
    "Non-Standardized 5-Year Return",
    "Non-Standardized 10-Year Return",
    "Non-Standardized Since Inception Return",
    "Portfolio Managers",
    "Footnotes",
];

/// Format a percentage with two decimals, e.g. `0.85` → `"0.85%"`.
///
/// Rounds the way the browser's `toFixed(2)` does: the exact binary value
/// goes to the nearest hundredth, exact halves round away from zero, and
/// negative zero prints as `0.00`.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        return "NaN%".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}Infinity%", sign);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    match half_cent_thousandths(magnitude) {
        Some(thousandths) => {
            let cents = thousandths / 10 + 1;
            format!("{}{}.{:02}%", sign, cents / 100, cents % 100)
        }
        None => format!("{}{:.2}%", sign, magnitude),
    }
}

// Exact value in thousandths, when it lies exactly halfway between two hundredths
fn half_cent_thousandths(magnitude: f64) -> Option<u128> {
    let bits = magnitude.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return None;
    }

    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += zeros as i32;

    // Integers, and anything with more than three binary places, never tie
    if exponent >= 0 || exponent < -3 {
        return None;
    }
    let thousandths = (u128::from(mantissa) * 1000) >> exponent.unsigned_abs();
    (thousandths % 10 == 5).then_some(thousandths)
}

fn fund_record(category: &Category, fund: &Fund) -> Vec<String> {
    let mut record = Vec::with_capacity(CSV_HEADERS.len());
    record.push(category.name.clone());
    record.push(fund.name.clone());
    record.push(fund.number.clone());
    record.push(fund.morningstar.category.clone());
    record.push(fund.morningstar.rating.to_string());
    record.push(format_percent(fund.expense.gross));
    record.push(format_percent(fund.expense.net));
    record.extend(fund.standardized_returns.values().into_iter().map(format_percent));
    record.extend(fund.non_standardized_returns.values().into_iter().map(format_percent));
    record.push(fund.portfolio_managers.join("; "));
    record.push(
        fund.footnote_refs
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    );
    record
}

/// Serialize categories to CSV text.
///
/// Fields containing a comma, quote or line break are quoted, with embedded
/// quotes doubled. Lines end in `\n`, including the last one.
pub fn to_csv(categories: &[Category]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;

    let mut rows = 0usize;
    for category in categories {
        for fund in &category.funds {
            writer.write_record(fund_record(category, fund))?;
            rows += 1;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PerformanceError::Export(e.to_string()))?;
    let content = String::from_utf8(bytes)?;

    debug!("Exported {} fund rows ({} bytes)", rows, content.len());
    Ok(content)
}

/// A ready-to-download export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
    pub row_count: usize,
}

impl ExportFile {
    /// Export categories under the configured filename and MIME type
    pub fn build(categories: &[Category], config: &CenterConfig) -> Result<Self> {
        Ok(Self {
            filename: config.export_filename.clone(),
            mime_type: config.export_mime_type.clone(),
            content: to_csv(categories)?,
            row_count: categories.iter().map(|c| c.funds.len()).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::filter::{filter, FilterCriteria};

    fn categories() -> Vec<Category> {
        Catalog::sample().unwrap().categories
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.85), "0.85%");
        assert_eq!(format_percent(5.0), "5.00%");
        assert_eq!(format_percent(-1.5), "-1.50%");
    }

    #[test]
    fn test_format_percent_rounds_like_to_fixed() {
        // Exact binary halves round away from zero
        assert_eq!(format_percent(0.125), "0.13%");
        assert_eq!(format_percent(0.625), "0.63%");
        assert_eq!(format_percent(-0.125), "-0.13%");
        assert_eq!(format_percent(12.625), "12.63%");
        // Decimal-looking halves that are below the half in binary
        assert_eq!(format_percent(1.005), "1.00%");
        assert_eq!(format_percent(2.675), "2.67%");

        assert_eq!(format_percent(-0.0), "0.00%");
        assert_eq!(format_percent(-0.001), "-0.00%");
        assert_eq!(format_percent(f64::NAN), "NaN%");
    }

    #[test]
    fn test_single_fund_export() {
        let criteria = FilterCriteria::from_values("Fixed Income", "All", "4", "All");
        let filtered = filter(&categories(), &criteria);
        let csv = to_csv(&filtered).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert_eq!(
            lines[1],
            "Fixed Income,High Yield Fund,PQRST,High Yield Bond,4,0.78%,0.68%,\
             4.95%,6.52%,5.41%,5.17%,4.72%,5.33%,\
             5.75%,7.42%,6.21%,5.87%,5.32%,6.93%,\
             Robert Johnson,\"2, 3\""
        );
        assert!(csv.ends_with("\"2, 3\"\n"));
    }

    #[test]
    fn test_expense_formatted_with_percent() {
        let csv = to_csv(&categories()).unwrap();
        let growth = csv.lines().nth(1).unwrap();
        assert!(growth.contains(",0.85%,0.75%,"));
        assert!(!growth.contains(",0.85,"));
    }

    #[test]
    fn test_full_export_rows_in_catalog_order() {
        let csv = to_csv(&categories()).unwrap();
        let fund_names: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(1).unwrap())
            .collect();

        assert_eq!(
            fund_names,
            vec![
                "Growth Fund",
                "Value Fund",
                "Bond Fund",
                "High Yield Fund",
                "Real Estate Fund",
                "Commodities Fund",
            ]
        );
        assert!(csv.lines().nth(1).unwrap().contains("John Smith; Emily Williams"));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv, format!("{}\n", CSV_HEADERS.join(",")));
    }

    #[test]
    fn test_single_footnote_is_not_quoted() {
        let criteria = FilterCriteria::from_values("All", "Intermediate Core Bond", "all", "All");
        let csv = to_csv(&filter(&categories(), &criteria)).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with("Robert Johnson; Jane Doe,3"));
    }

    #[test]
    fn test_missing_footnotes_export_empty_field() {
        let mut cats = categories();
        cats[0].funds[0].footnote_refs.clear();
        cats[0].funds.truncate(1);
        cats.truncate(1);

        let csv = to_csv(&cats).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with("John Smith; Emily Williams,"));
    }

    #[test]
    fn test_quotes_and_commas_escaped() {
        let mut cats = categories();
        cats[0].funds[0].name = "Growth Fund \"A\"".to_string();
        cats[0].name = "Equity, Domestic".to_string();

        let csv = to_csv(&cats).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Equity, Domestic\",\"Growth Fund \"\"A\"\"\",ABCDE,"));
    }

    #[test]
    fn test_export_file_metadata() {
        let config = CenterConfig::default();
        let export = ExportFile::build(&categories(), &config).unwrap();

        assert_eq!(export.filename, "performance_data.csv");
        assert_eq!(export.mime_type, "text/csv;charset=utf-8");
        assert_eq!(export.row_count, 6);
        assert_eq!(export.content.lines().count(), 7);
    }
}
