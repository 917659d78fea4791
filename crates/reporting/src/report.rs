//! The keyword performance report: one tab-delimited line per
//! (search domain, keyword), highest revenue first.

use chrono::NaiveDate;
use searchrev_attribution::LedgerEntry;
use searchrev_core::config::ReportConfig;
use serde::Serialize;

pub const REPORT_HEADER: [&str; 3] = ["Search Engine Domain", "Search Keyword", "Revenue"];

const DELIMITER: &str = "\t";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub search_domain: String,
    pub keyword: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordPerformanceReport {
    pub generated_on: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl KeywordPerformanceReport {
    /// Build from ledger entries that are already ranked; row order is kept.
    pub fn from_ranked(entries: &[LedgerEntry], generated_on: NaiveDate) -> Self {
        let rows = entries
            .iter()
            .map(|entry| ReportRow {
                search_domain: entry.key.search_domain.clone(),
                keyword: entry.key.keyword.clone(),
                revenue: entry.revenue,
            })
            .collect();
        Self { generated_on, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = REPORT_HEADER.join(DELIMITER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.search_domain);
            out.push_str(DELIMITER);
            out.push_str(&row.keyword);
            out.push_str(DELIMITER);
            out.push_str(&format_revenue(row.revenue));
            out.push('\n');
        }
        out
    }

    /// e.g. `2009-09-27_SearchKeywordPerformance.tab`
    pub fn file_name(&self, config: &ReportConfig) -> String {
        format!(
            "{}_{}.{}",
            self.generated_on.format("%Y-%m-%d"),
            config.file_suffix,
            config.extension
        )
    }
}

/// Whole amounts keep one decimal place (`250.0`); others use the shortest
/// exact form (`20.75`).
pub fn format_revenue(revenue: f64) -> String {
    if revenue.is_finite() && revenue.fract() == 0.0 && revenue.abs() < 1e15 {
        format!("{revenue:.1}")
    } else {
        format!("{revenue}")
    }
}
