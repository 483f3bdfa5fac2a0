use np_core::{format_amount, PayoutReport};

use crate::ExportOptions;

pub const AUTHOR_HEADER: &str = "Author";
pub const PAYOUT_HEADER: &str = "Total Payout";
/// Label of the total row, distinct from any plausible byline.
pub const TOTAL_LABEL: &str = "Total (all authors)";

/// The cells every export format renders, in display order.
///
/// Both exporters build from this one table, which keeps their rows identical.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: Option<Vec<String>>,
}

impl ReportTable {
    pub fn from_report(report: &PayoutReport, options: &ExportOptions) -> Self {
        let mut header = Vec::with_capacity(report.categories.len() + 2);
        header.push(AUTHOR_HEADER.to_string());
        header.extend(report.categories.iter().map(|c| c.label()));
        header.push(PAYOUT_HEADER.to_string());

        let rows = report
            .summaries
            .iter()
            .map(|summary| {
                let mut row = Vec::with_capacity(header.len());
                row.push(summary.author.clone());
                row.extend(
                    report
                        .categories
                        .iter()
                        .map(|c| summary.count(c.as_str()).to_string()),
                );
                row.push(format_amount(summary.payout));
                row
            })
            .collect();

        let total = options.include_total.then(|| {
            let mut row = vec![TOTAL_LABEL.to_string()];
            row.extend(report.categories.iter().map(|_| String::new()));
            row.push(format_amount(report.total));
            row
        });

        Self { header, rows, total }
    }

    /// Data rows followed by the total row, if any.
    pub fn body(&self) -> impl Iterator<Item = &Vec<String>> {
        self.rows.iter().chain(self.total.iter())
    }

    pub fn columns(&self) -> usize {
        self.header.len()
    }
}
