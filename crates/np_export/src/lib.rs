use std::fmt;
use std::str::FromStr;

use np_core::{PayoutReport, ReportSettings};
use serde::{Deserialize, Serialize};

pub mod delimited;
pub mod document;
pub mod error;
pub mod table;

pub use delimited::to_delimited_table;
pub use document::{render_pdf, to_document, to_document_table, DocumentPage, DocumentTable};
pub use error::{ExportError, Result};
pub use table::ReportTable;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub title: String,
    pub include_total: bool,
    pub rows_per_page: usize,
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ReportSettings::default())
    }
}

impl From<&ReportSettings> for ExportOptions {
    fn from(settings: &ReportSettings) -> Self {
        Self {
            title: settings.title.clone(),
            include_total: settings.include_total,
            rows_per_page: settings.rows_per_page,
            delimiter: b',',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "payouts.csv",
            ExportFormat::Pdf => "payouts.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Pdf => f.write_str("pdf"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Serialize `report` in the requested format. Delivery is left to the caller.
pub fn export(report: &PayoutReport, format: ExportFormat, options: &ExportOptions) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_delimited_table(report, options),
        ExportFormat::Pdf => to_document(report, options),
    }
}

pub mod prelude {
    pub use super::{export, ExportError, ExportFormat, ExportOptions};
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::{aggregate, Article, RateConfig};

    fn parse_csv(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_formats_agree_row_for_row() {
        let articles = vec![
            Article::new("1", "Doe, Jane", "news"),
            Article::new("2", "O'Brien \"OB\"", "blog"),
            Article::new("3", "Doe, Jane", "blog"),
            Article::new("4", "Smith", "news"),
            Article::new("5", "Lee", "news"),
        ];
        let rates = RateConfig::default().with_rate("blog", 7.25);
        let report = aggregate(&articles, &rates).unwrap();
        let options = ExportOptions {
            rows_per_page: 2,
            ..ExportOptions::default()
        };

        let delimited = parse_csv(&to_delimited_table(&report, &options).unwrap());
        let document = to_document_table(&report, &options).unwrap();
        let document_rows: Vec<Vec<String>> = document.rows().cloned().collect();

        assert_eq!(delimited, document_rows);
        assert_eq!(document.page_count(), 2);
        assert_eq!(delimited[0], vec!["Doe, Jane", "1", "1", "12.25"]);
    }

    #[test]
    fn test_empty_report_in_both_formats() {
        let report = aggregate(&[], &RateConfig::default()).unwrap();
        let options = ExportOptions::default();

        let delimited = parse_csv(&export(&report, ExportFormat::Csv, &options).unwrap());
        assert_eq!(delimited, vec![vec![table::TOTAL_LABEL, "", "", "0.00"]]);

        let document = to_document_table(&report, &options).unwrap();
        assert_eq!(document.rows().cloned().collect::<Vec<_>>(), delimited);

        let pdf = export(&report, ExportFormat::Pdf, &options).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::Csv.file_name(), "payouts.csv");
        assert_eq!(ExportFormat::Pdf.file_name(), "payouts.pdf");
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(ref f)) if f == "xlsx"
        ));
    }

    #[test]
    fn test_export_error_is_distinct_from_aggregation_errors() {
        let err: np_core::Error = ExportError::Layout("bad".into()).into();
        assert!(matches!(err, np_core::Error::Export(_)));
        assert!(!err.is_configuration());
    }
}
