use csv::{QuoteStyle, WriterBuilder};
use np_core::PayoutReport;
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::table::ReportTable;
use crate::ExportOptions;

/// Render the report as delimited text: header, one row per author, total row.
///
/// Fields holding the delimiter, a quote or a line break are quoted and inner
/// quotes doubled.
pub fn to_delimited_table(report: &PayoutReport, options: &ExportOptions) -> Result<Vec<u8>> {
    let table = ReportTable::from_report(report, options);

    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in table.body() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(std::io::Error::new(e.error().kind(), e.to_string())))?;
    debug!("Wrote {} delimited rows ({} bytes)", table.rows.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::{aggregate, Article, RateConfig};
    use crate::table::TOTAL_LABEL;

    fn read(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_concrete_report() {
        let articles = vec![
            Article::new("1", "A", "news"),
            Article::new("2", "A", "blog"),
            Article::new("3", "B", "news"),
        ];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let bytes = to_delimited_table(&report, &ExportOptions::default()).unwrap();

        assert_eq!(
            read(&bytes),
            vec![
                vec!["Author", "News", "Blog", "Total Payout"],
                vec!["A", "1", "1", "15.00"],
                vec!["B", "1", "0", "5.00"],
                vec![TOTAL_LABEL, "", "", "20.00"],
            ]
        );
    }

    #[test]
    fn test_empty_report_has_header_and_zero_total() {
        let report = aggregate(&[], &RateConfig::default()).unwrap();
        let bytes = to_delimited_table(&report, &ExportOptions::default()).unwrap();
        let rows = read(&bytes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Author");
        assert_eq!(rows[1], vec![TOTAL_LABEL, "", "", "0.00"]);
    }

    #[test]
    fn test_author_named_total_is_not_the_total_row() {
        let articles = vec![Article::new("1", "Total", "news")];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let rows = read(&to_delimited_table(&report, &ExportOptions::default()).unwrap());

        assert_eq!(rows[1], vec!["Total", "1", "0", "5.00"]);
        assert_eq!(rows[2], vec![TOTAL_LABEL, "", "", "5.00"]);
        assert_ne!(rows[1][0], rows[2][0]);
    }

    #[test]
    fn test_total_row_can_be_left_out() {
        let report = aggregate(&[], &RateConfig::default()).unwrap();
        let options = ExportOptions {
            include_total: false,
            ..ExportOptions::default()
        };
        let rows = read(&to_delimited_table(&report, &options).unwrap());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_author_names_are_quoted() {
        let articles = vec![
            Article::new("1", "Doe, Jane", "news"),
            Article::new("2", "The \"Insider\"", "blog"),
            Article::new("3", "Line\nBreak", "blog"),
        ];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let bytes = to_delimited_table(&report, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains("\"Doe, Jane\",1,0,5.00"));
        assert!(text.contains("\"The \"\"Insider\"\"\",0,1,10.00"));
        assert!(text.contains("\"Line\nBreak\""));

        let rows = read(&bytes);
        assert_eq!(rows[1][0], "Doe, Jane");
        assert_eq!(rows[2][0], "The \"Insider\"");
        assert_eq!(rows[3][0], "Line\nBreak");
    }

    #[test]
    fn test_custom_delimiter() {
        let articles = vec![Article::new("1", "Doe; Jane", "news")];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let options = ExportOptions {
            delimiter: b';',
            ..ExportOptions::default()
        };
        let text = String::from_utf8(to_delimited_table(&report, &options).unwrap()).unwrap();
        assert!(text.starts_with("Author;News;Blog;Total Payout"));
        assert!(text.contains("\"Doe; Jane\";1;0;5.00"));
    }
}
