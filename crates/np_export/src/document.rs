//! Paginated, printable rendition of a payout report.
//!
//! [`to_document_table`] lays the report out into pages; [`render_pdf`] turns
//! that layout into PDF bytes.

use np_core::PayoutReport;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::table::ReportTable;
use crate::ExportOptions;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TITLE_Y: f32 = 280.0;
const TABLE_TOP: f32 = 268.0;
const TABLE_BOTTOM: f32 = 22.0;
const MAX_LINE_HEIGHT: f32 = 6.0;
const AUTHOR_COLUMN: f32 = 80.0;
const TITLE_SIZE: f32 = 16.0;
const CELL_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const MAX_AUTHOR_CHARS: usize = 40;
const PT_PER_MM: f32 = 2.834_646;
const LINE_FILL: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    /// 1-based
    pub number: usize,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTable {
    pub title: String,
    pub pages: Vec<DocumentPage>,
}

impl DocumentTable {
    /// Every body row across all pages, total row last.
    pub fn rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay the report out in pages of at most `rows_per_page` author rows.
///
/// The header repeats on every page and the total row closes the last one.
/// An empty report still yields one page.
pub fn to_document_table(report: &PayoutReport, options: &ExportOptions) -> Result<DocumentTable> {
    if options.rows_per_page == 0 {
        return Err(ExportError::Layout("rows_per_page must be positive".to_string()));
    }

    let table = ReportTable::from_report(report, options);
    let mut pages: Vec<DocumentPage> = table
        .rows
        .chunks(options.rows_per_page)
        .enumerate()
        .map(|(i, chunk)| DocumentPage {
            number: i + 1,
            header: table.header.clone(),
            rows: chunk.to_vec(),
        })
        .collect();

    if pages.is_empty() {
        pages.push(DocumentPage {
            number: 1,
            header: table.header.clone(),
            rows: Vec::new(),
        });
    }

    if let (Some(total), Some(last)) = (table.total, pages.last_mut()) {
        last.rows.push(total);
    }

    Ok(DocumentTable {
        title: options.title.clone(),
        pages,
    })
}

/// Render a laid-out table as an A4 PDF using the builtin Helvetica faces.
///
/// Fails with [`ExportError::Document`] when a cell holds text those faces
/// cannot show.
pub fn render_pdf(table: &DocumentTable) -> Result<Vec<u8>> {
    let page_count = table.page_count();
    let runs = table
        .pages
        .iter()
        .map(|page| page_runs(&table.title, page, page_count))
        .collect::<Result<Vec<_>>>()?;

    let (doc, first_page, first_layer) = PdfDocument::new(
        table.title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Document(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Document(e.to_string()))?;

    for (page, runs) in table.pages.iter().zip(&runs) {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (index, layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", page.number),
            );
            doc.get_page(index).get_layer(layer)
        };
        for run in runs {
            let font = if run.is_bold() { &bold } else { &regular };
            layer.use_text(run.text.as_str(), run.size, Mm(run.x), Mm(run.y), font);
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| ExportError::Document(e.to_string()))?;
    debug!("Rendered {} document pages ({} bytes)", page_count, bytes.len());
    Ok(bytes)
}

/// Lay out and render in one step.
pub fn to_document(report: &PayoutReport, options: &ExportOptions) -> Result<Vec<u8>> {
    render_pdf(&to_document_table(report, options)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Title,
    Header,
    Cell { row: usize, column: usize },
    Footer,
}

/// One piece of text placed on a page, in millimetres from the bottom left.
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    kind: RunKind,
    text: String,
    size: f32,
    x: f32,
    y: f32,
}

impl TextRun {
    fn is_bold(&self) -> bool {
        matches!(self.kind, RunKind::Title | RunKind::Header)
    }
}

/// Everything drawn on one page. Author cells wider than the author column
/// continue on the following lines; the other cells sit on the row's first line.
fn page_runs(title: &str, page: &DocumentPage, page_count: usize) -> Result<Vec<TextRun>> {
    let mut runs = Vec::new();
    let mut push = |kind: RunKind, text: &str, size: f32, x: f32, y: f32| -> Result<()> {
        runs.push(TextRun {
            kind,
            text: printable(text)?,
            size,
            x,
            y,
        });
        Ok(())
    };

    push(RunKind::Title, title, TITLE_SIZE, MARGIN, TITLE_Y)?;

    let wrapped: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            row.first()
                .map(|author| wrap(author, MAX_AUTHOR_CHARS))
                .unwrap_or_default()
        })
        .collect();
    let lines = 1 + wrapped.iter().map(|w| w.len().max(1)).sum::<usize>();
    let line_height = ((TABLE_TOP - TABLE_BOTTOM) / lines as f32).min(MAX_LINE_HEIGHT);
    let size = CELL_SIZE.min(line_height * PT_PER_MM * LINE_FILL);

    let columns = column_offsets(page.header.len());
    for (cell, x) in page.header.iter().zip(&columns) {
        push(RunKind::Header, cell, size, *x, TABLE_TOP)?;
    }

    let mut line = 1;
    for (row, (cells, author_lines)) in page.rows.iter().zip(&wrapped).enumerate() {
        let top = TABLE_TOP - line_height * line as f32;
        for (column, (cell, x)) in cells.iter().zip(&columns).enumerate() {
            let kind = RunKind::Cell { row, column };
            if column == 0 {
                for (i, part) in author_lines.iter().enumerate() {
                    push(kind, part, size, *x, top - line_height * i as f32)?;
                }
            } else {
                push(kind, cell, size, *x, top)?;
            }
        }
        line += author_lines.len().max(1);
    }

    let footer = format!("Page {} of {}", page.number, page_count);
    push(RunKind::Footer, &footer, FOOTER_SIZE, MARGIN, TABLE_BOTTOM - 10.0)?;
    Ok(runs)
}

/// Left edge of every column: a wide author column, the rest split evenly.
fn column_offsets(columns: usize) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let usable = PAGE_WIDTH - 2.0 * MARGIN - AUTHOR_COLUMN;
    let rest = (columns - 1).max(1) as f32;
    let width = usable / rest;

    let mut offsets = vec![MARGIN];
    for i in 0..columns - 1 {
        offsets.push(MARGIN + AUTHOR_COLUMN + width * i as f32);
    }
    offsets
}

/// Split `text` into lines of at most `width` visible characters, breaking
/// after spaces where possible. The lines concatenate back to `text`.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for word in text.split_inclusive(' ') {
        let visible = word.trim_end_matches(' ').chars().count();
        if len > 0 && len + visible > width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        for c in word.chars() {
            if len >= width && c != ' ' {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            line.push(c);
            len += 1;
        }
    }
    lines.push(line);
    lines
}

/// The builtin faces draw printable Latin-1 only.
fn printable(text: &str) -> Result<String> {
    match text
        .chars()
        .find(|&c| !matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF))
    {
        Some(c) => Err(ExportError::Document(format!(
            "{:?} contains {:?} (U+{:04X}), which the document fonts cannot draw",
            text, c, c as u32
        ))),
        None => Ok(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_core::{aggregate, Article, RateConfig};
    use crate::table::TOTAL_LABEL;

    fn report(authors: usize) -> PayoutReport {
        let articles: Vec<Article> = (0..authors)
            .map(|i| Article::new(i.to_string(), format!("Author {}", i), "news"))
            .collect();
        aggregate(&articles, &RateConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_report_is_one_page() {
        let table = to_document_table(&report(0), &ExportOptions::default()).unwrap();
        assert_eq!(table.page_count(), 1);
        assert_eq!(table.pages[0].header, vec!["Author", "News", "Blog", "Total Payout"]);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows, vec![&vec![TOTAL_LABEL.to_string(), String::new(), String::new(), "0.00".to_string()]]);
    }

    #[test]
    fn test_pagination() {
        let options = ExportOptions {
            rows_per_page: 4,
            ..ExportOptions::default()
        };
        let table = to_document_table(&report(9), &options).unwrap();

        assert_eq!(table.page_count(), 3);
        assert_eq!(table.pages[0].rows.len(), 4);
        assert_eq!(table.pages[2].rows.len(), 2);
        assert_eq!(table.pages[2].rows[1][0], TOTAL_LABEL);
        assert_eq!(table.rows().count(), 10);
        assert!(table.pages.iter().all(|p| p.header[0] == "Author"));
    }

    #[test]
    fn test_zero_rows_per_page_is_rejected() {
        let options = ExportOptions {
            rows_per_page: 0,
            ..ExportOptions::default()
        };
        assert!(matches!(
            to_document_table(&report(1), &options),
            Err(ExportError::Layout(_))
        ));
    }

    #[test]
    fn test_author_with_comma_stays_intact() {
        let articles = vec![Article::new("1", "Doe, Jane", "blog")];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let table = to_document_table(&report, &ExportOptions::default()).unwrap();
        assert_eq!(table.pages[0].rows[0][0], "Doe, Jane");
    }

    #[test]
    fn test_render_pdf() {
        let options = ExportOptions {
            rows_per_page: 5,
            ..ExportOptions::default()
        };
        let bytes = to_document(&report(12), &options).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_column_offsets() {
        let offsets = column_offsets(4);
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[0], MARGIN);
        assert_eq!(offsets[1], MARGIN + AUTHOR_COLUMN);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
        assert!(*offsets.last().unwrap() < PAGE_WIDTH - MARGIN);
    }

    fn drawn_rows(table: &DocumentTable) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for page in &table.pages {
            let mut cells: Vec<Vec<String>> = vec![Vec::new(); page.rows.len()];
            for run in page_runs(&table.title, page, table.page_count()).unwrap() {
                if let RunKind::Cell { row, column } = run.kind {
                    if cells[row].len() == column {
                        cells[row].push(String::new());
                    }
                    cells[row][column].push_str(&run.text);
                }
            }
            rows.extend(cells);
        }
        rows
    }

    #[test]
    fn test_drawn_cells_match_delimited_rows() {
        let long = "Jane Doe, John Smith and Peter Jones in Westminster";
        let unbroken = "Averyveryveryveryverylongsinglewordbylineforsure";
        let articles = vec![
            Article::new("1", long, "news"),
            Article::new("2", "Zoë Müller", "blog"),
            Article::new("3", "Doe, Jane", "news"),
            Article::new("4", "O'Brien \"OB\"", "blog"),
            Article::new("5", unbroken, "news"),
        ];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let options = ExportOptions {
            rows_per_page: 2,
            ..ExportOptions::default()
        };

        let bytes = crate::to_delimited_table(&report, &options).unwrap();
        let delimited: Vec<Vec<String>> = csv::ReaderBuilder::new()
            .from_reader(bytes.as_slice())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let table = to_document_table(&report, &options).unwrap();

        assert_eq!(drawn_rows(&table), delimited);
        assert_eq!(delimited[0][0], long);
        assert_eq!(delimited[4][0], unbroken);
        assert!(render_pdf(&table).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_author_wraps_below_itself() {
        let long = "Jane Doe, John Smith and Peter Jones in Westminster";
        let articles = vec![Article::new("1", long, "news"), Article::new("2", "B", "blog")];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let table = to_document_table(&report, &ExportOptions::default()).unwrap();
        let runs = page_runs(&table.title, &table.pages[0], 1).unwrap();

        let author: Vec<&TextRun> = runs
            .iter()
            .filter(|r| r.kind == RunKind::Cell { row: 0, column: 0 })
            .collect();
        assert_eq!(author.len(), 2);
        assert!(author[1].y < author[0].y);
        assert!(author.iter().all(|r| r.text.trim_end().chars().count() <= MAX_AUTHOR_CHARS));

        let next = runs
            .iter()
            .find(|r| r.kind == RunKind::Cell { row: 1, column: 0 })
            .unwrap();
        assert!(next.y < author[1].y);
        assert_eq!(next.text, "B");
    }

    #[test]
    fn test_text_outside_latin1_is_rejected() {
        let articles = vec![Article::new("1", "Ravi ₹ Kumar", "news")];
        let report = aggregate(&articles, &RateConfig::default()).unwrap();
        let err = to_document(&report, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::Document(ref m) if m.contains("U+20B9")));

        assert!(crate::to_delimited_table(&report, &ExportOptions::default()).is_ok());
    }

    #[test]
    fn test_printable() {
        assert_eq!(printable("Zoë Müller").unwrap(), "Zoë Müller");
        assert!(printable("Line\nBreak").is_err());
        assert!(printable("王").is_err());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);

        let text = "Jane Doe, John Smith and Peter Jones in Westminster";
        let lines = wrap(text, 40);
        assert_eq!(lines, vec!["Jane Doe, John Smith and Peter Jones in ", "Westminster"]);
        assert_eq!(lines.concat(), text);
    }
}
