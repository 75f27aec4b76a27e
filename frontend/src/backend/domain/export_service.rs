//! Export service domain logic.
//!
//! Builds a printable report document from the current filter and the
//! presenter's rows, renders it to fixed-height text lines and cuts those lines
//! into pages by page height alone. A long table row wraps onto several lines
//! and those lines may land on different pages. Pages are handed to a
//! `PageSink`. The filtered rows can also be written as CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use shared::{FilterValue, PersonOption, ReportFilter, ReportRow, ReportSummary};

use crate::backend::domain::buddhist_calendar::format_buddhist_date;
use crate::backend::domain::report_table::NO_DATA_TEXT;

pub const REPORT_TITLE: &str = "รายงานการออม";
pub const ALL_YEARS_TEXT: &str = "ทุกปี";
pub const ALL_MONTHS_TEXT: &str = "ทุกเดือน";
pub const ALL_PERSONS_TEXT: &str = "ทุกคน";

const COLUMN_SEPARATOR: &str = " | ";
const TABLE_HEADER: [&str; 6] = ["ลำดับ", "ชื่อ-นามสกุล", "เดือน", "ปี", "จำนวนเงิน", "หมายเหตุ"];

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Lines that fit on one page
    pub lines_per_page: usize,
    /// Characters that fit on one line; longer lines wrap
    pub line_width: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            lines_per_page: 40,
            line_width: 96,
        }
    }
}

/// Human-readable description of each filter dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTexts {
    pub year: String,
    pub month: String,
    pub person: String,
}

impl FilterTexts {
    pub fn describe(filter: &ReportFilter, persons: &[PersonOption]) -> Self {
        let year = match &filter.year {
            FilterValue::All => ALL_YEARS_TEXT.to_string(),
            FilterValue::Exact(year) => year.clone(),
        };
        let month = match &filter.month {
            FilterValue::All => ALL_MONTHS_TEXT.to_string(),
            FilterValue::Exact(month) => month.clone(),
        };
        // Selector text is "{no} - {name}"; the name part is the second segment
        let person = match &filter.person_no {
            FilterValue::All => ALL_PERSONS_TEXT.to_string(),
            FilterValue::Exact(no) => persons
                .iter()
                .find(|p| &p.person_no == no)
                .and_then(|p| p.label().split(" - ").nth(1).map(str::to_string))
                .unwrap_or_else(|| no.clone()),
        };
        Self { year, month, person }
    }
}

/// A report ready to be laid out
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub date_line: String,
    pub filter_line: String,
    pub summary_lines: Vec<String>,
    pub header: String,
    pub rows: Vec<String>,
    /// File name without extension
    pub file_stem: String,
}

/// One page of rendered lines; numbers start at 1
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<String>,
}

/// Destination of paginated output
pub trait PageSink {
    /// Write all pages; returns the files produced
    fn write_pages(&mut self, file_stem: &str, pages: &[Page]) -> Result<Vec<PathBuf>>;
}

#[derive(Clone)]
pub struct ExportService {
    config: ExportConfig,
}

impl ExportService {
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// `รายงานการออม_{year}_{month}_{person}` with wildcard texts for unset filters
    pub fn file_stem(&self, filter: &ReportFilter, persons: &[PersonOption]) -> String {
        let texts = FilterTexts::describe(filter, persons);
        format!("{}_{}_{}_{}", REPORT_TITLE, texts.year, texts.month, texts.person)
    }

    pub fn build_document(
        &self,
        filter: &ReportFilter,
        persons: &[PersonOption],
        rows: &[ReportRow],
        summary: &ReportSummary,
        today: NaiveDate,
    ) -> ReportDocument {
        let texts = FilterTexts::describe(filter, persons);

        let rows = if rows.is_empty() {
            vec![NO_DATA_TEXT.to_string()]
        } else {
            rows.iter().map(Self::row_line).collect()
        };

        ReportDocument {
            title: REPORT_TITLE.to_string(),
            date_line: format!("วันที่ {}", format_buddhist_date(today)),
            filter_line: format!(
                "ปี: {}  เดือน: {}  บุคลากร: {}",
                texts.year, texts.month, texts.person
            ),
            summary_lines: vec![
                format!("จำนวนรายการ: {}", summary.record_count),
                format!("ยอดเงินออมรวม: {}", summary.total_amount),
                format!("ยอดเงินออมเฉลี่ย: {}", summary.average_amount),
            ],
            header: TABLE_HEADER.join(COLUMN_SEPARATOR),
            rows,
            file_stem: self.file_stem(filter, persons),
        }
    }

    fn row_line(row: &ReportRow) -> String {
        [
            row.no.as_str(),
            row.person_name.as_str(),
            row.month.as_str(),
            row.year.as_str(),
            row.formatted_amount.as_str(),
            row.remark.as_str(),
        ]
        .join(COLUMN_SEPARATOR)
    }

    /// Lay the document out as fixed-height lines, wrapping long ones
    pub fn render_lines(&self, document: &ReportDocument) -> Vec<String> {
        let mut lines = vec![
            document.title.clone(),
            document.date_line.clone(),
            document.filter_line.clone(),
            String::new(),
        ];
        lines.extend(document.summary_lines.iter().cloned());
        lines.push(String::new());
        lines.push(document.header.clone());
        lines.push("-".repeat(self.config.line_width.min(document.header.chars().count())));
        lines.extend(document.rows.iter().cloned());

        lines
            .iter()
            .flat_map(|line| wrap_line(line, self.config.line_width))
            .collect()
    }

    /// Page k holds lines `[k * H, (k + 1) * H)`. Always at least one page.
    pub fn paginate(&self, lines: &[String]) -> Vec<Page> {
        let per_page = self.config.lines_per_page.max(1);
        if lines.is_empty() {
            return vec![Page {
                number: 1,
                lines: Vec::new(),
            }];
        }

        lines
            .chunks(per_page)
            .enumerate()
            .map(|(index, chunk)| Page {
                number: index + 1,
                lines: chunk.to_vec(),
            })
            .collect()
    }

    /// Render, paginate and write a document through `sink`
    pub fn export_document(
        &self,
        document: &ReportDocument,
        sink: &mut dyn PageSink,
    ) -> Result<Vec<PathBuf>> {
        let lines = self.render_lines(document);
        let pages = self.paginate(&lines);
        info!(
            "📄 EXPORT: {} lines on {} pages for {}",
            lines.len(),
            pages.len(),
            document.file_stem
        );

        let files = sink.write_pages(&document.file_stem, &pages)?;
        info!("✅ EXPORT: Wrote {} files", files.len());
        Ok(files)
    }

    /// Write the rows as CSV into `output_dir/<file_stem>.csv`
    pub fn export_csv(
        &self,
        rows: &[ReportRow],
        output_dir: &Path,
        file_stem: &str,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create export directory {:?}", output_dir))?;
        let path = output_dir.join(format!("{}.csv", file_stem));

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {:?}", path))?;
        writer.write_record(["no", "person_name", "month", "year", "amount", "remark"])?;
        for row in rows {
            let amount = format!("{:.2}", row.raw_amount);
            writer.write_record([
                row.no.as_str(),
                row.person_name.as_str(),
                row.month.as_str(),
                row.year.as_str(),
                amount.as_str(),
                row.remark.as_str(),
            ])?;
        }
        writer.flush()?;

        info!("✅ EXPORT: Wrote {} rows to {:?}", rows.len(), path);
        Ok(path)
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `line` into pieces of at most `width` characters. Empty lines stay.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= width {
        return vec![line.to_string()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
