//! Report table presentation.
//!
//! Turns filtered savings records and personnel records into display rows and
//! computes the summary block shown under the report table.
//!
//! ## Key Responsibilities
//!
//! - **Row Formatting**: `-` placeholder for empty cells, currency formatting of amounts
//! - **Summary Statistics**: record count, total and average of the shown rows
//! - **Personnel Rows**: all ten personnel columns, newest `no` first
//! - **Placeholders**: texts shown when a table has nothing to show
//!
//! ## Core Components
//!
//! - **ReportTableService**: main service for table operations
//! - **ReportTableConfig**: unit display, placeholder and digit set

use shared::{Personnel, PersonnelRow, ReportRow, ReportSummary, Saving};

use crate::backend::domain::money_format::{MoneyFormatter, NumberLocale};
use crate::backend::domain::report_filter::sort_by_sequence_desc;
use crate::backend::domain::sheet_values::amount_value;

/// Shown in place of an empty table
pub const NO_DATA_TEXT: &str = "ไม่พบข้อมูล";

/// Shown in place of a table whose collection failed to load
pub const LOAD_ERROR_TEXT: &str = "เกิดข้อผิดพลาดในการโหลดข้อมูล";

/// Configuration for report table display
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTableConfig {
    /// Append " บาท" to formatted amounts
    pub show_unit: bool,
    /// Substituted for empty cells
    pub placeholder: String,
    pub locale: NumberLocale,
}

impl Default for ReportTableConfig {
    fn default() -> Self {
        Self {
            show_unit: true,
            placeholder: "-".to_string(),
            locale: NumberLocale::Thai,
        }
    }
}

#[derive(Clone)]
pub struct ReportTableService {
    config: ReportTableConfig,
    formatter: MoneyFormatter,
}

impl ReportTableService {
    pub fn new() -> Self {
        Self::with_config(ReportTableConfig::default())
    }

    pub fn with_config(config: ReportTableConfig) -> Self {
        let formatter = MoneyFormatter::with_locale(config.locale);
        Self { config, formatter }
    }

    pub fn config(&self) -> &ReportTableConfig {
        &self.config
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.formatter.format(amount, self.config.show_unit)
    }

    /// Format records in the order given
    pub fn format_rows(&self, records: &[Saving]) -> Vec<ReportRow> {
        records.iter().map(|r| self.format_row(r)).collect()
    }

    pub fn format_row(&self, record: &Saving) -> ReportRow {
        let raw_amount = amount_value(&record.amount);
        ReportRow {
            no: self.cell(&record.no),
            person_name: self.cell(&record.person_name),
            month: self.cell(&record.month),
            year: self.cell(&record.year),
            formatted_amount: self.format_amount(raw_amount),
            remark: self.cell(&record.remark),
            raw_amount,
        }
    }

    /// Count, total and average of the records; average is 0 for no records
    pub fn summarize(&self, records: &[Saving]) -> ReportSummary {
        let record_count = records.len();
        let raw_total: f64 = records.iter().map(|r| amount_value(&r.amount)).sum();
        let raw_average = if record_count == 0 {
            0.0
        } else {
            raw_total / record_count as f64
        };

        ReportSummary {
            record_count,
            total_amount: self.format_amount(raw_total),
            average_amount: self.format_amount(raw_average),
            raw_total,
            raw_average,
        }
    }

    /// Personnel rows, newest `no` first
    pub fn format_personnel_rows(&self, personnel: &[Personnel]) -> Vec<PersonnelRow> {
        let mut sorted: Vec<&Personnel> = personnel.iter().collect();
        sort_by_sequence_desc(&mut sorted, |p| p.no.as_str());

        sorted
            .into_iter()
            .map(|p| PersonnelRow {
                no: self.cell(&p.no),
                title: self.cell(&p.title),
                name: self.cell(&p.name),
                birthday: self.cell(&p.birthday),
                workday: self.cell(&p.workday),
                phone: self.cell(&p.phone),
                address: self.cell(&p.address),
                idline: self.cell(&p.idline),
                fb: self.cell(&p.fb),
                remark: self.cell(&p.remark),
            })
            .collect()
    }

    fn cell(&self, value: &str) -> String {
        if value.is_empty() {
            self.config.placeholder.clone()
        } else {
            value.to_string()
        }
    }
}

impl Default for ReportTableService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::report_filter::apply_filter;
    use shared::{FilterValue, ReportFilter};

    fn saving(no: &str, amount: &str, remark: &str) -> Saving {
        Saving {
            no: no.to_string(),
            person_no: "1".to_string(),
            person_name: "สมชาย".to_string(),
            month: "มกราคม".to_string(),
            year: "2567".to_string(),
            amount: amount.to_string(),
            remark: remark.to_string(),
        }
    }

    #[test]
    fn test_format_row_placeholders() {
        let service = ReportTableService::new();
        let record = Saving {
            no: "4".to_string(),
            amount: "1500".to_string(),
            ..Default::default()
        };

        let row = service.format_row(&record);
        assert_eq!(row.no, "4");
        assert_eq!(row.person_name, "-");
        assert_eq!(row.month, "-");
        assert_eq!(row.year, "-");
        assert_eq!(row.remark, "-");
        assert_eq!(row.formatted_amount, "1,500.00 บาท");
        assert_eq!(row.raw_amount, 1500.0);
    }

    #[test]
    fn test_unreadable_amount_formats_as_zero() {
        let service = ReportTableService::new();
        let row = service.format_row(&saving("1", "abc", ""));
        assert_eq!(row.formatted_amount, "0.00 บาท");
    }

    #[test]
    fn test_format_without_unit() {
        let service = ReportTableService::with_config(ReportTableConfig {
            show_unit: false,
            ..ReportTableConfig::default()
        });
        let row = service.format_row(&saving("1", "2500.5", "note"));
        assert_eq!(row.formatted_amount, "2,500.50");
        assert_eq!(row.remark, "note");
    }

    #[test]
    fn test_summarize() {
        let service = ReportTableService::new();
        let records = vec![saving("1", "100", ""), saving("2", "200", ""), saving("3", "x", "")];

        let summary = service.summarize(&records);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_amount, "300.00 บาท");
        assert_eq!(summary.average_amount, "100.00 บาท");
    }

    #[test]
    fn test_summary_of_empty_filter_result() {
        let service = ReportTableService::new();
        let records = vec![saving("1", "100", "")];
        let filter = ReportFilter {
            year: FilterValue::parse("2500"),
            ..ReportFilter::all()
        };

        let filtered = apply_filter(&records, &filter);
        let summary = service.summarize(&filtered);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.total_amount, "0.00 บาท");
        assert_eq!(summary.average_amount, "0.00 บาท");
    }

    #[test]
    fn test_personnel_rows_sorted_desc() {
        let service = ReportTableService::new();
        let personnel = vec![
            Personnel {
                no: "2".to_string(),
                title: "นาย".to_string(),
                name: "สมชาย".to_string(),
                ..Default::default()
            },
            Personnel {
                no: "10".to_string(),
                title: "นาง".to_string(),
                name: "สมหญิง".to_string(),
                phone: "0812345678".to_string(),
                ..Default::default()
            },
        ];

        let rows = service.format_personnel_rows(&personnel);
        assert_eq!(rows[0].no, "10");
        assert_eq!(rows[0].phone, "0812345678");
        assert_eq!(rows[0].birthday, "-");
        assert_eq!(rows[1].no, "2");
        assert_eq!(rows[1].remark, "-");
    }
}
