//! Text projection of the views: personnel table, savings report with its
//! selectors and summary, dashboard cards and modal notices.

use shared::{DashboardMetrics, Notice, NoticeLevel, PersonnelRow, ReportRow};

use crate::backend::domain::chart_service::ChartHandle;
use crate::backend::domain::commands::reports::ReportResult;
use crate::backend::domain::money_format::MoneyFormatter;
use crate::backend::domain::report_table::{LOAD_ERROR_TEXT, NO_DATA_TEXT};
use crate::ui::app_state::TableStatus;

pub const LOADING_TEXT: &str = "กำลังโหลดข้อมูล...";

pub const PERSONNEL_HEADERS: [&str; 10] = [
    "ลำดับ",
    "คำนำหน้า",
    "ชื่อ-นามสกุล",
    "วันเกิด",
    "วันที่เริ่มทำงาน",
    "เบอร์โทร",
    "ที่อยู่",
    "ไอดีไลน์",
    "เฟซบุ๊ก",
    "หมายเหตุ",
];

pub const SAVINGS_HEADERS: [&str; 6] = ["ลำดับ", "ชื่อ-นามสกุล", "เดือน", "ปี", "จำนวนเงิน", "หมายเหตุ"];

/// Lay `rows` out under `headers` with columns padded to their widest cell
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(display_width(cell));
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// Placeholder line for a table that has no rows to show, if any
fn status_placeholder(status: TableStatus, row_count: usize) -> Option<&'static str> {
    match status {
        TableStatus::Loading => Some(LOADING_TEXT),
        TableStatus::Error => Some(LOAD_ERROR_TEXT),
        TableStatus::Empty => Some(NO_DATA_TEXT),
        TableStatus::Ready if row_count == 0 => Some(NO_DATA_TEXT),
        TableStatus::Ready => None,
    }
}

pub fn render_personnel(rows: &[PersonnelRow], status: TableStatus) -> String {
    if let Some(placeholder) = status_placeholder(status, rows.len()) {
        return format!("{}\n{}", render_table(&PERSONNEL_HEADERS, &[]), placeholder);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.no.clone(),
                r.title.clone(),
                r.name.clone(),
                r.birthday.clone(),
                r.workday.clone(),
                r.phone.clone(),
                r.address.clone(),
                r.idline.clone(),
                r.fb.clone(),
                r.remark.clone(),
            ]
        })
        .collect();
    render_table(&PERSONNEL_HEADERS, &cells)
}

pub fn report_cells(rows: &[ReportRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.no.clone(),
                r.person_name.clone(),
                r.month.clone(),
                r.year.clone(),
                r.formatted_amount.clone(),
                r.remark.clone(),
            ]
        })
        .collect()
}

/// Selector options, the table and the summary block
pub fn render_report(report: &ReportResult, status: TableStatus) -> String {
    let mut out = Vec::new();

    out.push(format!(
        "ปี: {}  (ตัวเลือก: {})",
        report.filter.year,
        if report.years.is_empty() {
            "-".to_string()
        } else {
            report.years.join(", ")
        }
    ));
    out.push(format!("เดือน: {}", report.filter.month));
    out.push(format!(
        "บุคลากร: {}  (ตัวเลือก: {})",
        report.filter.person_no,
        if report.persons.is_empty() {
            "-".to_string()
        } else {
            report
                .persons
                .iter()
                .map(|p| p.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    ));
    out.push(String::new());

    match status_placeholder(status, report.rows.len()) {
        Some(placeholder) => {
            out.push(render_table(&SAVINGS_HEADERS, &[]));
            out.push(placeholder.to_string());
        }
        None => out.push(render_table(&SAVINGS_HEADERS, &report_cells(&report.rows))),
    }

    out.push(String::new());
    out.push(format!("จำนวนรายการ: {}", report.summary.record_count));
    out.push(format!("ยอดเงินออมรวม: {}", report.summary.total_amount));
    out.push(format!("ยอดเงินออมเฉลี่ย: {}", report.summary.average_amount));
    out.join("\n")
}

/// Summary cards and the two ranking lists behind the charts
pub fn render_dashboard(metrics: &DashboardMetrics, formatter: &MoneyFormatter) -> String {
    let mut out = vec![
        format!("แดชบอร์ด ปี {}", metrics.year),
        format!("บุคลากรทั้งหมด: {} คน", metrics.total_personnel),
        format!("ยอดเงินออมรวม: {}", formatter.format(metrics.total_savings, false)),
        format!(
            "ยอดเงินออมเฉลี่ยต่อคน: {}",
            formatter.format(metrics.average_per_person, false)
        ),
        format!("จำนวนรายการออม: {}", metrics.savings_record_count),
        String::new(),
        format!("ยอดเงินออมรายเดือน ปี {}", metrics.year),
    ];

    for month in &metrics.monthly_totals {
        out.push(format!(
            "  {} {}",
            pad(&month.label, 12),
            formatter.format(month.total, false)
        ));
    }

    out.push(String::new());
    out.push("ผู้ออมสูงสุด".to_string());
    if metrics.top_persons.is_empty() {
        out.push(format!("  {}", NO_DATA_TEXT));
    }
    for (rank, person) in metrics.top_persons.iter().enumerate() {
        out.push(format!(
            "  {}. {} {}",
            rank + 1,
            pad(&person.person_name, 20),
            formatter.format(person.total, false)
        ));
    }
    out.join("\n")
}

pub fn render_chart_files(handles: &[ChartHandle]) -> String {
    handles
        .iter()
        .filter_map(|h| {
            h.location
                .as_ref()
                .map(|path| format!("{}: {}", h.chart.name(), path.display()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A notice as a boxed dialog with its single button
pub fn render_notice(notice: &Notice) -> String {
    let icon = match notice.level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Info => "ℹ️",
        NoticeLevel::Warning => "⚠️",
        NoticeLevel::Error => "❌",
    };

    let mut lines = vec![format!("{} {}", icon, notice.title)];
    if let Some(text) = &notice.text {
        lines.extend(text.lines().map(|l| format!("   {}", l)));
    }
    lines.push(format!("   [{}]", notice.confirm_label()));
    lines.join("\n")
}

/// Character count; good enough for aligning Thai and Latin text in a terminal
fn display_width(text: &str) -> usize {
    text.chars()
        .filter(|c| !is_thai_combining(*c))
        .count()
}

/// Thai vowel and tone marks drawn above or below the base character
fn is_thai_combining(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E3A}' | '\u{0E47}'..='\u{0E4E}')
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}
