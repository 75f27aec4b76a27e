//! # App State Module
//!
//! Everything the views show, in one place, plus the reducer that moves it
//! forward. `AppState::reduce` is pure: it takes the current state and one
//! `Action` and returns the next state. The backend produces the data; this
//! module only decides what the screen should say about it.
//!
//! ## Responsibilities:
//! - Per-table status (loading, rows, empty, failed)
//! - The report filter and the last report computed for it
//! - Dashboard figures
//! - Next record numbers shown on the forms
//! - Pending modal notices, oldest first

use std::collections::VecDeque;

use shared::{DashboardMetrics, Notice, ReportFilter, Sheet};

use crate::backend::domain::commands::loading::LoadOutcome;
use crate::backend::domain::commands::reports::ReportResult;
use crate::backend::domain::notices;

/// What a data table currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Loading,
    Ready,
    /// Loaded, no rows
    Empty,
    /// Last load failed; the error placeholder is shown
    Error,
}

#[derive(Debug, Clone)]
pub enum Action {
    LoadStarted(Sheet),
    /// Record count on success, error text on failure
    LoadFinished {
        sheet: Sheet,
        result: Result<usize, String>,
    },
    FilterChanged(ReportFilter),
    ReportUpdated(ReportResult),
    DashboardUpdated(DashboardMetrics),
    RecordSaved {
        sheet: Sheet,
        next_no: i64,
        notice: Notice,
    },
    NextNumber {
        sheet: Sheet,
        next_no: i64,
    },
    Notify(Notice),
    DismissNotice,
}

impl Action {
    pub fn from_outcome(outcome: &LoadOutcome) -> Self {
        Action::LoadFinished {
            sheet: outcome.sheet,
            result: outcome.fetched.as_ref().map(|count| *count).map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub personnel_status: TableStatus,
    pub savings_status: TableStatus,
    pub filter: ReportFilter,
    pub report: Option<ReportResult>,
    pub dashboard: Option<DashboardMetrics>,
    pub next_personnel_no: Option<i64>,
    pub next_saving_no: Option<i64>,
    pub notices: VecDeque<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            personnel_status: TableStatus::Loading,
            savings_status: TableStatus::Loading,
            filter: ReportFilter::all(),
            report: None,
            dashboard: None,
            next_personnel_no: None,
            next_saving_no: None,
            notices: VecDeque::new(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, sheet: Sheet) -> TableStatus {
        match sheet {
            Sheet::Personnel => self.personnel_status,
            Sheet::Savings => self.savings_status,
        }
    }

    /// Notice that should be on screen now
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::LoadStarted(sheet) => {
                self.set_status(sheet, TableStatus::Loading);
            }
            Action::LoadFinished { sheet, result } => match result {
                Ok(0) => self.set_status(sheet, TableStatus::Empty),
                Ok(_) => self.set_status(sheet, TableStatus::Ready),
                Err(_) => {
                    self.set_status(sheet, TableStatus::Error);
                    self.notices.push_back(notices::load_failed(sheet));
                }
            },
            Action::FilterChanged(filter) => {
                self.filter = filter;
            }
            Action::ReportUpdated(report) => {
                // the report carries the filter after stale values were reset
                self.filter = report.filter.clone();
                self.report = Some(report);
            }
            Action::DashboardUpdated(metrics) => {
                self.dashboard = Some(metrics);
            }
            Action::RecordSaved {
                sheet,
                next_no,
                notice,
            } => {
                self.set_next_no(sheet, next_no);
                self.notices.push_back(notice);
            }
            Action::NextNumber { sheet, next_no } => {
                self.set_next_no(sheet, next_no);
            }
            Action::Notify(notice) => {
                self.notices.push_back(notice);
            }
            Action::DismissNotice => {
                self.notices.pop_front();
            }
        }
        self
    }

    fn set_status(&mut self, sheet: Sheet, status: TableStatus) {
        match sheet {
            Sheet::Personnel => self.personnel_status = status,
            Sheet::Savings => self.savings_status = status,
        }
    }

    fn set_next_no(&mut self, sheet: Sheet, next_no: i64) {
        match sheet {
            Sheet::Personnel => self.next_personnel_no = Some(next_no),
            Sheet::Savings => self.next_saving_no = Some(next_no),
        }
    }
}
