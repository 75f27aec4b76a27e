//! # Domain Module
//!
//! Business logic of the savings tracker. Nothing here talks to the network or
//! the file system directly; remote access goes through the `SheetsApi` trait
//! and rendered output goes through the `ChartSink` and `PageSink` traits.
//!
//! ## Module Organization
//!
//! - **aggregator**: dashboard totals, averages, monthly buckets, top contributors
//! - **report_filter**: report filtering, ordering and selector options
//! - **report_table**: display rows and summary statistics
//! - **money_format**: baht amounts with two decimals and grouping
//! - **sequence**: next record number of a collection
//! - **buddhist_calendar**: Thai months, Buddhist-era years and the date validator
//! - **form_validation**: personnel and savings form checks
//! - **personnel_service** / **savings_service**: creating records through the API
//! - **record_store**: current collections, lookup index and load ordering
//! - **chart_service**: chart series shaping and chart lifecycle
//! - **export_service**: report documents, pagination and CSV
//!
//! ## Business Rules
//!
//! - Sheet values are strings; unreadable amounts count as zero
//! - Reports list the newest record number first
//! - Collections are replaced whole, never patched
//! - Forms that fail validation never reach the sheets API

pub mod aggregator;
pub mod buddhist_calendar;
pub mod chart_service;
pub mod commands;
pub mod errors;
pub mod export_service;
pub mod form_validation;
pub mod money_format;
pub mod notices;
pub mod personnel_service;
pub mod record_store;
pub mod report_filter;
pub mod report_table;
pub mod savings_service;
pub mod sequence;
pub mod sheet_values;

pub use aggregator::SavingsAggregator;
pub use chart_service::{ChartAdapter, ChartHandle, ChartId, ChartSink};
pub use errors::ClientError;
pub use export_service::{ExportConfig, ExportService, Page, PageSink, ReportDocument};
pub use form_validation::{FormError, FormValidator, TitleChoice};
pub use money_format::MoneyFormatter;
pub use personnel_service::PersonnelService;
pub use record_store::RecordStore;
pub use report_table::ReportTableService;
pub use savings_service::SavingsService;
