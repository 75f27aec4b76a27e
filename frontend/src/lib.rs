//! Savings tracker client library.
//!
//! Records personnel and monthly savings contributions through a
//! spreadsheet-backed HTTP API and produces dashboards, filtered reports,
//! charts and paginated exports from the fetched data.

pub mod backend;
pub mod config;
pub mod ui;
