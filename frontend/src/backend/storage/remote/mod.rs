//! # Remote Storage Module
//!
//! HTTP access to the spreadsheet-backed sheets API.

pub mod sheets_client;

#[cfg(test)]
pub mod fake_sheets;

pub use sheets_client::{parse_collection, SheetsClient};
