//! # UI Module
//!
//! Terminal presentation: the application state with its reducer, and the
//! text rendering of tables, dashboard and notices.

pub mod app_state;
pub mod render;

pub use app_state::{Action, AppState, TableStatus};
