//! Client-side sequence numbering.
//!
//! The sheets API does not assign identifiers, so the next `no` for a collection
//! is one more than the largest numeric `no` already present. Two clients
//! computing the next number concurrently will pick the same value; the sheet
//! accepts duplicates.

use shared::{Personnel, Saving};

use crate::backend::domain::sheet_values::parse_int_prefix;

/// Records that carry a client-assigned sequence number
pub trait SequencedRecord {
    fn sequence_no(&self) -> &str;
}

impl SequencedRecord for Personnel {
    fn sequence_no(&self) -> &str {
        &self.no
    }
}

impl SequencedRecord for Saving {
    fn sequence_no(&self) -> &str {
        &self.no
    }
}

/// `max(no) + 1` over the records; unreadable numbers are skipped and an empty
/// collection yields 1
pub fn next_sequence_number<R: SequencedRecord>(records: &[R]) -> i64 {
    records
        .iter()
        .filter_map(|record| parse_int_prefix(record.sequence_no()))
        .fold(0, i64::max)
        .saturating_add(1)
}
