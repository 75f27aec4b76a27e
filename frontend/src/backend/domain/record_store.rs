//! In-memory record store.
//!
//! Holds the personnel and savings collections and the personnel lookup index.
//! Collections are only ever replaced whole. Every load of a collection takes a
//! ticket first. A remote result is applied only when its ticket is at least as
//! new as the last remote result applied to that collection, so a slow earlier
//! fetch cannot overwrite a newer snapshot. A cache paint is applied only while
//! no remote result from the same or a newer load is in place, and it never
//! moves the remote watermark.
//!
//! The lookup index is rebuilt from remote fetches only. Painting from the local
//! cache updates the collection and leaves the index as it was.

use std::collections::HashMap;

use log::{debug, info};
use shared::{Personnel, Saving, Sheet};

/// Ordering token for one load of one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    sheet: Sheet,
    sequence: u64,
}

impl LoadTicket {
    pub fn sheet(&self) -> Sheet {
        self.sheet
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Where a collection being applied came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Cache,
    Remote,
}

#[derive(Debug, Default, Clone, Copy)]
struct TicketCounter {
    issued: u64,
    /// Ticket of the newest remote result applied, 0 for none
    remote_applied: u64,
    /// Whether any result, cached or remote, has been applied
    loaded: bool,
}

impl TicketCounter {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn accept(&mut self, sequence: u64, source: RecordSource) -> bool {
        let accepted = match source {
            RecordSource::Remote => {
                if sequence < self.remote_applied {
                    false
                } else {
                    self.remote_applied = sequence;
                    true
                }
            }
            RecordSource::Cache => sequence > self.remote_applied,
        };
        self.loaded |= accepted;
        accepted
    }
}

#[derive(Debug, Default)]
pub struct RecordStore {
    personnel: Vec<Personnel>,
    savings: Vec<Saving>,
    personnel_index: HashMap<String, Personnel>,
    personnel_tickets: TicketCounter,
    savings_tickets: TicketCounter,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a load that is about to start
    pub fn begin_load(&mut self, sheet: Sheet) -> LoadTicket {
        let sequence = match sheet {
            Sheet::Personnel => self.personnel_tickets.issue(),
            Sheet::Savings => self.savings_tickets.issue(),
        };
        debug!("🗃️ STORE: Issued ticket {} for {}", sequence, sheet);
        LoadTicket { sheet, sequence }
    }

    /// Replace the personnel collection. Returns false when the result was stale
    /// and got dropped.
    pub fn apply_personnel(
        &mut self,
        ticket: LoadTicket,
        records: Vec<Personnel>,
        source: RecordSource,
    ) -> bool {
        debug_assert_eq!(ticket.sheet, Sheet::Personnel);
        if !self.personnel_tickets.accept(ticket.sequence, source) {
            info!(
                "🗃️ STORE: Dropping stale personnel {:?} result (ticket {}, remote applied {})",
                source, ticket.sequence, self.personnel_tickets.remote_applied
            );
            return false;
        }

        if source == RecordSource::Remote {
            self.personnel_index = Self::build_index(&records);
        }
        debug!(
            "🗃️ STORE: Applied {} personnel records from {:?}",
            records.len(),
            source
        );
        self.personnel = records;
        true
    }

    /// Replace the savings collection. Returns false when the result was stale
    /// and got dropped.
    pub fn apply_savings(
        &mut self,
        ticket: LoadTicket,
        records: Vec<Saving>,
        source: RecordSource,
    ) -> bool {
        debug_assert_eq!(ticket.sheet, Sheet::Savings);
        if !self.savings_tickets.accept(ticket.sequence, source) {
            info!(
                "🗃️ STORE: Dropping stale savings {:?} result (ticket {}, remote applied {})",
                source, ticket.sequence, self.savings_tickets.remote_applied
            );
            return false;
        }

        debug!(
            "🗃️ STORE: Applied {} savings records from {:?}",
            records.len(),
            source
        );
        self.savings = records;
        true
    }

    pub fn personnel(&self) -> &[Personnel] {
        &self.personnel
    }

    pub fn savings(&self) -> &[Saving] {
        &self.savings
    }

    /// Savings collection, or `None` while no load has been applied yet
    pub fn loaded_savings(&self) -> Option<&[Saving]> {
        if self.savings_tickets.loaded {
            Some(&self.savings)
        } else {
            None
        }
    }

    pub fn personnel_index(&self) -> &HashMap<String, Personnel> {
        &self.personnel_index
    }

    pub fn lookup_person(&self, person_no: &str) -> Option<&Personnel> {
        self.personnel_index.get(person_no)
    }

    /// Headcount shown on the dashboard and used for averages: people in the
    /// lookup index, so it follows remote fetches only
    pub fn personnel_count(&self) -> usize {
        self.personnel_index.len()
    }

    fn build_index(records: &[Personnel]) -> HashMap<String, Personnel> {
        records
            .iter()
            .filter(|p| !p.no.is_empty())
            .map(|p| (p.no.clone(), p.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(no: &str, name: &str) -> Personnel {
        Personnel {
            no: no.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn saving(no: &str) -> Saving {
        Saving {
            no: no.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_remote_apply_rebuilds_index() {
        let mut store = RecordStore::new();
        let ticket = store.begin_load(Sheet::Personnel);
        assert!(store.apply_personnel(
            ticket,
            vec![person("1", "สมชาย"), person("", "ไม่มีเลข")],
            RecordSource::Remote
        ));

        assert_eq!(store.personnel().len(), 2);
        assert_eq!(store.personnel_index().len(), 1);
        assert_eq!(store.lookup_person("1").map(|p| p.name.as_str()), Some("สมชาย"));
        assert!(store.lookup_person("").is_none());
    }

    #[test]
    fn test_cache_apply_keeps_index() {
        let mut store = RecordStore::new();
        let ticket = store.begin_load(Sheet::Personnel);
        store.apply_personnel(ticket, vec![person("1", "สมชาย")], RecordSource::Cache);

        assert_eq!(store.personnel().len(), 1);
        assert!(store.personnel_index().is_empty());

        // remote result of the same load still applies
        store.apply_personnel(ticket, vec![person("2", "สมหญิง")], RecordSource::Remote);
        assert_eq!(store.personnel()[0].no, "2");
        assert!(store.lookup_person("2").is_some());
        assert!(store.lookup_person("1").is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut store = RecordStore::new();
        let first = store.begin_load(Sheet::Savings);
        let second = store.begin_load(Sheet::Savings);

        assert!(store.loaded_savings().is_none());
        assert!(store.apply_savings(second, vec![saving("1"), saving("2")], RecordSource::Remote));
        assert_eq!(store.loaded_savings().map(|s| s.len()), Some(2));
        assert!(!store.apply_savings(first, vec![saving("1")], RecordSource::Remote));
        assert_eq!(store.savings().len(), 2);
    }

    #[test]
    fn test_cache_paint_does_not_block_older_remote_result() {
        let mut store = RecordStore::new();
        let first = store.begin_load(Sheet::Savings);
        let second = store.begin_load(Sheet::Savings);

        // second load paints the cache, then its fetch fails
        assert!(store.apply_savings(second, vec![saving("1")], RecordSource::Cache));
        assert_eq!(store.loaded_savings().map(|s| s.len()), Some(1));

        // first load's fetch still lands
        assert!(store.apply_savings(first, vec![saving("1"), saving("2")], RecordSource::Remote));
        assert_eq!(store.savings().len(), 2);
    }

    #[test]
    fn test_cache_paint_never_replaces_remote_result() {
        let mut store = RecordStore::new();
        let first = store.begin_load(Sheet::Personnel);
        let second = store.begin_load(Sheet::Personnel);

        assert!(store.apply_personnel(second, vec![person("1", "สมชาย")], RecordSource::Remote));
        assert!(!store.apply_personnel(first, Vec::new(), RecordSource::Cache));
        assert!(!store.apply_personnel(second, Vec::new(), RecordSource::Cache));
        assert_eq!(store.personnel().len(), 1);
        assert_eq!(store.personnel_count(), 1);

        // a newer load may still paint before its own fetch
        let third = store.begin_load(Sheet::Personnel);
        assert!(store.apply_personnel(third, vec![person("1", "สมชาย")], RecordSource::Cache));
    }

    #[test]
    fn test_collections_have_independent_tickets() {
        let mut store = RecordStore::new();
        let personnel = store.begin_load(Sheet::Personnel);
        let savings = store.begin_load(Sheet::Savings);
        let _newer_savings = store.begin_load(Sheet::Savings);

        assert_eq!(personnel.sequence(), 1);
        assert_eq!(savings.sequence(), 1);
        assert!(store.apply_personnel(personnel, vec![person("1", "A")], RecordSource::Remote));
        assert!(store.apply_savings(savings, vec![saving("1")], RecordSource::Remote));
        assert_eq!(store.personnel_count(), 1);
    }
}
