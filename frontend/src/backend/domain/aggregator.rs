//! Savings aggregation for the dashboard.
//!
//! Reduces the savings collection into the headline figures (total, average per
//! person), the twelve monthly buckets of a year and the top contributors. All
//! operations are pure and never fail; an empty collection yields zeros and
//! empty series.

use std::collections::HashMap;

use log::debug;
use shared::{DashboardMetrics, MonthlyTotal, PersonTotal, Saving};

use crate::backend::domain::buddhist_calendar::THAI_MONTHS;
use crate::backend::domain::sheet_values::{amount_value, parse_int_prefix};

/// Number of contributors shown on the dashboard by default
pub const DEFAULT_TOP_PERSONS: usize = 5;

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub top_persons: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            top_persons: DEFAULT_TOP_PERSONS,
        }
    }
}

#[derive(Clone)]
pub struct SavingsAggregator {
    config: AggregatorConfig,
}

impl SavingsAggregator {
    pub fn new() -> Self {
        Self::with_config(AggregatorConfig::default())
    }

    pub fn with_config(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn top_persons(&self) -> usize {
        self.config.top_persons
    }

    /// Sum of all amounts; unreadable amounts contribute 0
    pub fn total_savings(&self, records: &[Saving]) -> f64 {
        records.iter().map(|r| amount_value(&r.amount)).sum()
    }

    /// `total / personnel_count`, 0 when there is nobody to divide by
    pub fn average_per_person(&self, total: f64, personnel_count: usize) -> f64 {
        if personnel_count == 0 {
            0.0
        } else {
            total / personnel_count as f64
        }
    }

    /// Twelve buckets in calendar order for the given Buddhist-era year.
    ///
    /// A record lands in a bucket when the integer prefix of its `year` equals
    /// `year` and its `month` is exactly the bucket label.
    pub fn monthly_totals(&self, records: &[Saving], year: i32) -> Vec<MonthlyTotal> {
        let mut totals = [0.0_f64; 12];

        for record in records {
            if parse_int_prefix(&record.year) != Some(year as i64) {
                continue;
            }
            if let Some(index) = THAI_MONTHS.iter().position(|m| *m == record.month) {
                totals[index] += amount_value(&record.amount);
            }
        }

        THAI_MONTHS
            .iter()
            .zip(totals.iter())
            .map(|(label, total)| MonthlyTotal {
                label: label.to_string(),
                total: *total,
            })
            .collect()
    }

    /// Largest `n` totals grouped by the `(person_no, person_name)` pair.
    ///
    /// The same number spelled with two different names forms two groups.
    /// Records missing either field are skipped. Equal totals keep the order in
    /// which their groups were first seen.
    pub fn top_person_totals(&self, records: &[Saving], n: usize) -> Vec<PersonTotal> {
        let mut groups: Vec<PersonTotal> = Vec::new();
        let mut positions: HashMap<(&str, &str), usize> = HashMap::new();

        for record in records {
            if record.person_no.is_empty() || record.person_name.is_empty() {
                continue;
            }
            let key = (record.person_no.as_str(), record.person_name.as_str());
            let amount = amount_value(&record.amount);

            match positions.get(&key) {
                Some(&index) => groups[index].total += amount,
                None => {
                    positions.insert(key, groups.len());
                    groups.push(PersonTotal {
                        person_no: record.person_no.clone(),
                        person_name: record.person_name.clone(),
                        total: amount,
                    });
                }
            }
        }

        // sort_by is stable, so ties stay in first-seen order
        groups.sort_by(|a, b| b.total.total_cmp(&a.total));
        groups.truncate(n);
        groups
    }

    /// Everything the dashboard shows, for one Buddhist-era year.
    ///
    /// `records` is `None` when the collection could not be read at all; that
    /// case is reported and treated as an empty collection.
    pub fn dashboard_metrics(
        &self,
        records: Option<&[Saving]>,
        personnel_count: usize,
        year: i32,
    ) -> DashboardMetrics {
        let records: &[Saving] = match records {
            Some(records) => records,
            None => {
                log::warn!("📊 DASHBOARD: No savings collection available, using empty data");
                &[]
            }
        };

        let total_savings = self.total_savings(records);
        let metrics = DashboardMetrics {
            total_personnel: personnel_count,
            total_savings,
            average_per_person: self.average_per_person(total_savings, personnel_count),
            savings_record_count: records.len(),
            year,
            monthly_totals: self.monthly_totals(records, year),
            top_persons: self.top_person_totals(records, self.config.top_persons),
        };

        debug!(
            "📊 DASHBOARD: {} records, total {:.2}, {} people, year {}",
            metrics.savings_record_count, metrics.total_savings, personnel_count, year
        );
        metrics
    }
}

impl Default for SavingsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
