//! Report filter pipeline.
//!
//! Applies the year, month and person selectors to the savings collection and
//! derives the options those selectors offer.

use std::collections::HashSet;

use log::{debug, info};
use shared::{FilterValue, PersonOption, ReportFilter, Saving};

use crate::backend::domain::buddhist_calendar::is_month_label;
use crate::backend::domain::sheet_values::sequence_value;

/// Records matching every constrained dimension by exact string equality,
/// newest `no` first. The input is left untouched.
pub fn apply_filter(records: &[Saving], filter: &ReportFilter) -> Vec<Saving> {
    let mut filtered: Vec<Saving> = records
        .iter()
        .filter(|r| filter.year.matches(&r.year))
        .filter(|r| filter.month.matches(&r.month))
        .filter(|r| filter.person_no.matches(&r.person_no))
        .cloned()
        .collect();

    sort_by_sequence_desc(&mut filtered, |r| r.no.as_str());

    debug!(
        "📊 REPORT: Filter year={} month={} person={} kept {} of {} records",
        filter.year,
        filter.month,
        filter.person_no,
        filtered.len(),
        records.len()
    );
    filtered
}

/// Stable numeric sort on a sequence-number field, largest first
pub fn sort_by_sequence_desc<T, F>(items: &mut [T], no: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| sequence_value(no(b)).cmp(&sequence_value(no(a))));
}

/// Distinct non-empty years, largest first
pub fn distinct_years(records: &[Saving]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut years: Vec<String> = records
        .iter()
        .filter(|r| !r.year.is_empty())
        .filter(|r| seen.insert(r.year.as_str()))
        .map(|r| r.year.clone())
        .collect();

    years.sort_by(|a, b| sequence_value(b).cmp(&sequence_value(a)));
    years
}

/// Distinct persons in the order first seen; the first name seen for a number wins
pub fn distinct_persons(records: &[Saving]) -> Vec<PersonOption> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !r.person_no.is_empty() && !r.person_name.is_empty())
        .filter(|r| seen.insert(r.person_no.as_str()))
        .map(|r| PersonOption {
            person_no: r.person_no.clone(),
            person_name: r.person_name.clone(),
        })
        .collect()
}

/// Drop selector values that are no longer offered.
///
/// Runs after every full reload of the savings collection: a year or person
/// that disappeared from the data, or a month that is not a known label, falls
/// back to `All`. Values still on offer are kept.
pub fn reconcile_filter(
    filter: &ReportFilter,
    years: &[String],
    persons: &[PersonOption],
) -> ReportFilter {
    let year = match &filter.year {
        FilterValue::Exact(year) if !years.iter().any(|y| y == year) => {
            info!("📊 REPORT: Year {} no longer present, resetting filter", year);
            FilterValue::All
        }
        other => other.clone(),
    };

    let month = match &filter.month {
        FilterValue::Exact(month) if !is_month_label(month) => FilterValue::All,
        other => other.clone(),
    };

    let person_no = match &filter.person_no {
        FilterValue::Exact(no) if !persons.iter().any(|p| &p.person_no == no) => {
            info!("📊 REPORT: Person {} no longer present, resetting filter", no);
            FilterValue::All
        }
        other => other.clone(),
    };

    ReportFilter {
        year,
        month,
        person_no,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saving(no: &str, person_no: &str, person_name: &str, month: &str, year: &str) -> Saving {
        Saving {
            no: no.to_string(),
            person_no: person_no.to_string(),
            person_name: person_name.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            amount: "100".to_string(),
            remark: String::new(),
        }
    }

    fn sample() -> Vec<Saving> {
        vec![
            saving("9", "1", "สมชาย", "มกราคม", "2566"),
            saving("10", "2", "สมหญิง", "มกราคม", "2567"),
            saving("2", "1", "สมชาย", "กุมภาพันธ์", "2567"),
            saving("x", "3", "มานี", "มกราคม", "2567"),
        ]
    }

    #[test]
    fn test_wildcard_filter_sorts_numerically() {
        let data = sample();
        let result = apply_filter(&data, &ReportFilter::all());

        let order: Vec<&str> = result.iter().map(|r| r.no.as_str()).collect();
        assert_eq!(order, vec!["10", "9", "2", "x"]);
        assert_eq!(result.len(), data.len());
        for record in &data {
            assert!(result.contains(record));
        }
        // input untouched
        assert_eq!(data[0].no, "9");
    }

    #[test]
    fn test_exact_filters_combine() {
        let data = sample();
        let filter = ReportFilter {
            year: FilterValue::parse("2567"),
            month: FilterValue::parse("มกราคม"),
            person_no: FilterValue::All,
        };
        let result = apply_filter(&data, &filter);
        let order: Vec<&str> = result.iter().map(|r| r.no.as_str()).collect();
        assert_eq!(order, vec!["10", "x"]);

        let filter = ReportFilter {
            person_no: FilterValue::parse("1"),
            ..ReportFilter::all()
        };
        let result = apply_filter(&data, &filter);
        let order: Vec<&str> = result.iter().map(|r| r.no.as_str()).collect();
        assert_eq!(order, vec!["9", "2"]);
    }

    #[test]
    fn test_filter_uses_exact_equality() {
        let data = sample();
        let filter = ReportFilter {
            year: FilterValue::parse("2567 "),
            ..ReportFilter::all()
        };
        assert!(apply_filter(&data, &filter).is_empty());
    }

    #[test]
    fn test_distinct_years() {
        let mut data = sample();
        data.push(saving("11", "1", "สมชาย", "มกราคม", ""));
        data.push(saving("12", "1", "สมชาย", "มกราคม", "2565"));

        assert_eq!(distinct_years(&data), vec!["2567", "2566", "2565"]);
        assert!(distinct_years(&[]).is_empty());
    }

    #[test]
    fn test_distinct_persons_first_seen() {
        let mut data = sample();
        data.push(saving("20", "1", "สมชาย ใจดี", "มกราคม", "2567"));
        data.push(saving("21", "", "ไม่มีเลข", "มกราคม", "2567"));

        let persons = distinct_persons(&data);
        let labels: Vec<String> = persons.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["1 - สมชาย", "2 - สมหญิง", "3 - มานี"]);
    }

    #[test]
    fn test_reconcile_filter_resets_missing_values() {
        let data = sample();
        let years = distinct_years(&data);
        let persons = distinct_persons(&data);

        let filter = ReportFilter {
            year: FilterValue::parse("2560"),
            month: FilterValue::parse("มกราคม"),
            person_no: FilterValue::parse("2"),
        };
        let reconciled = reconcile_filter(&filter, &years, &persons);
        assert_eq!(reconciled.year, FilterValue::All);
        assert_eq!(reconciled.month, FilterValue::parse("มกราคม"));
        assert_eq!(reconciled.person_no, FilterValue::parse("2"));

        let filter = ReportFilter {
            year: FilterValue::parse("2567"),
            month: FilterValue::parse("Jan"),
            person_no: FilterValue::parse("99"),
        };
        let reconciled = reconcile_filter(&filter, &years, &persons);
        assert_eq!(reconciled.year, FilterValue::parse("2567"));
        assert_eq!(reconciled.month, FilterValue::All);
        assert_eq!(reconciled.person_no, FilterValue::All);
    }
}
