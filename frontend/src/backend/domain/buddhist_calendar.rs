//! Buddhist-era calendar helpers and date validation.
//!
//! Dates entered on the personnel form are written as `D/M/YYYY` with a
//! Buddhist-era (BE) year, where BE = Gregorian + 543. Month labels used by the
//! savings sheet are the twelve Thai month names in calendar order.
//!
//! ## Key Responsibilities
//! - Conversion between Buddhist-era and Gregorian years
//! - Month label lookup in calendar order
//! - Strict validation of `D/M/YYYY` dates, including month lengths and leap years
//! - The list of selectable years for the savings form

use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use thiserror::Error;

/// Difference between a Buddhist-era year and its Gregorian equivalent
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Earliest Buddhist-era year a form date may carry
pub const MIN_BUDDHIST_YEAR: i32 = 2400;

/// Latest Buddhist-era year a form date may carry
pub const MAX_BUDDHIST_YEAR: i32 = 2600;

/// Thai month names, January first
pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

pub fn to_buddhist_year(gregorian_year: i32) -> i32 {
    gregorian_year + BUDDHIST_ERA_OFFSET
}

pub fn to_gregorian_year(buddhist_year: i32) -> i32 {
    buddhist_year - BUDDHIST_ERA_OFFSET
}

/// Buddhist-era year of today's local date
pub fn current_buddhist_year() -> i32 {
    to_buddhist_year(Local::now().year())
}

/// Thai label for a 1-based month number
pub fn month_label(month: u32) -> Option<&'static str> {
    if (1..=12).contains(&month) {
        Some(THAI_MONTHS[(month - 1) as usize])
    } else {
        None
    }
}

/// 1-based month number for a Thai label
pub fn month_number(label: &str) -> Option<u32> {
    THAI_MONTHS
        .iter()
        .position(|m| *m == label)
        .map(|index| index as u32 + 1)
}

pub fn is_month_label(label: &str) -> bool {
    month_number(label).is_some()
}

/// Gregorian leap year rule
pub fn is_leap_year(gregorian_year: i32) -> bool {
    (gregorian_year % 4 == 0 && gregorian_year % 100 != 0) || (gregorian_year % 400 == 0)
}

/// Number of days in a month of a Gregorian year
pub fn days_in_month(month: u32, gregorian_year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(gregorian_year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Years offered by the savings form: the current year followed by the
/// `previous` years before it, newest first.
pub fn recent_years(current: i32, previous: usize) -> Vec<i32> {
    (0..=previous as i32).map(|offset| current - offset).collect()
}

/// `D/M/YYYY` with a Buddhist-era year, no zero padding
pub fn format_buddhist_date(date: NaiveDate) -> String {
    format!(
        "{}/{}/{}",
        date.day(),
        date.month(),
        to_buddhist_year(date.year())
    )
}

/// Why a `D/M/YYYY` date string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateValidationError {
    #[error("date must be written as D/M/YYYY with a Buddhist-era year")]
    Format,

    #[error("day, month or year is out of range")]
    OutOfRange,

    #[error("day {day} exceeds the {max} days of the month")]
    DayOverflow { day: u32, max: u32 },
}

impl DateValidationError {
    /// Dialog title shown for this failure
    pub fn title(&self) -> &'static str {
        match self {
            DateValidationError::Format => "รูปแบบวันที่ไม่ถูกต้อง",
            DateValidationError::OutOfRange | DateValidationError::DayOverflow { .. } => {
                "วันที่ไม่ถูกต้อง"
            }
        }
    }

    /// Dialog text shown for this failure
    pub fn message(&self) -> &'static str {
        match self {
            DateValidationError::Format => "กรุณากรอกวันที่ในรูปแบบ วัน/เดือน/ปี พ.ศ. เช่น 1/1/2539",
            DateValidationError::OutOfRange => "กรุณาตรวจสอบวัน เดือน และปี พ.ศ. ให้ถูกต้อง",
            DateValidationError::DayOverflow { .. } => "จำนวนวันเกินกว่าที่เดือนนี้มี",
        }
    }
}

/// A date that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddhistDate {
    pub day: u32,
    pub month: u32,
    pub buddhist_year: i32,
}

impl BuddhistDate {
    pub fn gregorian_year(&self) -> i32 {
        to_gregorian_year(self.buddhist_year)
    }
}

/// Validator for `D/M/YYYY` Buddhist-era dates.
///
/// Accepts 1-2 digit day and month and a 4 digit year, nothing else; input is
/// not trimmed. An empty string is valid because both form dates are optional.
pub struct DateValidator;

impl DateValidator {
    pub fn parse(input: &str) -> Result<BuddhistDate, DateValidationError> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 3 {
            return Err(DateValidationError::Format);
        }

        let day_text = parts[0];
        let month_text = parts[1];
        let year_text = parts[2];

        if !Self::is_digits(day_text, 1, 2)
            || !Self::is_digits(month_text, 1, 2)
            || !Self::is_digits(year_text, 4, 4)
        {
            return Err(DateValidationError::Format);
        }

        // Lengths are bounded above, so these parses cannot overflow
        let day: u32 = day_text.parse().map_err(|_| DateValidationError::Format)?;
        let month: u32 = month_text.parse().map_err(|_| DateValidationError::Format)?;
        let buddhist_year: i32 = year_text.parse().map_err(|_| DateValidationError::Format)?;

        if !(1..=12).contains(&month)
            || day < 1
            || !(MIN_BUDDHIST_YEAR..=MAX_BUDDHIST_YEAR).contains(&buddhist_year)
        {
            return Err(DateValidationError::OutOfRange);
        }

        let max = days_in_month(month, to_gregorian_year(buddhist_year));
        if day > max {
            debug!("🗓️ DATE: {} rejected, {} has {} days", input, month, max);
            return Err(DateValidationError::DayOverflow { day, max });
        }

        Ok(BuddhistDate {
            day,
            month,
            buddhist_year,
        })
    }

    pub fn validate(input: &str) -> Result<(), DateValidationError> {
        if input.is_empty() {
            return Ok(());
        }
        Self::parse(input).map(|_| ())
    }

    pub fn is_valid(input: &str) -> bool {
        Self::validate(input).is_ok()
    }

    fn is_digits(text: &str, min: usize, max: usize) -> bool {
        (min..=max).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
    }
}
