//! Baht currency formatting.
//!
//! Amounts are rounded half away from zero to two decimals, the integer part is
//! grouped in thousands with `,`, and the unit `บาท` is appended when requested.
//! `MoneyFormatter` can also render Thai numerals for printed reports.

/// Currency unit appended after formatted amounts
pub const BAHT_UNIT: &str = "บาท";

/// Digit set used for formatted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    /// Arabic digits with `,` grouping, as in `1,234.50`
    #[default]
    Thai,
    /// Thai numerals with `,` grouping, as in `๑,๒๓๔.๕๐`
    ThaiDigits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoneyFormatter {
    locale: NumberLocale,
}

impl MoneyFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: NumberLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> NumberLocale {
        self.locale
    }

    /// Format `amount` with exactly two decimals; `show_unit` appends " บาท".
    /// Non-finite amounts format as zero.
    pub fn format(&self, amount: f64, show_unit: bool) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let cents = (amount.abs() * 100.0).round() as u128;
        let whole = cents / 100;
        let fraction = cents % 100;

        let mut out = String::new();
        if amount < 0.0 && cents > 0 {
            out.push('-');
        }
        out.push_str(&group_thousands(whole));
        out.push('.');
        out.push_str(&format!("{:02}", fraction));

        if self.locale == NumberLocale::ThaiDigits {
            out = to_thai_digits(&out);
        }
        if show_unit {
            out.push(' ');
            out.push_str(BAHT_UNIT);
        }
        out
    }
}

/// Shorthand for the default formatter with the unit appended
pub fn format_baht(amount: f64) -> String {
    MoneyFormatter::new().format(amount, true)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn to_thai_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) => char::from_u32('๐' as u32 + d).unwrap_or(ch),
            None => ch,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_unit() {
        assert_eq!(format_baht(0.0), "0.00 บาท");
        assert_eq!(format_baht(1234.5), "1,234.50 บาท");
        assert_eq!(format_baht(1_000_000.0), "1,000,000.00 บาท");
        assert_eq!(format_baht(999.999), "1,000.00 บาท");
    }

    #[test]
    fn test_format_without_unit() {
        let formatter = MoneyFormatter::new();
        assert_eq!(formatter.format(100.0, false), "100.00");
        assert_eq!(formatter.format(12.346, false), "12.35");
        assert_eq!(formatter.format(100000.0, false), "100,000.00");
    }

    #[test]
    fn test_negative_and_non_finite() {
        let formatter = MoneyFormatter::new();
        assert_eq!(formatter.format(-1500.0, false), "-1,500.00");
        assert_eq!(formatter.format(-0.001, false), "0.00");
        assert_eq!(formatter.format(f64::NAN, true), "0.00 บาท");
        assert_eq!(formatter.format(f64::INFINITY, false), "0.00");
    }

    #[test]
    fn test_thai_digits() {
        let formatter = MoneyFormatter::with_locale(NumberLocale::ThaiDigits);
        assert_eq!(formatter.format(1234.5, true), "๑,๒๓๔.๕๐ บาท");
        assert_eq!(formatter.locale(), NumberLocale::ThaiDigits);
    }
}
