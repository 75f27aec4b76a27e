//! Numeric interpretation of spreadsheet cells.
//!
//! Every cell reaches the client as text. Amounts, years and sequence numbers are
//! read with leading-prefix semantics: the longest numeric prefix after leading
//! whitespace is used and anything after it is ignored, so `"12abc"` reads as 12
//! and `"abc"` has no value at all.

/// Parse the longest decimal prefix of `input` (optional sign, digits, fraction,
/// exponent). Returns `None` when no digits are found.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parse the longest integer prefix of `input` (optional sign, decimal digits).
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

/// Monetary value of an amount cell; unreadable or non-finite amounts count as 0
pub fn amount_value(cell: &str) -> f64 {
    match parse_float_prefix(cell) {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Numeric ordering key of a sequence-number cell; unreadable numbers sort as 0
pub fn sequence_value(cell: &str) -> i64 {
    parse_int_prefix(cell).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("100"), Some(100.0));
        assert_eq!(parse_float_prefix("  12.5"), Some(12.5));
        assert_eq!(parse_float_prefix("12abc"), Some(12.0));
        assert_eq!(parse_float_prefix("-3.25"), Some(-3.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("1,000"), Some(1.0));

        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("7"), Some(7));
        assert_eq!(parse_int_prefix(" 42"), Some(42));
        assert_eq!(parse_int_prefix("7.9"), Some(7));
        assert_eq!(parse_int_prefix("-5"), Some(-5));
        assert_eq!(parse_int_prefix("12abc"), Some(12));

        assert_eq!(parse_int_prefix("x"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("+"), None);
    }

    #[test]
    fn test_amount_value_defaults_to_zero() {
        assert_eq!(amount_value("250"), 250.0);
        assert_eq!(amount_value("abc"), 0.0);
        assert_eq!(amount_value(""), 0.0);
        assert_eq!(amount_value("1e400"), 0.0);
    }

    #[test]
    fn test_sequence_value() {
        assert_eq!(sequence_value("10"), 10);
        assert_eq!(sequence_value("x"), 0);
    }
}
