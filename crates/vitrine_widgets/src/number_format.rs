//! Thousands-separated number display
//!
//! The integer part is grouped by threes with a space (`1234567.5` is shown
//! as `1 234 567.5`); the fractional part is kept as is.

/// Format a value for display
pub fn format_number(value: f64) -> String {
    // Display for f64 never uses exponent notation and drops a zero fraction
    format_typed(&value.to_string())
}

/// Re-group user-typed text, ignoring any spacing it already has
///
/// Non-digit characters in the integer part are kept in place, so partially
/// typed input is never discarded.
pub fn format_typed(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (sign, unsigned) = match compact.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", compact.as_str()),
    };
    let (integer, fraction) = match unsigned.find(['.', ',']) {
        Some(at) => unsigned.split_at(at),
        None => (unsigned, ""),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(compact.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }
    grouped.push_str(fraction);
    grouped
}

/// Parse displayed or typed text back into a number
///
/// Spaces are ignored and a comma is accepted as the decimal separator.
pub fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    compact.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1 000");
        assert_eq!(format_number(1234567.0), "1 234 567");
        assert_eq!(format_number(12345.25), "12 345.25");
        assert_eq!(format_number(-4500.0), "-4 500");
    }

    #[test]
    fn test_format_typed_regroups() {
        assert_eq!(format_typed("12 34"), "1 234");
        assert_eq!(format_typed("1234,5"), "1 234,5");
        assert_eq!(format_typed(""), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1 234 567"), Some(1234567.0));
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }
}
