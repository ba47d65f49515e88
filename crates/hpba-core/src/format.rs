//! Display formatting for prices and counts.

/// Group an integer with `,` every three digits: `1234567` -> `1,234,567`.
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `¥5,000`. Fractional yen are rounded to the nearest unit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn yen(value: f64) -> String {
    format!("¥{}", thousands(value.max(0.0).round() as u64))
}

/// Table cell text for an optional price; absent or zero renders as `-`.
#[must_use]
pub fn price_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => yen(v),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(8500), "8,500");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn yen_rounds_to_whole_units() {
        assert_eq!(yen(5000.0), "¥5,000");
        assert_eq!(yen(5333.333), "¥5,333");
        assert_eq!(yen(5333.5), "¥5,334");
    }

    #[test]
    fn price_cell_dashes_missing_and_zero() {
        assert_eq!(price_cell(Some(8000.0)), "¥8,000");
        assert_eq!(price_cell(None), "-");
        assert_eq!(price_cell(Some(0.0)), "-");
    }
}
