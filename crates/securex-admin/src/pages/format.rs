//! ru-RU number formatting for the dashboard.

const GROUP_SEPARATOR: char = '\u{a0}';

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `1 234 567` (non-breaking spaces).
pub fn format_count(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `1234.5` -> `1 234,50 ₽`.
pub fn format_currency(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{},{:02}{}₽",
        sign,
        group_digits(&(cents / 100).to_string()),
        cents % 100,
        GROUP_SEPARATOR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(45), "45");
        assert_eq!(format_count(1250), "1\u{a0}250");
        assert_eq!(format_count(15780), "15\u{a0}780");
        assert_eq!(format_count(1_234_567), "1\u{a0}234\u{a0}567");
        assert_eq!(format_count(-1000), "-1\u{a0}000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(125000.5), "125\u{a0}000,50\u{a0}₽");
        assert_eq!(format_currency(2450000.75), "2\u{a0}450\u{a0}000,75\u{a0}₽");
        assert_eq!(format_currency(0.0), "0,00\u{a0}₽");
        assert_eq!(format_currency(1234.567), "1\u{a0}234,57\u{a0}₽");
    }
}
