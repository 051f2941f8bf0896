//! PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`) parsing. Every field past
//! the 4-digit year is optional; a missing offset means local/unspecified
//! time, which this always resolves against the local timezone.

use chrono::{Local, TimeZone};

pub fn parse_pdf_date(bytes: &[u8]) -> Option<chrono::DateTime<Local>> {
    let s = std::str::from_utf8(bytes).ok()?;
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> u32 {
        digits.get(start..start + len).and_then(|s| s.parse().ok()).unwrap_or(default)
    };

    let year: i32 = digits[..4].parse().ok()?;
    let month = if digits.len() >= 6 { field(4, 2, 1) } else { 1 };
    let day = if digits.len() >= 8 { field(6, 2, 1) } else { 1 };
    let hour = if digits.len() >= 10 { field(8, 2, 0) } else { 0 };
    let minute = if digits.len() >= 12 { field(10, 2, 0) } else { 0 };
    let second = if digits.len() >= 14 { field(12, 2, 0) } else { 0 };

    let rest = &s[digits.len()..];
    let offset_minutes = parse_offset(rest);

    let naive = chrono::NaiveDate::from_ymd_opt(year, month.max(1), day.max(1))?
        .and_hms_opt(hour.min(23), minute.min(59), second.min(59))?;

    match offset_minutes {
        Some(offset) => {
            let fixed = chrono::FixedOffset::east_opt(offset * 60)?;
            let dt = fixed.from_local_datetime(&naive).single()?;
            Some(dt.with_timezone(&Local))
        }
        None => Local.from_local_datetime(&naive).single(),
    }
}

fn parse_offset(rest: &str) -> Option<i32> {
    let mut chars = rest.chars();
    let sign = match chars.next()? {
        '+' => 1,
        '-' => -1,
        'Z' | 'z' => return Some(0),
        _ => return None,
    };
    let tail: String = chars.collect();
    let mut parts = tail.split('\'');
    let hh: i32 = parts.next()?.get(..2)?.parse().ok()?;
    let mm: i32 = parts.next().and_then(|s| s.get(..2)).and_then(|s| s.parse().ok()).unwrap_or(0);
    Some(sign * (hh * 60 + mm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_full_date_with_offset() {
        let dt = parse_pdf_date(b"D:20231225143000+02'00'").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 25);
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn parse_year_only() {
        let dt = parse_pdf_date(b"D:2023").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_pdf_date(b"not a date").is_none());
    }
}
