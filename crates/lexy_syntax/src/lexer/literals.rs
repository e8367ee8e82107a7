//! Literal scanning helpers: date literals.
//!
//! A date literal is written `d"2024-12-18"` or `d"2024-12-18T13:05:09"`. The value is validated here (month
//! range, days per month, leap years) so later stages can treat it as well-formed.

use std::fmt;

/// Calendar date plus time of day, no time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeLiteral {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeLiteral {
    /// Parse the text between the quotes of a date literal.
    pub fn parse(text: &str) -> Result<Self, String> {
        let (date, time) = match text.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        };

        let [year, month, day] = split_fields::<3>(date, '-').ok_or_else(|| invalid(text))?;
        let (hour, minute, second) = match time {
            Some(time) => {
                let [h, m, s] = split_fields::<3>(time, ':').ok_or_else(|| invalid(text))?;
                (h, m, s)
            }
            None => (0, 0, 0),
        };

        let year = u16::try_from(year).map_err(|_| invalid(text))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid date literal '{text}': month {month} out of range."));
        }
        let max_day = days_in_month(year, month as u8);
        if day == 0 || day > u32::from(max_day) {
            return Err(format!("Invalid date literal '{text}': day {day} out of range."));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(format!("Invalid date literal '{text}': time out of range."));
        }

        Ok(Self {
            year,
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        })
    }
}

impl fmt::Display for DateTimeLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d\"{:04}-{:02}-{:02}T{:02}:{:02}:{:02}\"",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn invalid(text: &str) -> String {
    format!("Invalid date literal '{text}'. Expected 'yyyy-MM-dd' or 'yyyy-MM-ddTHH:mm:ss'.")
}

fn split_fields<const N: usize>(text: &str, separator: char) -> Option<[u32; N]> {
    let mut fields = [0u32; N];
    let mut parts = text.split(separator);
    for field in fields.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        *field = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_only() {
        let date = DateTimeLiteral::parse("2024-02-29").unwrap();
        assert_eq!((date.year, date.month, date.day), (2024, 2, 29));
        assert_eq!(date.to_string(), "d\"2024-02-29T00:00:00\"");
    }

    #[test]
    fn test_date_and_time() {
        let date = DateTimeLiteral::parse("2023-12-18T13:05:09").unwrap();
        assert_eq!((date.hour, date.minute, date.second), (13, 5, 9));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(DateTimeLiteral::parse("2023-02-29").is_err());
        assert!(DateTimeLiteral::parse("2023-13-01").is_err());
        assert!(DateTimeLiteral::parse("2023-1").is_err());
        assert!(DateTimeLiteral::parse("2023-01-01T25:00:00").is_err());
        assert!(DateTimeLiteral::parse("yesterday").is_err());
    }
}
