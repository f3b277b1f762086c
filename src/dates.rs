//! Lenient calendar-date handling for person records.
//!
//! Dates arrive as free-form strings. Only ISO-like `YYYY`, `YYYY-MM` and
//! `YYYY-MM-DD` prefixes are understood; everything else is "unknown", which
//! sorts before every real date so sibling and root ordering stays total.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?(?:[T ].*)?\s*$").unwrap()
});

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sortable form of a date. `None` from [`birth_key`] orders first.
pub type DateKey = (i32, u32, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateParts {
    pub fn key(&self) -> DateKey {
        (self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }
}

pub fn parse_date(input: &str) -> Option<DateParts> {
    let caps = ISO_DATE_RE.captures(input)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<u32>().ok()?),
        None => None,
    };
    let day = match caps.get(3) {
        Some(d) => Some(d.as_str().parse::<u32>().ok()?),
        None => None,
    };
    if let Some(month) = month
        && !(1..=12).contains(&month)
    {
        return None;
    }
    if let (Some(month), Some(day)) = (month, day)
        && (day == 0 || day > days_in_month(year, month))
    {
        return None;
    }
    Some(DateParts { year, month, day })
}

pub fn birth_key(input: &str) -> Option<DateKey> {
    parse_date(input).map(|parts| parts.key())
}

/// Birth-date ascending, unknown dates first.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    birth_key(a).cmp(&birth_key(b))
}

pub fn format_date(input: Option<&str>) -> String {
    let Some(parts) = input.and_then(parse_date) else {
        return "Unknown".to_string();
    };
    match (parts.month, parts.day) {
        (Some(month), Some(day)) => {
            format!("{} {}, {}", MONTH_NAMES[month as usize - 1], day, parts.year)
        }
        (Some(month), None) => format!("{} {}", MONTH_NAMES[month as usize - 1], parts.year),
        _ => parts.year.to_string(),
    }
}

/// Completed years between `birth` and `death`, or `today` for the living.
pub fn age_at(birth: &str, death: Option<&str>, today: &str) -> Option<i32> {
    let birth = parse_date(birth)?.key();
    let end = match death.and_then(parse_date) {
        Some(parts) => parts.key(),
        None => parse_date(today)?.key(),
    };
    let mut age = end.0 - birth.0;
    if (end.1, end.2) < (birth.1, birth.2) {
        age -= 1;
    }
    Some(age)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
