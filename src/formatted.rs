//! Fully formatted calendar dates: "05/09/1999", "1999-09-01", "12/99".

use regex::Regex;
use std::sync::LazyLock;

use crate::types::DateRecord;

// ── Regex patterns ─────────────────────────────────────────────────
//
// Tried in order; the index of the first pattern that yields a year decides
// which field is read as the year.
//   0: dd.mm.yyyy    05/09/1999
//   1: yyyy.mm.dd    1999-09-01
//   2: lenient       1/1/200, 99/09/01

static RE_DAY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}.\d{2}.\d{4}\b").unwrap());

static RE_YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}.\d{2}.\d{2}\b").unwrap());

static RE_LENIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,4}.\d{1,2}.\d{1,4}\b").unwrap());

static RE_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}/\d{2}\b").unwrap());

static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    DayFirst,
    YearFirst,
    Lenient,
}

fn widen_two_digit(year: i64) -> i64 {
    if year < 100 { 1900 + year } else { year }
}

/// Pick the year out of three numeric fields.
fn year_field(fields: [i64; 3], layout: Layout) -> Option<i64> {
    let [first, second, third] = fields;
    match layout {
        Layout::DayFirst => {
            if first > 31 || second > 31 || (first > 12 && second > 12) {
                return None;
            }
            Some(third)
        }
        Layout::YearFirst => {
            if third > 31 || second > 31 || (third > 12 && second > 12) {
                return None;
            }
            Some(first)
        }
        Layout::Lenient => {
            if third < 32 && second < 32 && first > 31 && (third < 13 || second < 13) {
                Some(widen_two_digit(first))
            } else if third < 32 && first < 32 && second > 31 && (third < 13 || first < 13) {
                Some(widen_two_digit(second))
            } else if first < 32 && second < 32 && (first < 13 || second < 13) {
                Some(widen_two_digit(third))
            } else {
                None
            }
        }
    }
}

/// Year of one matched date, if it splits into exactly three fields.
fn matched_year(text: &str, layout: Layout) -> Option<i64> {
    let parts: Vec<&str> = RE_NON_WORD.split(text).collect();
    if parts.len() != 3 {
        return None;
    }
    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    year_field(fields, layout).filter(|&y| y != 0)
}

/// Year interval of a formatted date. The first match gives the start, the
/// last match (if several) gives the end.
pub fn match_formatted(input: &str) -> Option<(i64, i64)> {
    let text = input
        .split('-')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("-");

    let patterns = [
        (&*RE_DAY_FIRST, Layout::DayFirst),
        (&*RE_YEAR_FIRST, Layout::YearFirst),
        (&*RE_LENIENT, Layout::Lenient),
    ];
    for (re, layout) in patterns {
        let found: Vec<&str> = re.find_iter(&text).map(|m| m.as_str()).collect();
        let Some(first) = found.first() else {
            continue;
        };
        let Some(start) = matched_year(first, layout) else {
            continue;
        };
        let end = match found.last() {
            Some(last) if found.len() > 1 => matched_year(last, layout).unwrap_or(start),
            _ => start,
        };
        return Some((start, end));
    }

    let m = RE_MONTH_YEAR.find(&text)?;
    let (month, year) = m.as_str().split_once('/')?;
    let month: i64 = month.parse().ok()?;
    let year: i64 = year.parse().ok()?;
    (month <= 12).then_some((1900 + year, 1900 + year))
}

/// Apply a formatted-date match to the record. Returns true on a match.
pub fn check_formatted(input: &str, record: &mut DateRecord) -> bool {
    record.note("Checking for formatted date...");
    match match_formatted(input) {
        Some((start, end)) => {
            record.set_interval(start, end);
            record.note("Formatted date found");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_first() {
        assert_eq!(match_formatted("05/09/1999"), Some((1999, 1999)));
        assert_eq!(match_formatted("31.12.1850"), Some((1850, 1850)));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(match_formatted("1999-09-01"), Some((1999, 1999)));
        assert_eq!(match_formatted("ca 1973 - 08 - 11"), Some((1973, 1973)));
        assert_eq!(
            match_formatted("1860s, 1877 - 07 - 04 through 1890 - 07 - 03"),
            Some((1877, 1890))
        );
    }

    #[test]
    fn test_lenient() {
        assert_eq!(match_formatted("99/09/01"), Some((1999, 1999)));
        assert_eq!(match_formatted("1/1/200-31/12/299"), Some((200, 299)));
    }

    #[test]
    fn test_month_year() {
        assert_eq!(match_formatted("12/99"), Some((1999, 1999)));
        assert_eq!(match_formatted("13/99"), None);
    }

    #[test]
    fn test_not_formatted() {
        assert_eq!(match_formatted("1789-1790"), None);
        assert_eq!(match_formatted("16th century"), None);
        assert_eq!(match_formatted("2/1873 - 6/1876"), None);
    }
}
