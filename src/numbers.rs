//! Numeral helpers: digit/letter splitting, ordinal suffixes, Roman numerals.

use regex::Regex;
use std::sync::LazyLock;

// Maximal runs of digits, and maximal runs of anything that is neither a
// digit nor a space.
static RE_NUM_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^ 0-9]+|[0-9]+").unwrap());

/// Split text into alternating digit and non-digit runs; spaces separate runs
/// and are dropped. "1500bc" → ["1500", "bc"].
pub fn split_num_char(text: &str) -> Vec<String> {
    RE_NUM_CHAR
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn contains_digit(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
}

/// Non-empty and made only of digits.
pub fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

/// Largest numeral read as a date. Longer digit runs are catalogue or
/// inventory numbers, and keeping them out bounds all interval arithmetic.
pub const MAX_NUMERAL: i64 = 10_000_000;

/// A digit run as a number, `None` above [`MAX_NUMERAL`].
pub fn parse_numeral(digits: &str) -> Option<i64> {
    digits.parse::<i64>().ok().filter(|n| *n <= MAX_NUMERAL)
}

/// Value of the first digit run, if any.
pub fn extract_number(word: &str) -> Option<i64> {
    split_num_char(word)
        .into_iter()
        .find(|elem| is_numeric(elem))
        .and_then(|elem| parse_numeral(&elem))
}

/// Run immediately before the first digit run that is not at the start.
pub fn number_prefix(word: &str) -> Option<String> {
    let elems = split_num_char(word);
    (1..elems.len())
        .find(|&idx| is_numeric(&elems[idx]))
        .map(|idx| elems[idx - 1].clone())
}

/// Run immediately after the first digit run that is not at the end.
pub fn number_suffix(word: &str) -> Option<String> {
    let elems = split_num_char(word);
    (0..elems.len().saturating_sub(1))
        .find(|&idx| is_numeric(&elems[idx]))
        .map(|idx| elems[idx + 1].clone())
}

/// Decimal order of magnitude: 1995 → 3, 98 → 1, 0 → -1.
pub fn magnitude(n: i64) -> i32 {
    let mut n = n.unsigned_abs();
    let mut highest = -1;
    while n >= 1 {
        n /= 10;
        highest += 1;
    }
    highest
}

/// English ordinal suffix for a number, sign ignored.
pub fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if 3 < n && n < 21 {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// "16" → "16th"
pub fn ordinal_string(n: i64) -> String {
    format!("{}{}", n.unsigned_abs(), ordinal_suffix(n))
}

// ── Roman numerals ───────────────────────────────────────────────────

fn roman_digit(c: char) -> Option<i64> {
    match c {
        'i' | 'I' => Some(1),
        'v' | 'V' => Some(5),
        'x' | 'X' => Some(10),
        _ => None,
    }
}

pub fn is_roman(word: &str) -> bool {
    word.chars().all(|c| roman_digit(c).is_some())
}

/// Value of a numeral built from I, V and X with the subtractive rule.
pub fn roman_value(word: &str) -> Option<i64> {
    if word.is_empty() || !is_roman(word) {
        return None;
    }
    let digits: Vec<i64> = word.chars().filter_map(roman_digit).collect();
    let mut total = 0;
    for (idx, &value) in digits.iter().enumerate() {
        match digits.get(idx + 1) {
            Some(&next) if next > value => total -= value,
            _ => total += value,
        }
    }
    Some(total)
}
