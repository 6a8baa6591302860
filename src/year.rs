//! Literal years and decades: "1789", "100 BC", "A.H. 1075", "1960s",
//! "before 1975".

use crate::lexicon::{is_bc_marker, is_month, is_ordinal_suffix, HIJRI_MARKERS};
use crate::normalize::strip_punct;
use crate::numbers::{
    contains_digit, extract_number, is_numeric, number_prefix, number_suffix, parse_numeral,
    split_num_char,
};
use crate::qualifier::check_keywords;
use crate::types::{DateRecord, KeywordState};

/// Era and range markers consumed along with the year.
#[derive(Debug, Default)]
struct YearMarks {
    bc: bool,
    hijri: bool,
    /// Decade as written, normalised: "60s" → 1960, "390s bc" → -390
    decade: Option<i64>,
    before: bool,
    after: bool,
}

fn cleaned(tokens: &[String], idx: usize) -> Option<String> {
    tokens.get(idx).map(|w| strip_punct(w))
}

fn cleaned_prev(tokens: &[String], idx: usize) -> Option<String> {
    idx.checked_sub(1).and_then(|i| cleaned(tokens, i))
}

fn hijri_to_gregorian(year: i64) -> i64 {
    (0.970229 * year as f64 + 621.5643) as i64
}

// ── Single-token year ──────────────────────────────────────────────

/// The whole element is one number, or a number with a leading minus.
pub fn check_year_basic(tokens: &[String], record: &mut DateRecord, keywords: &mut KeywordState) -> bool {
    let date = tokens.join(" ");
    let year = if is_numeric(&date) {
        match parse_numeral(&date) {
            Some(y) => y,
            None => return false,
        }
    } else if contains_digit(&date)
        && number_prefix(&date).as_deref() == Some("-")
        && number_suffix(&date).is_none()
    {
        match extract_number(&date) {
            Some(y) => -y,
            None => return false,
        }
    } else {
        return false;
    };

    keywords.year = true;
    record.set_interval(year, year);
    record.is_first_token = true;
    record.is_last_token = true;
    record.date_english = if year < 0 { format!("{} bc", -year) } else { year.to_string() };
    record.note(format!("Year \"{date}\" has been found"));
    true
}

// ── Candidate test ─────────────────────────────────────────────────

/// Whether the numeral at `idx` reads as a year rather than a day, an
/// ordinal, a dynasty number or a fraction count.
pub fn is_year_candidate(tokens: &[String], idx: usize, secondary: bool) -> bool {
    let Some(nbr) = extract_number(&tokens[idx]) else {
        return false;
    };
    let prev = idx.checked_sub(1).map(|i| tokens[i].as_str());
    let next = tokens.get(idx + 1).map(String::as_str);
    let letters_before: usize = tokens[..idx]
        .iter()
        .map(|w| w.chars().filter(|c| c.is_alphabetic()).count())
        .sum();

    if prev == Some("printed") {
        return false;
    }
    if nbr < 32 && (prev.is_some_and(is_month) || next.is_some_and(is_month)) {
        return false;
    }
    if next.is_some_and(is_ordinal_suffix) {
        return false;
    }
    if 0 < nbr && nbr < 22 && tokens.iter().any(|w| w == "century") {
        return false;
    }
    if idx == 0 || nbr > 31 {
        return true;
    }
    if nbr < 21 && prev == Some("dynasty") {
        return false;
    }
    if nbr < 5 && matches!(next, Some("half" | "third" | "quarter")) {
        return false;
    }
    if nbr < 6 && !secondary {
        return false;
    }
    if nbr < 25 && letters_before > 2 {
        return false;
    }
    true
}

// ── Storing ────────────────────────────────────────────────────────

fn correct_decade(record: &mut DateRecord, year_input: i64, marks: &mut YearMarks) {
    let mut year = year_input.div_euclid(10) * 10;
    if 0 < year && year < 100 {
        year += 1900;
    }
    marks.decade = Some(year);
    let whole_century = year_input % 100 == 0;
    match (year < 0, whole_century) {
        (true, true) => record.set_interval(year - 100, year - 1),
        (true, false) => record.set_interval(year - 9, year),
        (false, true) => record.set_interval(year + 1, year + 100),
        (false, false) => record.set_interval(year, year + 9),
    }
}

/// "b" "c" written as separate tokens after the year.
fn spelled_bc_follows(tokens: &[String], idx: usize) -> bool {
    cleaned(tokens, idx + 1).as_deref() == Some("b") && cleaned(tokens, idx + 2).as_deref() == Some("c")
}

/// Apply era markers (BC, minus, Hijri) and before/after clipping.
#[allow(clippy::too_many_arguments)]
fn correct_era(
    record: &mut DateRecord,
    keywords: &mut KeywordState,
    tokens: &[String],
    mut year: i64,
    idx: usize,
    marks: &mut YearMarks,
    suffix: Option<&str>,
    prefix: Option<&str>,
) {
    let next = cleaned(tokens, idx + 1);
    let prev = cleaned_prev(tokens, idx);
    let raw_prev = idx.checked_sub(1).map(|i| tokens[i].as_str());

    if next.as_deref().is_some_and(is_bc_marker)
        || suffix.is_some_and(is_bc_marker)
        || spelled_bc_follows(tokens, idx)
    {
        year = -year;
        marks.bc = true;
    } else if prev.as_deref().is_some_and(is_bc_marker) || prefix.is_some_and(is_bc_marker) {
        year = -year;
        marks.bc = true;
    } else if raw_prev == Some("-") || prefix == Some("-") {
        year = -year;
    } else if next.as_deref().is_some_and(|w| HIJRI_MARKERS.contains(&w)) || suffix == Some("ah") {
        year = hijri_to_gregorian(year);
        marks.hijri = true;
    } else if prev.as_deref() == Some("ah") || prefix == Some("ah") {
        year = hijri_to_gregorian(year);
        marks.hijri = true;
    }

    record.set_interval(year, year);
    if prev.as_deref() == Some("before") || prefix == Some("before") {
        // "before 1900" opens at 1801, not 1901
        record.date_start = Some((year - 1).div_euclid(100) * 100 + 1);
        marks.before = true;
    } else if prev.as_deref() == Some("after") || prefix == Some("after") {
        record.date_end = Some(-(-(year + 1)).div_euclid(100) * 100);
        marks.after = true;
    }
    keywords.year = true;
}

fn store_year(
    tokens: &[String],
    idx: usize,
    record: &mut DateRecord,
    marks: &mut YearMarks,
    keywords: &mut KeywordState,
) {
    let word = &tokens[idx];
    let Some(mut year) = extract_number(word) else {
        return;
    };
    let suffix = number_suffix(word);
    let prefix = number_prefix(word);
    let next = cleaned(tokens, idx + 1);

    if suffix.as_deref() == Some("s") || next.as_deref() == Some("s") {
        if next.as_deref().is_some_and(is_bc_marker) {
            year = -year;
            marks.bc = true;
        }
        correct_decade(record, year, marks);
        keywords.year = true;
    } else if is_numeric(word)
        || suffix.as_deref().is_some_and(|s| matches!(s, "bce" | "bc" | "ad" | "ah"))
        || prefix.is_some()
    {
        correct_era(record, keywords, tokens, year, idx, marks, suffix.as_deref(), prefix.as_deref());
    }
}

// ── Rendering and cleanup ──────────────────────────────────────────

fn render_year(record: &mut DateRecord, marks: &YearMarks, keywords: &KeywordState) {
    let Some((start, end)) = record.interval() else {
        return;
    };
    if let Some(decade) = marks.decade {
        let label = if decade < 0 { format!("{}s bc", -decade) } else { format!("{decade}s") };
        record.date_english = format!("{label}{}", keywords.describe());
    } else if start == end {
        record.date_english = if start < 0 { format!("{} bc", -start) } else { start.to_string() };
    }
}

/// Tokens left for further scanning once the year is consumed. Without a
/// period word in the element only the tokens after the year remain.
fn strip_year_tokens(
    tokens: &[String],
    marks: &mut YearMarks,
    idx_year: usize,
    year_word: &str,
    record: &mut DateRecord,
) -> Vec<String> {
    let rest: &[String] = if tokens.iter().any(|w| w == "century") {
        tokens
    } else {
        if idx_year == 0 {
            record.is_first_token = true;
        }
        if idx_year + 1 == tokens.len() {
            record.is_last_token = true;
        }
        &tokens[idx_year + 1..]
    };

    let mut out = Vec::new();
    for word in rest {
        let c = strip_punct(word);
        if c == "ad" || word == year_word {
            continue;
        }
        if marks.bc && is_bc_marker(&c) {
            marks.bc = false;
        } else if marks.hijri && c == "ah" {
            marks.hijri = false;
        } else if marks.after && c == "after" {
            marks.after = false;
        } else if marks.before && c == "before" {
            marks.before = false;
        } else if marks.decade.is_some() && word == "s" {
            marks.decade = None;
        } else {
            out.push(word.clone());
        }
    }
    out
}

// ── Entry points ───────────────────────────────────────────────────

/// Find a literal year in `tokens` and store it on the record.
///
/// Returns the tokens left after the year and its markers. A numeral of at
/// most 99 that is not the first token (or any such numeral when scanning
/// for a secondary year) is only kept if no larger year follows it.
pub fn check_year(
    tokens: &[String],
    record: &mut DateRecord,
    keywords: &mut KeywordState,
    secondary: bool,
) -> Vec<String> {
    record.note("Check for year...");
    let mut marks = YearMarks::default();
    if check_year_basic(tokens, record, keywords) {
        return Vec::new();
    }

    let mut year_word: Option<&String> = None;
    let mut idx_year = None;
    let mut tentative = false;
    for (idx, word) in tokens.iter().enumerate() {
        if !contains_digit(word) {
            continue;
        }
        if is_year_candidate(tokens, idx, secondary) {
            if !tentative || extract_number(word).is_some_and(|n| n > 99) {
                year_word = Some(word);
                idx_year = Some(idx);
                store_year(tokens, idx, record, &mut marks, keywords);
            }
            let small = record.date_start.is_some_and(|s| 0 < s && s <= 99);
            if keywords.year && small && (idx != 0 || secondary) {
                keywords.year = false;
                tentative = true;
            }
        }
        if keywords.year {
            break;
        }
    }
    if tentative {
        keywords.year = true;
    }
    let (Some(idx_year), Some(year_word)) = (idx_year, year_word) else {
        return tokens.to_vec();
    };
    if !keywords.year {
        return tokens.to_vec();
    }

    render_year(record, &marks, keywords);
    if record.date_start != record.date_end {
        let mut narrowing = KeywordState::default();
        check_keywords(&tokens[..idx_year], record, &mut narrowing);
    }
    let rest = strip_year_tokens(tokens, &mut marks, idx_year, year_word, record);
    if let Some(start) = record.date_start {
        record.note(format!("Year \"{start}\" has been found"));
    }
    rest
}

/// Look for a year glued to letters ("1456lala") by splitting digits from
/// letters first.
pub fn check_hidden_year(
    tokens: &[String],
    record: &mut DateRecord,
    keywords: &mut KeywordState,
) -> Vec<String> {
    record.note("Check for hidden year...");
    let pieces = split_num_char(&tokens.join(" "));
    let has_large = pieces
        .iter()
        .any(|w| is_numeric(w) && w.parse::<i64>().map_or(true, |n| n > 21));
    if !has_large {
        return tokens.to_vec();
    }
    let rest = check_year(&pieces, record, keywords, false);
    if keywords.year {
        if let Some(start) = record.date_start {
            record.note(format!("Hidden year has been found: {start}"));
        }
        rest
    } else {
        tokens.to_vec()
    }
}
