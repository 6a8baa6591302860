//! Century and millennium references: "16th century", "third millennium
//! bc", "the turn of the 20th century".

use crate::lexicon::{is_bc_marker, part_index, spelled_ordinal, PeriodUnit, SplitWord};
use crate::normalize::strip_punct;
use crate::numbers::{contains_digit, extract_number, ordinal_suffix};
use crate::qualifier::{accepts_split, apply_qualifiers, extract_ordinal};
use crate::types::{DateRecord, KeywordState};

/// Window around a period boundary for "turn of the century".
const TURN_WINDOW: i64 = 10;

fn is_period_word(word: &str) -> bool {
    PeriodUnit::from_word(word).is_some()
}

/// Numeral or spelled ordinal: the kind of token that names a period.
fn names_number(word: &str) -> bool {
    contains_digit(word) || spelled_ordinal(word).is_some()
}

fn remove_first(tokens: &mut Vec<String>, word: &str) -> bool {
    match tokens.iter().position(|w| w == word) {
        Some(pos) => {
            tokens.remove(pos);
            true
        }
        None => false,
    }
}

// ── Conversion ─────────────────────────────────────────────────────

/// Set the record to the years covered by period `number` of `unit`.
/// Negative numbers count back from year 0.
pub fn convert_period(record: &mut DateRecord, unit: PeriodUnit, number: i64, turn: bool) {
    let span = unit.span();
    let bc = i64::from(number < 0);
    let ad = 1 - bc;
    if turn {
        let boundary = (number - ad) * span;
        record.set_interval(boundary - TURN_WINDOW, boundary + TURN_WINDOW);
    } else {
        record.set_interval((number - ad) * span + ad, (number + bc) * span - bc);
    }
}

/// "16th century", "3rd millennium bc (early)". `ad` appends " ad" to
/// positive periods, used when the other side of a range is BC.
pub fn render_period(number: i64, unit: PeriodUnit, keywords: &KeywordState, ad: bool) -> String {
    let era = if number < 0 {
        " bc"
    } else if ad {
        " ad"
    } else {
        ""
    };
    let mut out = format!(
        "{}{} {}{}{}",
        number.abs(),
        ordinal_suffix(number),
        unit.as_str(),
        era,
        keywords.describe()
    );
    if keywords.turn {
        out.push_str(" (turn)");
    }
    out
}

// ── Detection ──────────────────────────────────────────────────────

/// Scan the whole element for qualifiers belonging to the period named by
/// `period_word`. Another number, "dynasty" or "period" resets what was
/// collected so far; the scan stops at the period word when a further
/// period keyword follows it.
fn check_period_keywords(tokens: &[String], period_word: &str, keywords: &mut KeywordState) -> bool {
    for (idx, word) in tokens.iter().enumerate() {
        if word == "active" {
            continue;
        }
        let other_number =
            (contains_digit(word) || spelled_ordinal(word).is_some_and(|n| n > 4)) && word != period_word;
        if other_number || word == "dynasty" || word == "period" {
            keywords.clear_qualifiers();
        } else if word == period_word && tokens.iter().skip(idx + 2).any(|w| is_period_word(w)) {
            break;
        } else if part_index(word).is_some() {
            keywords.parts.push(word.clone());
        } else if let Some(split) = SplitWord::from_word(word) {
            if accepts_split(tokens, idx) {
                keywords.split = Some(split);
                extract_ordinal(tokens, idx, keywords);
                if keywords.ordinal.is_none() {
                    keywords.split = None;
                    return false;
                }
            }
        }
    }
    !keywords.parts.is_empty() || (keywords.split.is_some() && keywords.ordinal.is_some())
}

/// Read the period number for the keyword at `idx`: the numeral right
/// before it, else the last numeral before it, else a spelled ordinal.
/// Returns the token the number was read from.
fn parse_period(
    tokens: &[String],
    idx: usize,
    unit: PeriodUnit,
    keywords: &mut KeywordState,
) -> Option<String> {
    let numeral = if idx > 0 && contains_digit(&tokens[idx - 1]) {
        Some(&tokens[idx - 1])
    } else {
        tokens[..idx].iter().rev().find(|w| contains_digit(w))
    };
    let found = numeral.and_then(|w| extract_number(w).map(|n| (n, w.clone())));
    let (mut number, period_word) = match found {
        Some(found) => found,
        None => {
            let spelled = idx
                .checked_sub(1)
                .and_then(|i| spelled_ordinal(&tokens[i]).map(|n| (n, tokens[i].clone())));
            spelled.or_else(|| {
                tokens
                    .iter()
                    .find_map(|w| spelled_ordinal(w).map(|n| (n, w.clone())))
            })?
        }
    };

    if !check_period_keywords(tokens, &period_word, keywords) && tokens[..idx].iter().any(|w| w == "turn") {
        keywords.turn = true;
    }
    if tokens.get(idx + 1).is_some_and(|w| is_bc_marker(&strip_punct(w))) {
        number = -number;
    }
    keywords.set_period(unit, number);
    Some(period_word)
}

/// Drop the tokens the period consumed: its number, its qualifiers and the
/// keyword itself unless another number still leans on it.
fn strip_period_tokens(tokens: &mut Vec<String>, period_word: &str, unit: PeriodUnit, keywords: &KeywordState) {
    remove_first(tokens, period_word);
    if !keywords.parts.is_empty() {
        for word in &keywords.parts {
            if !remove_first(tokens, word) {
                break;
            }
        }
    } else if let Some(split) = keywords.split {
        if remove_first(tokens, split.as_str()) {
            if let Some(word) = &keywords.ordinal_word {
                remove_first(tokens, word);
            }
        }
    }

    if let Some(idx) = tokens.iter().position(|w| w == unit.as_str()) {
        let free_before = |offset: usize| idx < offset || !names_number(&tokens[idx - offset]);
        if tokens.len() == 1 || (free_before(1) && free_before(2)) {
            let negative = keywords.period_number(unit).is_some_and(|n| n < 0);
            if negative && idx + 1 < tokens.len() {
                tokens.remove(idx + 1);
            }
            tokens.remove(idx);
        }
    }
    if keywords.turn {
        tokens.clear();
    }
}

fn find_period(
    tokens: &mut Vec<String>,
    record: &mut DateRecord,
    unit: PeriodUnit,
    keywords: &mut KeywordState,
) -> bool {
    let mut found = None;
    for idx in 1..tokens.len() {
        if tokens[idx] != unit.as_str() {
            continue;
        }
        if let Some(word) = parse_period(tokens, idx, unit, keywords) {
            found = Some(word);
            break;
        }
    }
    let (Some(period_word), Some(number)) = (found, keywords.period_number(unit)) else {
        return false;
    };
    convert_period(record, unit, number, keywords.turn);
    strip_period_tokens(tokens, &period_word, unit, keywords);
    true
}

/// Look for a century (or, failing the word "century", a millennium) in
/// `tokens`. On success the record holds the period's interval, narrowed by
/// its qualifiers, and the consumed tokens are removed from `tokens`.
pub fn search_century_millennium(
    tokens: &mut Vec<String>,
    record: &mut DateRecord,
    keywords: &mut KeywordState,
) -> bool {
    record.note("Checking for keywords...");
    let unit = if tokens.iter().any(|w| w == "century") {
        PeriodUnit::Century
    } else if tokens.iter().any(|w| w == "millennium") {
        PeriodUnit::Millennium
    } else {
        return false;
    };
    if !find_period(tokens, record, unit, keywords) {
        return false;
    }

    apply_qualifiers(record, keywords);
    let Some(number) = keywords.period_number(unit) else {
        return false;
    };
    record.date_english = render_period(number, unit, keywords, false);
    if !keywords.parts.is_empty() {
        record.note(format!("Part keyword has been found: {:?}", keywords.parts));
    }
    if let (Some(split), Some(ordinal)) = (keywords.split, &keywords.ordinal) {
        record.note(format!("Splitting keywords have been found: {ordinal}, {}", split.as_str()));
    }
    record.note(format!("{} has been found: {number}", unit.as_str()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn search(text: &str) -> (Option<(i64, i64)>, Vec<String>, DateRecord, KeywordState) {
        let mut tokens = toks(text);
        let mut record = DateRecord::new("en");
        let mut keywords = KeywordState::default();
        search_century_millennium(&mut tokens, &mut record, &mut keywords);
        (record.interval(), tokens, record, keywords)
    }

    // ── convert_period ───────────────────────────────────────────────

    #[test]
    fn test_convert_period() {
        let mut r = DateRecord::new("en");
        convert_period(&mut r, PeriodUnit::Century, 16, false);
        assert_eq!(r.interval(), Some((1501, 1600)));
        convert_period(&mut r, PeriodUnit::Century, -5, false);
        assert_eq!(r.interval(), Some((-500, -401)));
        convert_period(&mut r, PeriodUnit::Millennium, 2, false);
        assert_eq!(r.interval(), Some((1001, 2000)));
        convert_period(&mut r, PeriodUnit::Millennium, 2, true);
        assert_eq!(r.interval(), Some((990, 1010)));
    }

    #[test]
    fn test_period_width_law() {
        for unit in [PeriodUnit::Century, PeriodUnit::Millennium] {
            let span = unit.span();
            for n in (-30..=30).filter(|n| *n != 0) {
                let mut r = DateRecord::new("en");
                convert_period(&mut r, unit, n, false);
                let (start, end) = r.interval().unwrap();
                assert_eq!(end - start, span - 1, "{n} {}", unit.as_str());
                assert!(start <= end);

                convert_period(&mut r, unit, n, true);
                let (start, end) = r.interval().unwrap();
                assert_eq!(end - start, 2 * TURN_WINDOW, "turn {n} {}", unit.as_str());
            }
        }
    }

    // ── search_century_millennium ────────────────────────────────────

    #[test]
    fn test_plain_century() {
        let (interval, rest, record, _) = search("16th century");
        assert_eq!(interval, Some((1501, 1600)));
        assert!(rest.is_empty());
        assert_eq!(record.date_english, "16th century");
    }

    #[test]
    fn test_qualified_century() {
        let (interval, rest, record, _) = search("late 16th century");
        assert_eq!(interval, Some((1567, 1600)));
        assert!(rest.is_empty());
        assert_eq!(record.date_english, "16th century (late)");

        let (interval, _, _, _) = search("first half 8th century");
        assert_eq!(interval, Some((701, 750)));
    }

    #[test]
    fn test_turn_of_century() {
        let (interval, rest, record, kw) = search("turn 20th century");
        assert_eq!(interval, Some((1890, 1910)));
        assert!(rest.is_empty());
        assert!(kw.turn);
        assert_eq!(record.date_english, "20th century (turn)");
    }

    #[test]
    fn test_millennium_bc() {
        let (interval, rest, record, _) = search("early 3rd millennium b.c");
        assert_eq!(interval, Some((-3000, -2667)));
        assert!(rest.is_empty());
        assert_eq!(record.date_english, "3rd millennium bc (early)");
    }

    #[test]
    fn test_nearest_numeral_wins() {
        let (interval, rest, _, kw) = search("3rd 2nd century bce");
        assert_eq!(interval, Some((-200, -101)));
        assert_eq!(kw.century(), Some(-2));
        assert_eq!(rest, toks("3rd century bce"));
    }

    #[test]
    fn test_spelled_ordinals() {
        let (interval, rest, _, _) = search("first century bc third century ad");
        assert_eq!(interval, Some((-100, -1)));
        assert_eq!(rest, toks("third century ad"));
    }

    #[test]
    fn test_dynasty_resets_qualifiers() {
        let (interval, rest, _, kw) = search("late shang dynasty 13th century");
        assert_eq!(interval, Some((1201, 1300)));
        assert!(kw.parts.is_empty());
        assert_eq!(rest, toks("late shang dynasty"));
    }

    #[test]
    fn test_no_period_number() {
        let (interval, rest, _, _) = search("century");
        assert_eq!(interval, None);
        assert_eq!(rest, toks("century"));

        let (interval, _, _, _) = search("bronze age century");
        assert_eq!(interval, None);
    }
}
