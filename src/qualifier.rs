//! Qualifier words ("early", "mid", "late", "first half", "last quarter")
//! and the interval narrowing they imply.

use crate::lexicon::{is_segment_ordinal, part_index, SplitWord, PART_BOUNDARIES};
use crate::numbers::{contains_digit, extract_number};
use crate::types::{DateRecord, KeywordState, OrdinalMark};

// ── Detection ──────────────────────────────────────────────────────

/// Read the ordinal in front of the fraction word at `idx`.
pub fn extract_ordinal(tokens: &[String], idx: usize, keywords: &mut KeywordState) {
    if idx == 0 {
        return;
    }
    let prev = &tokens[idx - 1];
    if is_segment_ordinal(prev) {
        keywords.ordinal = Some(OrdinalMark::Word(prev.clone()));
        keywords.ordinal_word = Some(prev.clone());
    } else if contains_digit(prev) {
        if let Some(n) = extract_number(prev) {
            keywords.ordinal = Some(OrdinalMark::Number(n));
            keywords.ordinal_word = Some(prev.clone());
        }
    }
}

/// Accept a fraction word at `idx`. "third" only counts when an ordinal
/// word precedes it, otherwise it is a plain ordinal.
pub fn accepts_split(tokens: &[String], idx: usize) -> bool {
    tokens[idx] != "third" || (idx != 0 && is_segment_ordinal(&tokens[idx - 1]))
}

/// Collect qualifiers into `keywords` and return the tokens they did not
/// consume. A fraction word without an ordinal aborts the scan and returns
/// the input unchanged.
pub fn search_keywords(tokens: &[String], keywords: &mut KeywordState) -> Vec<String> {
    let mut remaining = Vec::new();
    let last = tokens.len().saturating_sub(1);

    for (idx, word) in tokens.iter().enumerate() {
        if word == "active" {
            continue;
        }
        match SplitWord::from_word(word) {
            Some(split) if keywords.split.is_none() => {
                if !accepts_split(tokens, idx) {
                    remaining.push(word.clone());
                    continue;
                }
                keywords.split = Some(split);
                extract_ordinal(tokens, idx, keywords);
                if keywords.ordinal.is_none() {
                    keywords.split = None;
                    return tokens.to_vec();
                }
                if idx == last {
                    keywords.ends_at_last_token = true;
                }
                continue;
            }
            _ => {}
        }
        if part_index(word).is_some() {
            keywords.parts.push(word.clone());
            if idx == last {
                keywords.ends_at_last_token = true;
            }
        } else {
            remaining.push(word.clone());
        }
    }

    if keywords.ordinal.is_some() {
        if let Some(word) = &keywords.ordinal_word {
            if let Some(pos) = remaining.iter().position(|w| w == word) {
                remaining.remove(pos);
            }
        }
    }
    remaining
}

// ── Narrowing ──────────────────────────────────────────────────────

/// `count` evenly spaced points from `start` to `end`, floored.
fn boundaries(start: i64, end: i64, count: usize) -> Vec<i64> {
    if count < 2 {
        return vec![start];
    }
    let step = (end - start) as f64 / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                end
            } else {
                (start as f64 + i as f64 * step).floor() as i64
            }
        })
        .collect()
}

/// Narrow the record to one segment (or to the span of several segments)
/// of its interval divided into `count - 1` pieces.
pub fn split_interval(record: &mut DateRecord, count: usize, select: i64, multiple: &[usize]) {
    if select < 0 || select as usize + 1 >= count {
        return;
    }
    let Some((start, end)) = record.interval() else {
        return;
    };
    let points = boundaries(start, end, count);
    let (from, to) = match (multiple.iter().min(), multiple.iter().max()) {
        (Some(&lo), Some(&hi)) => (lo, hi + 1),
        _ => (select as usize, select as usize + 1),
    };
    if to >= points.len() {
        return;
    }
    record.set_interval(points[from], points[to]);
}

/// Apply the active qualifiers to the record's interval. A fraction and a
/// part word together contradict each other; both are dropped.
pub fn apply_qualifiers(record: &mut DateRecord, keywords: &mut KeywordState) {
    if keywords.split.is_some() && !keywords.parts.is_empty() {
        keywords.split = None;
        keywords.parts.clear();
        return;
    }
    if record.interval().is_none() {
        return;
    }
    if let Some(split) = keywords.split {
        let count = split.boundary_count();
        let Some(select) = keywords.ordinal.as_ref().and_then(|o| o.segment_index(count)) else {
            return;
        };
        split_interval(record, count, select, &[]);
    } else if !keywords.parts.is_empty() {
        let indices: Vec<usize> = keywords.parts.iter().filter_map(|w| part_index(w)).collect();
        let Some(&select) = indices.iter().max() else {
            return;
        };
        if indices.len() == 1 {
            split_interval(record, PART_BOUNDARIES, select as i64, &[]);
        } else {
            split_interval(record, PART_BOUNDARIES, select as i64, &indices);
        }
    }
}

/// Detect qualifiers in `tokens`, narrow the record, return what is left.
pub fn check_keywords(
    tokens: &[String],
    record: &mut DateRecord,
    keywords: &mut KeywordState,
) -> Vec<String> {
    let remaining = search_keywords(tokens, keywords);
    apply_qualifiers(record, keywords);
    if !keywords.parts.is_empty() {
        record.note(format!("Part keyword has been found: {:?}", keywords.parts));
    }
    if let (Some(split), Some(ordinal)) = (keywords.split, &keywords.ordinal) {
        record.note(format!("Splitting keywords have been found: {ordinal}, {}", split.as_str()));
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn century_16() -> DateRecord {
        let mut r = DateRecord::new("en");
        r.set_interval(1501, 1600);
        r
    }

    // ── boundaries ───────────────────────────────────────────────────

    #[test]
    fn test_boundaries_floor() {
        assert_eq!(boundaries(1501, 1600, 4), vec![1501, 1534, 1567, 1600]);
        assert_eq!(boundaries(1501, 1600, 3), vec![1501, 1550, 1600]);
        assert_eq!(boundaries(-3000, -2001, 4), vec![-3000, -2667, -2334, -2001]);
    }

    // ── apply_qualifiers ─────────────────────────────────────────────

    #[test]
    fn test_single_part() {
        for (word, expected) in [("early", (1501, 1534)), ("mid", (1534, 1567)), ("late", (1567, 1600))] {
            let mut r = century_16();
            let mut kw = KeywordState::default();
            kw.parts.push(word.into());
            apply_qualifiers(&mut r, &mut kw);
            assert_eq!(r.interval(), Some(expected), "{word}");
        }
    }

    #[test]
    fn test_multiple_parts_span() {
        let mut r = DateRecord::new("en");
        r.set_interval(1901, 2000);
        let mut kw = KeywordState::default();
        kw.parts = vec!["early".into(), "mid".into()];
        apply_qualifiers(&mut r, &mut kw);
        assert_eq!(r.interval(), Some((1901, 1967)));
    }

    #[test]
    fn test_fraction_with_ordinal() {
        let mut r = century_16();
        let mut kw = KeywordState::default();
        search_keywords(&toks("second quarter"), &mut kw);
        apply_qualifiers(&mut r, &mut kw);
        assert_eq!(r.interval(), Some((1525, 1550)));

        let mut r = century_16();
        let mut kw = KeywordState::default();
        search_keywords(&toks("last half"), &mut kw);
        apply_qualifiers(&mut r, &mut kw);
        assert_eq!(r.interval(), Some((1550, 1600)));
    }

    #[test]
    fn test_fraction_and_part_cancel() {
        let mut r = century_16();
        let mut kw = KeywordState::default();
        search_keywords(&toks("early first half"), &mut kw);
        apply_qualifiers(&mut r, &mut kw);
        assert_eq!(r.interval(), Some((1501, 1600)));
        assert!(kw.split.is_none());
        assert!(kw.parts.is_empty());
    }

    #[test]
    fn test_out_of_range_segment_is_noop() {
        let mut r = century_16();
        split_interval(&mut r, 3, 2, &[]);
        assert_eq!(r.interval(), Some((1501, 1600)));
        split_interval(&mut r, 3, -1, &[]);
        assert_eq!(r.interval(), Some((1501, 1600)));
    }

    #[test]
    fn test_segments_partition_interval() {
        let intervals = [(1501, 1600), (-3000, -2001), (-100, -1), (1990, 1999), (1, 2), (5, 5)];
        let counts = [
            SplitWord::Half.boundary_count(),
            SplitWord::Third.boundary_count(),
            SplitWord::Quarter.boundary_count(),
            PART_BOUNDARIES,
        ];
        for (start, end) in intervals {
            for count in counts {
                let segments: Vec<(i64, i64)> = (0..count - 1)
                    .map(|select| {
                        let mut r = DateRecord::new("en");
                        r.set_interval(start, end);
                        split_interval(&mut r, count, select as i64, &[]);
                        r.interval().unwrap()
                    })
                    .collect();
                assert_eq!(segments[0].0, start, "{start}..{end} / {count}");
                assert_eq!(segments[segments.len() - 1].1, end, "{start}..{end} / {count}");
                for (lo, hi) in &segments {
                    assert!(start <= *lo && lo <= hi && *hi <= end, "{start}..{end} / {count}");
                }
                for pair in segments.windows(2) {
                    assert_eq!(pair[0].1, pair[1].0, "{start}..{end} / {count}");
                }
            }
        }
    }

    #[test]
    fn test_every_qualifier_stays_inside() {
        let words = ["early", "mid", "middle", "late"];
        for (start, end) in [(1501, 1600), (-1600, -1501), (1001, 2000)] {
            for word in words {
                let mut r = DateRecord::new("en");
                r.set_interval(start, end);
                let mut kw = KeywordState::default();
                kw.parts.push(word.into());
                apply_qualifiers(&mut r, &mut kw);
                let (lo, hi) = r.interval().unwrap();
                assert!(start <= lo && lo <= hi && hi <= end, "{word} {start}..{end}");
            }
            for fraction in ["half", "third", "quarter"] {
                for ordinal in ["first", "second", "third", "fourth", "last", "latter"] {
                    let mut r = DateRecord::new("en");
                    r.set_interval(start, end);
                    let mut kw = KeywordState::default();
                    search_keywords(&toks(&format!("{ordinal} {fraction}")), &mut kw);
                    apply_qualifiers(&mut r, &mut kw);
                    let (lo, hi) = r.interval().unwrap();
                    assert!(start <= lo && lo <= hi && hi <= end, "{ordinal} {fraction} {start}..{end}");
                }
            }
        }
    }

    // ── search_keywords ──────────────────────────────────────────────

    #[test]
    fn test_search_removes_qualifiers() {
        let mut kw = KeywordState::default();
        let rest = search_keywords(&toks("first half 8th century"), &mut kw);
        assert_eq!(rest, toks("8th century"));
        assert_eq!(kw.split, Some(SplitWord::Half));
        assert_eq!(kw.ordinal, Some(OrdinalMark::Word("first".into())));
        assert!(!kw.ends_at_last_token);
    }

    #[test]
    fn test_search_fraction_without_ordinal_aborts() {
        let mut kw = KeywordState::default();
        let rest = search_keywords(&toks("half 1900"), &mut kw);
        assert_eq!(rest, toks("half 1900"));
        assert!(kw.split.is_none());
    }

    #[test]
    fn test_search_third_alone_is_ordinal() {
        let mut kw = KeywordState::default();
        let rest = search_keywords(&toks("third century"), &mut kw);
        assert_eq!(rest, toks("third century"));
        assert!(kw.split.is_none());
    }

    #[test]
    fn test_search_trailing_part_marks_last_token() {
        let mut kw = KeywordState::default();
        let rest = search_keywords(&toks("early mid"), &mut kw);
        assert!(rest.is_empty());
        assert!(kw.ends_at_last_token);
    }
}
