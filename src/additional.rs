//! Second dates hiding in what is left of an element once the first one
//! matched: "16th century bronze age 17th century", "1876, 2 1873".

use crate::correction::check_error_elem;
use crate::lexicon::spelled_ordinal;
use crate::numbers::contains_digit;
use crate::period::search_century_millennium;
use crate::types::{Candidate, DateRecord, KeywordState};
use crate::year::check_year;

fn merge_into(record: &mut DateRecord, keywords: &mut KeywordState, second: &Candidate) {
    let merged = check_error_elem(record, keywords, second);
    *record = merged.record;
    *keywords = merged.keywords;
}

/// A further year (or century) after a literal year.
fn check_additional_year(tokens: &mut Vec<String>, record: &mut DateRecord, keywords: &mut KeywordState) {
    let Some(idx) = tokens
        .iter()
        .position(|w| contains_digit(w) || spelled_ordinal(w).is_some())
    else {
        return;
    };

    let mut second = Candidate {
        record: DateRecord::new(&record.language),
        keywords: KeywordState::default(),
    };
    check_year(tokens, &mut second.record, &mut second.keywords, true);
    record.notes.append(&mut second.record.notes);

    if second.keywords.year {
        let smaller = match (second.record.date_start, record.date_start) {
            (Some(s), Some(p)) => 0 < s && s < p,
            _ => false,
        };
        // "1934 Dynasty 45": a smaller number away from the year is unrelated
        if smaller && idx != 0 {
            return;
        }
        record.is_last_token = true;
        second.record.is_first_token = true;
        merge_into(record, keywords, &second);
    }
    if tokens.iter().any(|w| w == "century") {
        search_century_millennium(tokens, &mut second.record, &mut second.keywords);
        record.notes.append(&mut second.record.notes);
    }
    keywords.secondary = Some(Box::new(second));
}

/// Scan the rest of an element for another date and merge it.
pub fn check_additional_date(tokens: &mut Vec<String>, record: &mut DateRecord, keywords: &mut KeywordState) {
    let has = |word: &str| tokens.iter().any(|w| w == word);
    let repeated_period = (keywords.century().is_some() && has("century"))
        || (keywords.millennium().is_some() && has("millennium"));

    if repeated_period {
        record.note("Checking for additional century or millennium...");
        let mut second = Candidate {
            record: DateRecord::new(&record.language),
            keywords: KeywordState::default(),
        };
        search_century_millennium(tokens, &mut second.record, &mut second.keywords);
        record.notes.append(&mut second.record.notes);
        merge_into(record, keywords, &second);
        keywords.secondary = Some(Box::new(second));
    } else if keywords.year {
        record.note("Checking for additional year or century...");
        check_additional_year(tokens, record, keywords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use date_types::DateFlag;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn primary_year(y: i64) -> (DateRecord, KeywordState) {
        let mut record = DateRecord::new("en");
        record.set_interval(y, y);
        let keywords = KeywordState { year: true, ..KeywordState::default() };
        (record, keywords)
    }

    #[test]
    fn test_second_century_extends_range() {
        let mut tokens = toks("16th century bronze age 17th century");
        let mut record = DateRecord::new("en");
        let mut keywords = KeywordState::default();
        assert!(search_century_millennium(&mut tokens, &mut record, &mut keywords));
        assert_eq!(tokens, toks("bronze age 17th century"));

        check_additional_date(&mut tokens, &mut record, &mut keywords);
        assert_eq!(record.interval(), Some((1501, 1700)));
        assert_eq!(record.date_english, "16th century - 17th century");
        let second = keywords.secondary.as_deref().map(|c| c.record.interval());
        assert_eq!(second, Some(Some((1601, 1700))));
    }

    #[test]
    fn test_earlier_year_in_rest() {
        let (mut record, mut keywords) = primary_year(1876);
        let mut tokens = toks("2 1873");
        check_additional_date(&mut tokens, &mut record, &mut keywords);
        assert_eq!(record.interval(), Some((1873, 1876)));
        assert_eq!(record.flag, Some(DateFlag::WrongOrder));
        assert!(keywords.secondary.is_some());
    }

    #[test]
    fn test_unrelated_number_is_ignored() {
        let (mut record, mut keywords) = primary_year(1978);
        let mut tokens = toks("printed 2007");
        check_additional_date(&mut tokens, &mut record, &mut keywords);
        assert_eq!(record.interval(), Some((1978, 1978)));

        let (mut record, mut keywords) = primary_year(1934);
        let mut tokens = toks("dynasty 45");
        check_additional_date(&mut tokens, &mut record, &mut keywords);
        assert_eq!(record.interval(), Some((1934, 1934)));
    }

    #[test]
    fn test_century_after_year_is_kept_aside() {
        let (mut record, mut keywords) = primary_year(1975);
        record.date_start = Some(1901);
        let mut tokens = toks("20th century");
        check_additional_date(&mut tokens, &mut record, &mut keywords);
        assert_eq!(record.interval(), Some((1901, 1975)));
        let second = keywords.secondary.as_deref().map(|c| c.record.interval());
        assert_eq!(second, Some(Some((1901, 2000))));
    }
}
