//! Turns one raw element of a date expression into lowercase tokens.

use crate::lexicon::{is_ordinal_suffix, NOISE_WORDS, EMPTY_MARKERS, PERIOD_KEYWORDS, STOPWORDS};
use crate::lookup::SpellCorrector;
use crate::numbers::{
    contains_digit, extract_number, is_numeric, is_roman, number_suffix, ordinal_suffix,
    roman_value,
};
use crate::types::DateRecord;

// ── Input screening ────────────────────────────────────────────────

/// Inputs that carry no date at all.
pub fn is_undated(input: &str) -> bool {
    if EMPTY_MARKERS.contains(&input) {
        return true;
    }
    input
        .to_lowercase()
        .split_whitespace()
        .any(|w| w == "unknown" || w == "undated")
}

/// Drop words that only get in the way ("dated 1850" → "1850").
pub fn drop_noise_words(input: &str) -> String {
    input
        .split_whitespace()
        .filter(|w| !NOISE_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Punctuation ────────────────────────────────────────────────────

fn remove_punct(word: &str, strip_dots: bool, replace: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_ascii_punctuation() && c != '-' && (strip_dots || c != '.') {
            out.push_str(replace);
        } else {
            out.push(c);
        }
    }
    out
}

/// Remove ASCII punctuation, dots included, keeping hyphens: "b.c." → "bc".
pub fn strip_punct(word: &str) -> String {
    remove_punct(word, true, "")
}

/// Remove ASCII punctuation except dots and hyphens.
pub fn strip_punct_keep_dots(word: &str) -> String {
    remove_punct(word, false, "")
}

fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

// ── Token corrections ──────────────────────────────────────────────

/// "1,000" → "1000"; other comma words are left for punctuation removal.
fn merge_thousands(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|word| {
            if !word.contains(',') || !contains_digit(&word) {
                return word;
            }
            let pieces: Vec<&str> = word.split(',').collect();
            if pieces.len() == 2 && is_numeric(pieces[0]) && is_numeric(pieces[1]) && pieces[1].len() == 3 {
                pieces.concat()
            } else {
                word
            }
        })
        .collect()
}

/// Roman numerals become numbers. When every token is a numeral (or bc/ad)
/// the numerals are read as centuries: "xvi" → "16th century".
fn convert_roman(tokens: Vec<String>) -> Vec<String> {
    let all_roman = tokens.iter().all(|w| is_roman(w) || w == "bc" || w == "ad");
    let mut out = Vec::with_capacity(tokens.len());
    for word in tokens {
        match roman_value(&word) {
            Some(n) if all_roman => {
                out.push(format!("{n}{}", ordinal_suffix(n)));
                out.push("century".to_string());
            }
            Some(n) => out.push(n.to_string()),
            None => out.push(word),
        }
    }
    out
}

/// Canonicalise century abbreviations: "centuries", "cen.", "c." after a
/// small numeral, and fused forms like "20thc".
fn small_corrections(tokens: Vec<String>) -> Vec<String> {
    let tokens: Vec<String> = tokens
        .into_iter()
        .map(|w| if w == "centuries" || w == "cen." { "century".to_string() } else { w })
        .collect();

    let mut out = Vec::with_capacity(tokens.len());
    for (idx, word) in tokens.iter().enumerate() {
        let after_small_numeral = idx != 0
            && contains_digit(&tokens[idx - 1])
            && extract_number(&tokens[idx - 1]).is_some_and(|n| n < 22);
        if (word == "c." || word == "c") && after_small_numeral {
            out.push("century".to_string());
            continue;
        }
        if contains_digit(word) {
            if let (Some(n), Some(suffix)) = (extract_number(word), number_suffix(word)) {
                if n != 0 && suffix == format!("{}c", ordinal_suffix(n)) {
                    out.push(n.to_string());
                    out.push("century".to_string());
                    continue;
                }
            }
        }
        out.push(word.clone());
    }
    out
}

fn has_ordinal_suffix(word: &str) -> bool {
    contains_digit(word) && number_suffix(word).is_some_and(|s| is_ordinal_suffix(&s))
}

// ── Spelling ───────────────────────────────────────────────────────

/// Whether a token list is worth sending to the speller.
fn wants_spelling(tokens: &[String]) -> bool {
    if tokens.iter().any(|w| PERIOD_KEYWORDS.contains(&w.as_str())) {
        return false;
    }
    if tokens.len() == 1 && contains_digit(&tokens[0]) {
        return false;
    }
    if tokens.len() == 2 && tokens[0] == "ca." && contains_digit(&tokens[1]) {
        return false;
    }
    !tokens
        .iter()
        .any(|w| is_numeric(w) && w.parse::<i64>().map_or(true, |n| n > 30))
}

/// Run the speller over `tokens`. Tokens holding digits and "mid" are never
/// changed. Speller failures leave the tokens as they were.
pub fn correct_spelling(
    tokens: &[String],
    record: &mut DateRecord,
    speller: Option<&dyn SpellCorrector>,
) -> Vec<String> {
    let Some(speller) = speller else {
        return tokens.to_vec();
    };
    if !wants_spelling(tokens) {
        return tokens.to_vec();
    }
    match speller.correct(tokens, &record.language) {
        Ok(corrected) if corrected.len() == tokens.len() => tokens
            .iter()
            .zip(corrected)
            .map(|(orig, fixed)| {
                if contains_digit(orig) || orig == "mid" {
                    orig.clone()
                } else {
                    fixed
                }
            })
            .collect(),
        Ok(_) => {
            record.note("Speller changed the token count, correction ignored");
            tokens.to_vec()
        }
        Err(e) => {
            tracing::warn!(error = %e, "spelling correction failed");
            record.note(format!("Spelling correction failed: {e}"));
            tokens.to_vec()
        }
    }
}

// ── Implicit period word ───────────────────────────────────────────

/// Append "century" or "millennium" after a bare ordinal, choosing the word
/// the whole input uses.
fn push_period_word(
    tokens: &mut Vec<String>,
    context: &[String],
    record: &mut DateRecord,
    speller: Option<&dyn SpellCorrector>,
) {
    let has = |words: &[String], w: &str| words.iter().any(|x| x == w);
    let word = if has(context, "millennium") {
        "millennium"
    } else if has(context, "century") {
        "century"
    } else if has(&correct_spelling(context, record, speller), "millennium") {
        "millennium"
    } else {
        "century"
    };
    tokens.push(word.to_string());
}

/// "5th" on its own (or at the end of the element) means "5th century".
fn complete_bare_ordinal(
    mut tokens: Vec<String>,
    record: &mut DateRecord,
    speller: Option<&dyn SpellCorrector>,
) -> Vec<String> {
    let context: Vec<String> = record.date_english.split_whitespace().map(String::from).collect();

    match tokens.len() {
        1 if has_ordinal_suffix(&tokens[0]) => push_period_word(&mut tokens, &context, record, speller),
        2 if is_numeric(&tokens[0]) && is_ordinal_suffix(&tokens[1]) => {
            push_period_word(&mut tokens, &context, record, speller)
        }
        _ => {}
    }
    if tokens.len() > 1 && has_ordinal_suffix(&tokens[tokens.len() - 1]) {
        push_period_word(&mut tokens, &context, record, speller);
    }
    let n = tokens.len();
    if n > 2 && is_numeric(&tokens[n - 2]) && is_ordinal_suffix(&tokens[n - 1]) {
        push_period_word(&mut tokens, &context, record, speller);
    }
    tokens
}

// ── Entry point ────────────────────────────────────────────────────

/// Normalise one element into tokens.
///
/// Lowercases, drops punctuation other than dots and hyphens, converts Roman
/// numerals, optionally corrects spelling, canonicalises century
/// abbreviations, removes stopwords and completes bare ordinals.
pub fn preprocess(
    text: &str,
    record: &mut DateRecord,
    speller: Option<&dyn SpellCorrector>,
) -> Vec<String> {
    record.note(format!("Preprocessing string \"{text}\""));

    let filtered: String = if record.language.is_empty() || record.language == "en" {
        text.chars().map(|c| if is_printable(c) { c } else { ' ' }).collect()
    } else {
        text.to_string()
    };
    let words: Vec<String> = filtered.to_lowercase().split(' ').map(String::from).collect();
    let joined = merge_thousands(words)
        .iter()
        .map(|w| remove_punct(w, false, " "))
        .collect::<Vec<_>>()
        .join(" ");
    let tokens: Vec<String> = joined
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();

    let tokens = convert_roman(tokens);
    let tokens = correct_spelling(&tokens, record, speller);
    let tokens = small_corrections(tokens);
    let tokens: Vec<String> = tokens
        .into_iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect();
    let mut tokens = complete_bare_ordinal(tokens, record, speller);

    if let Some(last) = tokens.last_mut() {
        if last.ends_with('.') {
            last.pop();
        }
    }
    record.note(format!("Preprocessed string is {tokens:?}"));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::KeywordSpeller;

    fn pre(text: &str) -> Vec<String> {
        let mut record = DateRecord::new("en");
        record.date_english = text.to_lowercase();
        preprocess(text, &mut record, None)
    }

    // ── screening ────────────────────────────────────────────────────

    #[test]
    fn test_is_undated() {
        assert!(is_undated("NULL"));
        assert!(is_undated(""));
        assert!(is_undated("Unknown origin"));
        assert!(!is_undated("1850"));
    }

    #[test]
    fn test_drop_noise_words() {
        assert_eq!(drop_noise_words("dated  1850"), "1850");
        assert_eq!(drop_noise_words("epoch of 1850"), "of 1850");
    }

    // ── punctuation ──────────────────────────────────────────────────

    #[test]
    fn test_strip_punct() {
        assert_eq!(strip_punct("b.c."), "bc");
        assert_eq!(strip_punct_keep_dots("(c.)"), "c.");
        assert_eq!(strip_punct("-100"), "-100");
    }

    // ── preprocess ───────────────────────────────────────────────────

    #[test]
    fn test_preprocess_basic() {
        assert_eq!(pre("The 16th Century"), vec!["16th", "century"]);
        assert_eq!(pre("1,000"), vec!["1000"]);
        assert_eq!(pre("1590's"), vec!["1590", "s"]);
    }

    #[test]
    fn test_preprocess_roman() {
        assert_eq!(pre("XVI"), vec!["16th", "century"]);
        assert_eq!(pre("XIV bc"), vec!["14th", "century", "bc"]);
        assert_eq!(pre("xx century"), vec!["20", "century"]);
    }

    #[test]
    fn test_preprocess_century_abbreviations() {
        assert_eq!(pre("14th C."), vec!["14th", "century"]);
        assert_eq!(pre("15th cen."), vec!["15th", "century"]);
        assert_eq!(pre("20thC"), vec!["20", "century"]);
        assert_eq!(pre("18th centuries"), vec!["18th", "century"]);
    }

    #[test]
    fn test_preprocess_bare_ordinal() {
        assert_eq!(pre("14th"), vec!["14th", "century"]);
        assert_eq!(pre("late 19th"), vec!["late", "19th", "century"]);
    }

    #[test]
    fn test_preprocess_bare_ordinal_uses_context() {
        let mut record = DateRecord::new("en");
        record.date_english = "4th-3rd millennium bc".into();
        assert_eq!(preprocess("4th", &mut record, None), vec!["4th", "millennium"]);
    }

    #[test]
    fn test_preprocess_trailing_dot() {
        assert_eq!(pre("1046 B.C."), vec!["1046", "b.c"]);
    }

    #[test]
    fn test_preprocess_non_printable() {
        assert_eq!(pre("1850\u{00a0}ca"), vec!["1850", "ca"]);
    }

    // ── spelling ─────────────────────────────────────────────────────

    #[test]
    fn test_spelling_gate() {
        let t = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
        assert!(!wants_spelling(&t("16th century")));
        assert!(!wants_spelling(&t("1850")));
        assert!(!wants_spelling(&t("ca. 1850")));
        assert!(!wants_spelling(&t("late 1850")));
        assert!(wants_spelling(&t("3rd milenium")));
    }

    #[test]
    fn test_spelling_corrects_keywords() {
        let speller = KeywordSpeller::default();
        let mut record = DateRecord::new("en");
        record.date_english = "3rd milenium".into();
        let tokens = preprocess("3rd milenium", &mut record, Some(&speller));
        assert_eq!(tokens, vec!["3rd", "millennium"]);
    }
}
