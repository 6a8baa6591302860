//! Splits a raw date expression on range hyphens.
//!
//! Minus signs of negative years are protected as `##` while splitting and
//! restored afterwards, bracketed groups holding digits are set aside on the
//! record, and fragments that belong together ("16th-century",
//! "mid-1300s") are glued back.

use crate::lexicon::is_ordinal_suffix;
use crate::normalize::strip_punct_keep_dots;
use crate::numbers::contains_digit;
use crate::types::DateRecord;

const DASHES: [char; 6] = ['–', '‒', '—', '―', '‐', '−'];
const SIGN_MARK: &str = "##";

fn starts_with_digit(word: Option<&String>) -> bool {
    word.and_then(|w| w.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// The character after a leading hyphen is a digit, or the hyphen stands
/// alone and the next word starts with one.
fn signs_number(rest: &str, next: Option<&String>) -> bool {
    match rest.chars().next() {
        Some(c) => c.is_ascii_digit(),
        None => starts_with_digit(next),
    }
}

/// Replace hyphens that act as minus signs by `##`.
fn protect_signs(text: &str) -> String {
    let mut words: Vec<String> = text.split_whitespace().map(String::from).collect();

    if let Some(first) = words.first() {
        if let Some(rest) = first.strip_prefix('-') {
            if signs_number(rest, words.get(1)) {
                words[0] = words[0].replacen('-', SIGN_MARK, 1);
            }
        }
    }

    let mut out = Vec::with_capacity(words.len());
    for (idx, word) in words.iter().enumerate() {
        let next = words.get(idx + 1);
        if let Some(pos) = word.find("--") {
            if signs_number(&word[pos + 2..], next) {
                out.push(word.replace("--", "-##"));
                continue;
            }
        } else if let Some(rest) = word.strip_prefix('-') {
            if idx > 0 && words[idx - 1].ends_with('-') && signs_number(rest, next) {
                out.push(word.replace('-', SIGN_MARK));
                continue;
            }
        }
        out.push(word.clone());
    }
    out.join(" ")
}

fn is_wrapped(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('(') && text.ends_with(')'))
            || (text.starts_with('[') && text.ends_with(']')))
}

/// Strip brackets around the whole text, blank out brackets without digits,
/// and cut out the first bracketed group with digits into
/// `record.parenthetical`.
fn extract_parenthetical(text: &str, record: &mut DateRecord) -> String {
    let mut text = text.to_string();
    while is_wrapped(&text) {
        text = text[1..text.len() - 1].to_string();
    }
    for (open, close) in [('(', ')'), ('[', ']')] {
        loop {
            let (Some(i1), Some(i2)) = (text.find(open), text.find(close)) else {
                break;
            };
            if i1 >= i2 {
                break;
            }
            if !contains_digit(&text[i1..i2]) {
                text = text.replacen(open, " ", 1).replacen(close, " ", 1);
                continue;
            }
            let inner = text[i1 + 1..i2].to_string();
            if record.parenthetical.is_none() {
                record.note(format!("Parenthetical group set aside: \"{inner}\""));
                record.parenthetical = Some(inner);
            }
            text = format!("{}{}", &text[..i1], &text[i2 + 1..]);
        }
    }
    text
}

/// Fragment continues the previous one: it opens with an ordinal suffix or
/// "century", or the previous one ends with early/mid/late.
fn continues_previous(fragment: &str, previous: &str) -> bool {
    let first = fragment
        .split_whitespace()
        .next()
        .map(|w| strip_punct_keep_dots(&w.to_lowercase()))
        .unwrap_or_default();
    let last = previous
        .split_whitespace()
        .last()
        .map(|w| strip_punct_keep_dots(&w.to_lowercase()))
        .unwrap_or_default();
    is_ordinal_suffix(&first) || first == "century" || matches!(last.as_str(), "early" | "mid" | "late")
}

/// Split a date expression into its range elements (usually one or two).
pub fn split_elements(text: &str, record: &mut DateRecord) -> Vec<String> {
    let text: String = text
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect();
    let text = text.replace("century", " century ").replace("millennium", " millennium ");
    let text = protect_signs(&text);
    let text = extract_parenthetical(&text, record);

    let mut elements: Vec<String> = Vec::new();
    for fragment in text.split('-').filter(|f| !f.trim().is_empty()) {
        match elements.last_mut() {
            Some(previous) if continues_previous(fragment, previous) => {
                previous.push(' ');
                previous.push_str(fragment);
            }
            _ => elements.push(fragment.to_string()),
        }
    }
    let elements: Vec<String> = elements.into_iter().map(|e| e.replace(SIGN_MARK, "-")).collect();
    if elements.len() > 1 {
        record.note(format!("Text splitted into: {elements:?}"));
    }
    elements
}
