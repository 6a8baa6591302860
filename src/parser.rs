use regex::Regex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use date_types::{CleanedDate, DateFlag};

use crate::additional::check_additional_date;
use crate::correction::check_error_elem;
use crate::error::CleanError;
use crate::formatted::check_formatted;
use crate::lookup::{DateLookup, LookupEntry, SpellCorrector};
use crate::normalize::{drop_noise_words, is_undated, preprocess};
use crate::period::search_century_millennium;
use crate::qualifier::{apply_qualifiers, check_keywords};
use crate::splitter::split_elements;
use crate::types::{Candidate, DateRecord, KeywordState};
use crate::year::{check_hidden_year, check_year};

// Characters kept when a string goes to the lookup tables.
static RE_LOOKUP_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^-A-Za-z0-9 ]+").unwrap());

/// Bracketed groups are parsed at most this many levels deep.
const MAX_PAREN_DEPTH: usize = 1;

/// Inputs with this many words or more are flagged as long strings.
const LONG_STRING_TOKENS: usize = 10;

const MIN_YEAR: i64 = -30000;
const MAX_YEAR: i64 = 2020;

// ── Options ────────────────────────────────────────────────────────

/// Settings for one [`clean_date`] call.
pub struct ParseOptions<'a> {
    /// Two-letter language code of the input
    pub language: String,
    /// Country code(s) of the object, comma separated; the first two-letter
    /// entry is used
    pub country_code: String,
    /// Untranslated text, copied to the result as is
    pub original_text: String,
    pub lookup: Option<&'a dyn DateLookup>,
    pub speller: Option<&'a dyn SpellCorrector>,
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country_code: String::new(),
            original_text: String::new(),
            lookup: None,
            speller: None,
        }
    }
}

// ── Rule engine ────────────────────────────────────────────────────

struct RuleEngine<'a> {
    speller: Option<&'a dyn SpellCorrector>,
}

impl RuleEngine<'_> {
    /// Split `text` into its elements and parse one or two of them.
    fn parse_string(&self, text: &str, record: &mut DateRecord, depth: usize) {
        let mut keywords = KeywordState::default();
        let elements = split_elements(text, record);
        let n = elements.len();
        match n {
            0 => {}
            1 => {
                let tokens = preprocess(&elements[0], record, self.speller);
                self.parse_element(tokens, record, &mut keywords, false, depth);
            }
            _ => {
                // "5th-6th centuries ryeo period, 918-1392": the last two
                // pieces form one element, so the first element is the one
                // before them
                let (first, second) = if n > 2 && text.to_lowercase().contains("century") {
                    (elements[n - 3].clone(), elements[n - 2..].join(" "))
                } else {
                    (elements[n - 2].clone(), elements[n - 1].clone())
                };
                record.note(format!("Handling first element: {first}"));
                let tokens = preprocess(&first, record, self.speller);
                self.parse_element(tokens, record, &mut keywords, true, depth);
                let tokens = preprocess(&second, record, self.speller);
                self.handle_second_element(tokens, record, &mut keywords, depth);
            }
        }
    }

    /// Year, then century/millennium, then a year glued to letters. A lone
    /// element that yields nothing falls back to its bracketed group.
    fn parse_element(
        &self,
        mut tokens: Vec<String>,
        record: &mut DateRecord,
        keywords: &mut KeywordState,
        several: bool,
        depth: usize,
    ) {
        record.date_english = tokens.join(" ");
        let mut rest = check_year(&tokens, record, keywords, false);
        if !keywords.year && !rest.is_empty() {
            search_century_millennium(&mut tokens, record, keywords);
            rest = tokens;
            if keywords.period.is_none() && !rest.is_empty() {
                rest = check_hidden_year(&rest, record, keywords);
                if !keywords.year {
                    if !several && record.parenthetical.is_some() {
                        self.parse_parentheses(record, depth);
                        return;
                    } else if several {
                        rest = check_keywords(&rest, record, keywords);
                    }
                }
            }
        }
        if !rest.is_empty() {
            check_additional_date(&mut rest, record, keywords);
        }
    }

    /// Parse the second element on its own and merge it into the first.
    fn handle_second_element(
        &self,
        tokens: Vec<String>,
        record: &mut DateRecord,
        keywords: &mut KeywordState,
        depth: usize,
    ) {
        record.note(format!("Handling second element: {tokens:?}"));
        let mut second = Candidate {
            record: DateRecord::new(&record.language),
            keywords: KeywordState::default(),
        };
        self.parse_element(tokens, &mut second.record, &mut second.keywords, true, depth);
        record.notes.append(&mut second.record.notes);

        if record.date_start.is_none()
            && second.record.date_start.is_none()
            && record.parenthetical.is_some()
            && self.parse_parentheses(record, depth)
        {
            return;
        }
        carry_trailing_qualifiers(record, keywords, &mut second);
        let merged = check_error_elem(record, keywords, &second);
        *record = merged.record;
        *keywords = merged.keywords;
    }

    /// Parse the bracketed group set aside by the splitter as if it were the
    /// whole input. Returns true when it produced a date.
    fn parse_parentheses(&self, record: &mut DateRecord, depth: usize) -> bool {
        let Some(text) = record.parenthetical.take() else {
            return false;
        };
        if depth >= MAX_PAREN_DEPTH {
            record.note(format!("Nested parentheses left unparsed: {text}"));
            return false;
        }
        record.note(format!("Checking date in parentheses: {text}"));
        self.parse_string(&text, record, depth + 1);
        record.date_start.is_some()
    }
}

/// "early/mid-20th century": qualifiers closing an empty first element
/// apply to the second one.
fn carry_trailing_qualifiers(record: &DateRecord, keywords: &KeywordState, second: &mut Candidate) {
    let second_bare = second.keywords.split.is_none() && second.keywords.parts.is_empty();
    let has_qualifier = keywords.split.is_some() || !keywords.parts.is_empty();
    if record.date_start.is_none()
        && second.record.date_start.is_some()
        && second_bare
        && has_qualifier
        && keywords.ends_at_last_token
    {
        let mut carried = keywords.clone();
        apply_qualifiers(&mut second.record, &mut carried);
        let suffix = carried.describe();
        second.record.date_english.push_str(&suffix);
    }
}

// ── Collaborators ──────────────────────────────────────────────────

/// First two-letter code of a comma separated list. The flag is true when a
/// code was given but none of its entries has two letters.
fn normalize_country_code(code: &str) -> (String, bool) {
    if code.trim().is_empty() {
        return (String::new(), false);
    }
    match code.split(',').map(str::trim).find(|c| c.chars().count() == 2) {
        Some(c) => (c.to_string(), false),
        None => (String::new(), true),
    }
}

fn apply_entry(record: &mut DateRecord, entry: &LookupEntry, text: &str, flag: DateFlag) {
    record.set_interval(entry.date_start, entry.date_end);
    record.date_english = entry.date_english.clone().unwrap_or_else(|| text.to_lowercase());
    record.matched = entry.match_info();
    record.flag = Some(flag);
}

/// Synonyms, then validated dates, then manual mappings, then the period
/// authority. A validated entry marked incorrect ends the search empty.
fn resolve_with_lookup(
    date: &str,
    country_code: &str,
    lookup: &dyn DateLookup,
    record: &mut DateRecord,
) -> Result<(), CleanError> {
    let text = date.replace("en: ", "").replace("en:", "");
    let text = RE_LOOKUP_NOISE.replace_all(&text, " ").trim().to_string();
    let text = match lookup.synonym(&text, country_code)? {
        Some(synonym) => {
            record.note(format!("Synonym found: {text} → {synonym}"));
            synonym
        }
        None => text,
    };

    if let Some(entry) = lookup.validated(&text, country_code)? {
        record.note(format!("Validated date found for input string: {text}, {country_code}"));
        if entry.correct {
            apply_entry(record, &entry, &text, DateFlag::Validated);
        } else {
            record.clear_interval();
            record.note("Input is marked as incorrect");
        }
        return Ok(());
    }
    if let Some(entry) = lookup.manual(&text, country_code)? {
        record.note(format!("Manual date found for input string: {text}"));
        apply_entry(record, &entry, &text, DateFlag::Manual);
        return Ok(());
    }
    if let Some(entry) = lookup.period_authority(&text, country_code)? {
        record.note(format!("Period authority match: {text}"));
        apply_entry(record, &entry, &text, DateFlag::Authority);
    }
    Ok(())
}

// ── Finalisation ───────────────────────────────────────────────────

fn word_count(date: &str) -> usize {
    date.replace('-', " ").split(' ').count()
}

fn final_flag(record: &DateRecord, date: &str, bad_country: bool) -> DateFlag {
    match record.interval() {
        None => DateFlag::Null,
        Some((start, end)) if start < MIN_YEAR || end > MAX_YEAR => DateFlag::OutOfBounds,
        Some(_) if word_count(date) >= LONG_STRING_TOKENS => DateFlag::LongString,
        Some(_) => match record.flag {
            Some(flag) => flag,
            None if bad_country => DateFlag::CountryCode,
            None => DateFlag::Parsed,
        },
    }
}

fn finalize(record: DateRecord, date: &str, options: &ParseOptions, bad_country: bool) -> CleanedDate {
    let flag = final_flag(&record, date, bad_country);
    let language = if record.language.is_empty() { "en".to_string() } else { record.language };
    let m = record.matched;
    CleanedDate {
        date_start: record.date_start,
        date_end: record.date_end,
        date_english: record.date_english,
        date_original: options.original_text.clone(),
        date_original_lang: language,
        date_flags: flag,
        date_match_id: m.id.unwrap_or_default(),
        date_match_label: m.label.unwrap_or_default(),
        date_match_score: m.score,
        date_match_spatial: m.spatial.unwrap_or_default(),
        date_debug: m.debug.unwrap_or_default(),
        date_debug_spatial: m.debug_spatial.unwrap_or_default(),
        log: record.notes,
    }
}

// ── Entry points ───────────────────────────────────────────────────

/// Clean one date expression into an interval, a canonical English
/// rendering and a quality flag.
pub fn clean_date(input: &str, options: &ParseOptions) -> CleanedDate {
    let mut record = DateRecord::new(&options.language);
    record.date_english = input.to_lowercase();
    if is_undated(input) {
        record.note(format!("Input \"{input}\" carries no date"));
        return finalize(record, input, options, false);
    }

    let date = drop_noise_words(input);
    let (country_code, bad_country) = normalize_country_code(&options.country_code);
    let engine = RuleEngine { speller: options.speller };

    let seed = record.clone();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut record = seed;
        if !check_formatted(&date, &mut record) {
            engine.parse_string(&date, &mut record, 0);
        }
        record
    }));
    match outcome {
        Ok(parsed) => record = parsed,
        Err(_) => {
            tracing::warn!(input, "date rules panicked");
            record.clear_interval();
            record.note(format!("Error cleaning string: {input}"));
        }
    }

    if record.date_start.is_none() {
        if let Some(lookup) = options.lookup {
            if let Err(e) = resolve_with_lookup(&date, &country_code, lookup, &mut record) {
                tracing::warn!(error = %e, input, "date lookup failed");
                record.clear_interval();
                record.note(format!("Error cleaning string: {input}, {country_code}"));
                record.note(e.to_string());
            }
        }
    }

    let result = finalize(record, &date, options, bad_country);
    tracing::debug!(
        input,
        start = ?result.date_start,
        end = ?result.date_end,
        flag = %result.date_flags,
        "date cleaned"
    );
    result
}

/// [`clean_date`] with English input and no collaborators.
pub fn parse_date(input: &str) -> CleanedDate {
    clean_date(input, &ParseOptions::default())
}
