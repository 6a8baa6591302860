//! Collaborators around the rule engine: a spelling corrector and the
//! lookup tables consulted when no rule matches (synonyms, validated
//! dates, manual mappings and period-authority results).

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use symspell::{AsciiStringStrategy, SymSpell, Verbosity};

use crate::error::CleanError;
use crate::types::MatchInfo;

// ── Spelling ───────────────────────────────────────────────────────

/// Corrects misspelled tokens. Must return exactly one token per input
/// token; anything else is ignored by the caller.
pub trait SpellCorrector {
    fn correct(&self, tokens: &[String], language: &str) -> Result<Vec<String>, CleanError>;
}

/// Period words a misspelling may be snapped onto.
const DATE_VOCABULARY: &[&str] = &[
    "century", "centuries", "millennium", "first", "second", "third", "fourth", "fifth",
    "sixth", "seventh", "eighth", "ninth", "tenth", "eleventh", "twelfth", "thirteenth",
    "fourteenth", "fifteenth", "sixteenth", "seventeenth", "eighteenth", "nineteenth",
    "twentieth",
];

/// Ordinary words within reach of the vocabulary. They are loaded as
/// dictionary entries of their own so an exact match keeps them as written.
const KNOWN_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "seconds", "thirds", "fourths", "fifths", "sixths", "tenths",
    "firstly", "secondary", "fist", "firs", "tent", "tench",
    "ware", "made", "past", "late", "last", "mind", "half", "early", "earl", "yearly", "ming",
    "tang", "song", "yuan", "qing", "han", "bronze", "iron", "stone", "period", "dynasty",
    "reign", "circa", "before", "after", "turn", "printed", "painted", "signed", "dated",
];

static SYMSPELL: OnceLock<SymSpell<AsciiStringStrategy>> = OnceLock::new();

fn init_symspell() -> SymSpell<AsciiStringStrategy> {
    let mut symspell: SymSpell<AsciiStringStrategy> = SymSpell::default();
    for word in DATE_VOCABULARY.iter().chain(KNOWN_WORDS) {
        symspell.load_dictionary_line(&format!("{word} 1"), 0, 1, " ");
    }
    tracing::debug!(
        vocabulary = DATE_VOCABULARY.len(),
        known = KNOWN_WORDS.len(),
        "keyword speller initialized"
    );
    symspell
}

fn get_symspell() -> &'static SymSpell<AsciiStringStrategy> {
    SYMSPELL.get_or_init(init_symspell)
}

/// Snaps near-misses onto period words ("milenium" → "millennium",
/// "fifh" → "fifth"). Only alphabetic English tokens of `min_length`
/// letters or more are looked at. Words shorter than
/// `full_distance_length` get a single edit, and a correction is only kept
/// when it lands on a period word.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSpeller {
    pub max_edit_distance: i64,
    pub min_length: usize,
    pub full_distance_length: usize,
}

impl Default for KeywordSpeller {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
            min_length: 4,
            full_distance_length: 7,
        }
    }
}

impl KeywordSpeller {
    fn correct_word(&self, word: &str) -> String {
        if word.len() < self.min_length || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return word.to_string();
        }
        let distance = if word.len() < self.full_distance_length {
            self.max_edit_distance.min(1)
        } else {
            self.max_edit_distance
        };
        get_symspell()
            .lookup(word, Verbosity::Top, distance)
            .into_iter()
            .next()
            .map(|s| s.term)
            .filter(|term| DATE_VOCABULARY.contains(&term.as_str()))
            .unwrap_or_else(|| word.to_string())
    }
}

impl SpellCorrector for KeywordSpeller {
    fn correct(&self, tokens: &[String], language: &str) -> Result<Vec<String>, CleanError> {
        if !language.is_empty() && language != "en" {
            return Ok(tokens.to_vec());
        }
        Ok(tokens.iter().map(|t| self.correct_word(t)).collect())
    }
}

// ── Lookup tables ──────────────────────────────────────────────────

fn default_correct() -> bool {
    true
}

/// One known date string and the interval it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub text: String,
    pub date_start: i64,
    pub date_end: i64,
    #[serde(default)]
    pub date_english: Option<String>,
    /// Two-letter codes the entry is restricted to; empty means anywhere
    #[serde(default)]
    pub countries: Vec<String>,
    /// Validated entries only: false marks the string as known to be wrong
    #[serde(default = "default_correct")]
    pub correct: bool,
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub match_label: Option<String>,
    #[serde(default)]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub match_spatial: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
    #[serde(default)]
    pub debug_spatial: Option<String>,
}

impl LookupEntry {
    fn applies_to(&self, text: &str, country_code: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
            && (self.countries.is_empty()
                || country_code.is_empty()
                || self.countries.iter().any(|c| c.eq_ignore_ascii_case(country_code)))
    }

    pub fn match_info(&self) -> MatchInfo {
        MatchInfo {
            id: self.match_id.clone(),
            label: self.match_label.clone(),
            score: self.match_score,
            spatial: self.match_spatial.clone(),
            debug: self.debug.clone(),
            debug_spatial: self.debug_spatial.clone(),
        }
    }
}

/// Lookups consulted when the rules find nothing. `Ok(None)` means the
/// text is unknown to that source.
pub trait DateLookup {
    fn synonym(&self, text: &str, country_code: &str) -> Result<Option<String>, CleanError>;
    fn validated(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError>;
    fn manual(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError>;
    fn period_authority(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError>;
}

/// In-memory tables, usually loaded from one JSON file:
///
/// ```json
/// { "synonyms": { "han": "han dynasty" },
///   "periods": [ { "text": "han dynasty", "date_start": -206, "date_end": 220 } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTables {
    pub manual: Vec<LookupEntry>,
    pub validated: Vec<LookupEntry>,
    pub synonyms: HashMap<String, String>,
    pub periods: Vec<LookupEntry>,
}

impl LookupTables {
    pub fn from_json(json: &str) -> Result<Self, CleanError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CleanError> {
        let json = std::fs::read_to_string(path).map_err(|e| CleanError::io(path, e))?;
        let tables = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            manual = tables.manual.len(),
            validated = tables.validated.len(),
            synonyms = tables.synonyms.len(),
            periods = tables.periods.len(),
            "lookup tables loaded"
        );
        Ok(tables)
    }

    fn find(rows: &[LookupEntry], text: &str, country_code: &str) -> Option<LookupEntry> {
        rows.iter().find(|r| r.applies_to(text, country_code)).cloned()
    }
}

impl DateLookup for LookupTables {
    fn synonym(&self, text: &str, _country_code: &str) -> Result<Option<String>, CleanError> {
        Ok(self
            .synonyms
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(text))
            .map(|(_, v)| v.clone()))
    }

    fn validated(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError> {
        Ok(Self::find(&self.validated, text, country_code))
    }

    fn manual(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError> {
        Ok(Self::find(&self.manual, text, country_code))
    }

    fn period_authority(&self, text: &str, country_code: &str) -> Result<Option<LookupEntry>, CleanError> {
        Ok(Self::find(&self.periods, text, country_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    // ── KeywordSpeller ───────────────────────────────────────────────

    #[test]
    fn test_speller_fixes_keywords() {
        let speller = KeywordSpeller::default();
        let fixed = speller.correct(&toks("fifh centruy milenium"), "en").unwrap();
        assert_eq!(fixed, toks("fifth century millennium"));
    }

    #[test]
    fn test_speller_keeps_prose_words() {
        let speller = KeywordSpeller::default();
        for text in ["ware 3rd", "made 12th", "ming ware", "past 5", "sixty eight", "erly mid"] {
            assert_eq!(speller.correct(&toks(text), "en").unwrap(), toks(text), "{text}");
        }
    }

    #[test]
    fn test_speller_leaves_other_tokens() {
        let speller = KeywordSpeller::default();
        let fixed = speller.correct(&toks("bronze 3rd han"), "en").unwrap();
        assert_eq!(fixed, toks("bronze 3rd han"));

        let fixed = speller.correct(&toks("milenium"), "fr").unwrap();
        assert_eq!(fixed, toks("milenium"));
    }

    // ── LookupTables ─────────────────────────────────────────────────

    const TABLES: &str = r#"{
        "synonyms": { "Han": "han dynasty" },
        "validated": [
            { "text": "ottoman empire", "date_start": 1299, "date_end": 1922, "countries": ["TR"] },
            { "text": "bad entry", "date_start": 0, "date_end": 0, "correct": false }
        ],
        "periods": [
            { "text": "han dynasty", "date_start": -206, "date_end": 220,
              "match_label": "han dynasty", "match_score": 1.0 }
        ]
    }"#;

    #[test]
    fn test_tables_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLES.as_bytes()).unwrap();
        let tables = LookupTables::from_path(file.path()).unwrap();
        assert!(tables.manual.is_empty());
        assert_eq!(tables.validated.len(), 2);
        assert!(tables.validated[0].correct);
        assert!(!tables.validated[1].correct);
    }

    #[test]
    fn test_tables_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LookupTables::from_path(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CleanError::Io { .. }));
    }

    #[test]
    fn test_tables_malformed_json() {
        let err = LookupTables::from_json("{ \"periods\": 3 }").unwrap_err();
        assert!(matches!(err, CleanError::Json(_)));
    }

    #[test]
    fn test_lookup_matching() {
        let tables = LookupTables::from_json(TABLES).unwrap();
        assert_eq!(tables.synonym("han", "").unwrap().as_deref(), Some("han dynasty"));
        assert!(tables.validated("Ottoman Empire", "TR").unwrap().is_some());
        assert!(tables.validated("ottoman empire", "GR").unwrap().is_none());
        assert!(tables.validated("ottoman empire", "").unwrap().is_some());

        let period = tables.period_authority("han dynasty", "CN").unwrap().unwrap();
        assert_eq!((period.date_start, period.date_end), (-206, 220));
        assert_eq!(period.match_info().score, Some(1.0));
    }
}
