use std::fmt;

use date_types::DateFlag;

use crate::lexicon::{PeriodUnit, SplitWord};
use crate::numbers::ordinal_string;

// ── Lookup metadata ────────────────────────────────────────────────

/// Columns filled when a date is resolved through a lookup collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchInfo {
    pub id: Option<String>,
    pub label: Option<String>,
    pub score: Option<f64>,
    pub spatial: Option<String>,
    pub debug: Option<String>,
    pub debug_spatial: Option<String>,
}

// ── Working date record ────────────────────────────────────────────

/// Mutable state for one element (or one sub-candidate) of a parse.
///
/// `date_start` and `date_end` are either both set or both unset once a rule
/// has finished with the record.
#[derive(Debug, Clone, Default)]
pub struct DateRecord {
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
    /// Canonical English rendering, rewritten by each rule that matches
    pub date_english: String,
    pub language: String,
    /// Flag raised during resolution; final precedence is applied later
    pub flag: Option<DateFlag>,
    /// The matched year was the first token of its element
    pub is_first_token: bool,
    /// The matched year was the last token of its element
    pub is_last_token: bool,
    /// Bracketed group holding digits, kept for a fallback parse
    pub parenthetical: Option<String>,
    pub matched: MatchInfo,
    /// Diagnostic notes for this call
    pub notes: Vec<String>,
}

impl DateRecord {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Self::default()
        }
    }

    pub fn interval(&self) -> Option<(i64, i64)> {
        match (self.date_start, self.date_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn set_interval(&mut self, start: i64, end: i64) {
        self.date_start = Some(start);
        self.date_end = Some(end);
    }

    pub fn clear_interval(&mut self) {
        self.date_start = None;
        self.date_end = None;
    }

    /// end - start, when both are set.
    pub fn width(&self) -> Option<i64> {
        self.interval().map(|(start, end)| end - start)
    }

    /// Take over another record's interval, rendering, language and match
    /// metadata. Token-position markers and flags stay as they are.
    pub fn adopt(&mut self, other: &DateRecord) {
        self.date_start = other.date_start;
        self.date_end = other.date_end;
        self.date_english = other.date_english.clone();
        self.language = other.language.clone();
        self.matched = other.matched.clone();
    }

    /// Record a rule decision in the per-call log.
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(note = %message, "date rule");
        self.notes.push(message);
    }
}

// ── Qualifier ordinal ──────────────────────────────────────────────

/// The ordinal in front of a fraction word: "second half", "2nd half".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrdinalMark {
    Word(String),
    Number(i64),
}

impl OrdinalMark {
    /// Index of the selected segment for a fraction with `boundary_count`
    /// boundary points. `last`/`latter` select the final segment.
    pub fn segment_index(&self, boundary_count: usize) -> Option<i64> {
        match self {
            Self::Number(n) => Some(n - 1),
            Self::Word(w) if w == "last" || w == "latter" => Some(boundary_count as i64 - 2),
            Self::Word(w) => crate::lexicon::segment_position(w).map(|p| p as i64),
        }
    }
}

impl fmt::Display for OrdinalMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => f.write_str(w),
            Self::Number(1) => f.write_str("first"),
            Self::Number(2) => f.write_str("second"),
            Self::Number(3) => f.write_str("third"),
            Self::Number(4) => f.write_str("fourth"),
            Self::Number(n) => f.write_str(&ordinal_string(*n)),
        }
    }
}

// ── Keyword state ──────────────────────────────────────────────────

/// A century or millennium number; negative means BC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub unit: PeriodUnit,
    pub number: i64,
}

/// Qualifiers and period markers detected while parsing one element.
#[derive(Debug, Clone, Default)]
pub struct KeywordState {
    pub ordinal: Option<OrdinalMark>,
    /// Token the ordinal was read from, removed from the remaining text
    pub ordinal_word: Option<String>,
    pub split: Option<SplitWord>,
    /// early / mid / middle / late, in order of appearance
    pub parts: Vec<String>,
    pub turn: bool,
    pub year: bool,
    pub period: Option<Period>,
    /// A qualifier was the last token of its element
    pub ends_at_last_token: bool,
    /// Alternate reading found while scanning the rest of the element
    pub secondary: Option<Box<Candidate>>,
}

impl KeywordState {
    pub fn period_number(&self, unit: PeriodUnit) -> Option<i64> {
        self.period.filter(|p| p.unit == unit).map(|p| p.number)
    }

    pub fn century(&self) -> Option<i64> {
        self.period_number(PeriodUnit::Century)
    }

    pub fn millennium(&self) -> Option<i64> {
        self.period_number(PeriodUnit::Millennium)
    }

    pub fn set_period(&mut self, unit: PeriodUnit, number: i64) {
        self.period = Some(Period { unit, number });
    }

    pub fn clear_qualifiers(&mut self) {
        self.parts.clear();
        self.split = None;
        self.ordinal = None;
        self.ordinal_word = None;
    }

    /// Secondary candidate, if it carries a period of `unit`.
    pub fn secondary_with(&self, unit: PeriodUnit) -> Option<&Candidate> {
        self.secondary
            .as_deref()
            .filter(|c| c.keywords.period_number(unit).is_some())
    }

    /// Rendering suffix for the active qualifiers: " (early mid)",
    /// " (first half)" or "".
    pub fn describe(&self) -> String {
        if !self.parts.is_empty() {
            format!(" ({})", self.parts.join(" "))
        } else if let (Some(split), Some(ordinal)) = (self.split, &self.ordinal) {
            format!(" ({} {})", ordinal, split.as_str())
        } else {
            String::new()
        }
    }
}

/// A record together with the keywords that produced it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub record: DateRecord,
    pub keywords: KeywordState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adopt_keeps_position_markers() {
        let mut a = DateRecord::new("en");
        a.is_last_token = true;
        let mut b = DateRecord::new("fr");
        b.set_interval(1601, 1700);
        b.date_english = "17th century".into();
        a.adopt(&b);
        assert_eq!(a.interval(), Some((1601, 1700)));
        assert_eq!(a.language, "fr");
        assert!(a.is_last_token);
    }

    #[test]
    fn test_segment_index() {
        assert_eq!(OrdinalMark::Word("last".into()).segment_index(5), Some(3));
        assert_eq!(OrdinalMark::Word("second".into()).segment_index(3), Some(1));
        assert_eq!(OrdinalMark::Number(2).segment_index(3), Some(1));
    }

    #[test]
    fn test_describe_qualifiers() {
        let mut kw = KeywordState::default();
        assert_eq!(kw.describe(), "");
        kw.parts = vec!["early".into(), "mid".into()];
        assert_eq!(kw.describe(), " (early mid)");
        kw.parts.clear();
        kw.split = Some(SplitWord::Half);
        kw.ordinal = Some(OrdinalMark::Number(2));
        assert_eq!(kw.describe(), " (second half)");
    }

    #[test]
    fn test_secondary_with_unit() {
        let mut inner = KeywordState::default();
        inner.set_period(PeriodUnit::Century, 17);
        let kw = KeywordState {
            secondary: Some(Box::new(Candidate {
                record: DateRecord::new("en"),
                keywords: inner,
            })),
            ..KeywordState::default()
        };
        assert!(kw.secondary_with(PeriodUnit::Century).is_some());
        assert!(kw.secondary_with(PeriodUnit::Millennium).is_none());
    }
}
