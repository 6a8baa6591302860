//! Static word tables used by the rule stages.
//!
//! Every token comparison in the pipeline is made against lowercase text, so
//! all entries here are lowercase.

use serde::Serialize;

// ── Plain word lists ─────────────────────────────────────────────────

pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const STOPWORDS: [&str; 5] = ["and", "or", "of", "the", "to"];

/// Words dropped from the raw input before any parsing.
pub const NOISE_WORDS: [&str; 6] = ["date", "dated", "dating", "epoch", "epoque", "unkown"];

/// Inputs that mean "no date" on their own.
pub const EMPTY_MARKERS: [&str; 4] = ["NULL", "", "uncertain", "indeterminate"];

pub const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// When one of these is present the speller is never consulted.
pub const PERIOD_KEYWORDS: [&str; 4] = ["century", "centuries", "c.", "millennium"];

pub const BC_MARKERS: [&str; 2] = ["bc", "bce"];
pub const HIJRI_MARKERS: [&str; 2] = ["ah", "hejira"];

pub fn is_month(word: &str) -> bool {
    MONTHS.contains(&word)
}

pub fn is_ordinal_suffix(word: &str) -> bool {
    ORDINAL_SUFFIXES.contains(&word)
}

pub fn is_bc_marker(word: &str) -> bool {
    BC_MARKERS.contains(&word)
}

// ── Spelled ordinals ─────────────────────────────────────────────────

/// Numeric value of a spelled ordinal ("first" → 1 … "twentieth" → 20).
pub fn spelled_ordinal(word: &str) -> Option<i64> {
    let n = match word {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        "eleventh" => 11,
        "twelfth" => 12,
        "thirteenth" => 13,
        "fourteenth" => 14,
        "fifteenth" => 15,
        "sixteenth" => 16,
        "seventeenth" => 17,
        "eighteenth" => 18,
        "nineteenth" => 19,
        "twentieth" => 20,
        _ => return None,
    };
    Some(n)
}

// ── Period unit ──────────────────────────────────────────────────────

/// Unit named by a period keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PeriodUnit {
    Century,
    Millennium,
}

impl PeriodUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Century => "century",
            Self::Millennium => "millennium",
        }
    }

    /// Years covered by one unit.
    pub fn span(&self) -> i64 {
        match self {
            Self::Century => 100,
            Self::Millennium => 1000,
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "century" => Some(Self::Century),
            "millennium" => Some(Self::Millennium),
            _ => None,
        }
    }
}

// ── Qualifier words ──────────────────────────────────────────────────

/// Fraction word: "first half", "third quarter", …
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SplitWord {
    Half,
    Third,
    Quarter,
}

impl SplitWord {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "half" => Some(Self::Half),
            "third" => Some(Self::Third),
            "quarter" => Some(Self::Quarter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Third => "third",
            Self::Quarter => "quarter",
        }
    }

    /// Number of boundary points when dividing an interval by this fraction.
    pub fn boundary_count(&self) -> usize {
        match self {
            Self::Half => 3,
            Self::Third => 4,
            Self::Quarter => 5,
        }
    }
}

/// Boundary points used for early / mid / late thirds.
pub const PART_BOUNDARIES: usize = 4;

/// Segment index of a part word: early 0, mid/middle 1, late 2.
pub fn part_index(word: &str) -> Option<usize> {
    match word {
        "early" => Some(0),
        "mid" | "middle" => Some(1),
        "late" => Some(2),
        _ => None,
    }
}

/// Segment index of an ordinal preceding a fraction word.
///
/// `last` and `latter` resolve against the fraction's boundary count and
/// have no fixed position, so they return `None` here.
pub fn segment_position(word: &str) -> Option<usize> {
    match word {
        "first" => Some(0),
        "second" => Some(1),
        "third" => Some(2),
        "fourth" => Some(3),
        _ => None,
    }
}

pub fn is_segment_ordinal(word: &str) -> bool {
    segment_position(word).is_some() || matches!(word, "last" | "latter")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelled_ordinal_bounds() {
        assert_eq!(spelled_ordinal("first"), Some(1));
        assert_eq!(spelled_ordinal("twentieth"), Some(20));
        assert_eq!(spelled_ordinal("twenty-first"), None);
    }

    #[test]
    fn test_period_unit_span() {
        assert_eq!(PeriodUnit::from_word("millennium").map(|u| u.span()), Some(1000));
        assert_eq!(PeriodUnit::from_word("centuries"), None);
    }

    #[test]
    fn test_qualifier_tables() {
        assert_eq!(part_index("middle"), part_index("mid"));
        assert_eq!(SplitWord::Quarter.boundary_count(), 5);
        assert!(is_segment_ordinal("latter"));
        assert!(!is_segment_ordinal("fifth"));
    }
}
