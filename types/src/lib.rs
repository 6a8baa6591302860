use serde::{Deserialize, Serialize};
use std::fmt;

// ── Quality flag ─────────────────────────────────────────────────────────

/// Outcome code attached to every cleaned date.
///
/// `NF-*` codes mark an accepted interval, `FF-*` codes mark a failure or a
/// result the caller should treat with suspicion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFlag {
    /// Parsed by the rule engine
    #[serde(rename = "NF-NU")]
    Parsed,
    /// Taken from the manual mapping table
    #[serde(rename = "NF-MN")]
    Manual,
    /// Taken from the validated-dates table
    #[serde(rename = "NF-CK")]
    Validated,
    /// Resolved through the period authority
    #[serde(rename = "FF-CH")]
    Authority,
    /// Range was written in the wrong order and had to be repaired
    #[serde(rename = "FF-WO")]
    WrongOrder,
    /// start < -30000 or end > 2020
    #[serde(rename = "FF-OB")]
    OutOfBounds,
    /// Input has ten or more tokens
    #[serde(rename = "FF-LS")]
    LongString,
    /// No interval found
    #[serde(rename = "FF-NULL")]
    Null,
    /// Country code supplied but not a 2-letter code
    #[serde(rename = "FF-CC")]
    CountryCode,
}

impl DateFlag {
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Parsed => "NF-NU",
            Self::Manual => "NF-MN",
            Self::Validated => "NF-CK",
            Self::Authority => "FF-CH",
            Self::WrongOrder => "FF-WO",
            Self::OutOfBounds => "FF-OB",
            Self::LongString => "FF-LS",
            Self::Null => "FF-NULL",
            Self::CountryCode => "FF-CC",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NF-NU" => Some(Self::Parsed),
            "NF-MN" => Some(Self::Manual),
            "NF-CK" => Some(Self::Validated),
            "FF-CH" => Some(Self::Authority),
            "FF-WO" => Some(Self::WrongOrder),
            "FF-OB" => Some(Self::OutOfBounds),
            "FF-LS" => Some(Self::LongString),
            "FF-NULL" => Some(Self::Null),
            "FF-CC" => Some(Self::CountryCode),
            _ => None,
        }
    }

    /// True for the `FF-*` family.
    pub fn is_suspect(&self) -> bool {
        self.as_code().starts_with("FF-")
    }
}

impl fmt::Display for DateFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

// ── Cleaned date ─────────────────────────────────────────────────────────

/// Final result of cleaning one date expression.
///
/// Unset auxiliary columns are empty strings so the record always has the
/// same shape when written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedDate {
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
    pub date_english: String,
    pub date_original: String,
    pub date_original_lang: String,
    pub date_flags: DateFlag,
    #[serde(default)]
    pub date_match_id: String,
    #[serde(default)]
    pub date_match_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_match_score: Option<f64>,
    #[serde(default)]
    pub date_match_spatial: String,
    #[serde(default)]
    pub date_debug: String,
    #[serde(default)]
    pub date_debug_spatial: String,
    /// Diagnostic notes collected during this call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub log: Vec<String>,
}

impl CleanedDate {
    /// Both bounds, when an interval was found.
    pub fn interval(&self) -> Option<(i64, i64)> {
        match (self.date_start, self.date_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}
