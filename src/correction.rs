//! Merging two partial dates into one interval.
//!
//! Every merge case takes the primary record and keywords by reference and
//! returns a new [`Candidate`]; callers decide whether to keep it.

use date_types::DateFlag;

use crate::lexicon::PeriodUnit;
use crate::numbers::magnitude;
use crate::period::{convert_period, render_period};
use crate::qualifier::apply_qualifiers;
use crate::types::{Candidate, DateRecord, KeywordState};

// ── Years ──────────────────────────────────────────────────────────

/// Repair an end year that lies before the start year: propagate a BC
/// sign, swap reversed ranges, or rebuild a truncated end ("1995-98").
fn correct_year(merged: &mut DateRecord, second: &DateRecord) {
    let Some((mut start, mut end)) = merged.interval() else {
        return;
    };
    merged.note("Correct year in second element...");
    if start > 0 && end < 0 {
        start = -start;
    }
    if end < start {
        merged.flag = Some(DateFlag::WrongOrder);
        if magnitude(start) == magnitude(end) || (end <= 0 && start <= 0) {
            std::mem::swap(&mut start, &mut end);
        } else if merged.is_last_token && second.is_first_token {
            let mut highest = magnitude(start);
            let mut buff = start;
            while end < start && highest > 0 {
                let scale = 10_i64.pow(highest as u32);
                end += buff.div_euclid(scale) * scale;
                buff = buff.rem_euclid(scale);
                highest -= 1;
            }
            if end < start {
                end = start;
            }
        } else {
            end = start;
        }
    }
    merged.set_interval(start, end);
}

fn render_year_range(start: i64, end: i64) -> String {
    if start < 0 {
        let end = if end < 0 { format!("{} BC", -end) } else { format!("{end} AD") };
        format!("{} BC - {end}", -start)
    } else {
        format!("{start} - {end}")
    }
}

/// Two literal years: the first gives the start, the second the end.
fn merge_years(record: &DateRecord, keywords: &KeywordState, second: &DateRecord) -> DateRecord {
    let mut merged = record.clone();
    // A later year found in the rest of the first element replaces it.
    if let Some(later) = keywords
        .secondary
        .as_deref()
        .filter(|c| c.keywords.year && c.record.date_start.is_some_and(|s| s > 31))
    {
        merged.adopt(&later.record);
    }
    let (Some(start), Some(end)) = (merged.date_start, second.date_end) else {
        return merged;
    };
    merged.date_end = Some(end);
    if end < start {
        correct_year(&mut merged, second);
    }
    let Some((mut start, end)) = merged.interval() else {
        return merged;
    };
    if (0..32).contains(&start) && end > 1000 {
        start = end;
        merged.date_start = Some(start);
    }
    merged.date_english = render_year_range(start, end);
    merged
}

// ── Centuries and millennia ────────────────────────────────────────

/// Rendering of one side of a period range, falling back to what the side
/// already says when it carries no period.
fn side_english(keywords: &KeywordState, unit: PeriodUnit, ad: bool, fallback: &str) -> String {
    match keywords.period_number(unit) {
        Some(number) => render_period(number, unit, keywords, ad),
        None => fallback.to_string(),
    }
}

/// Fix sign and order between a period on the left and the second element.
/// Returns the rendering of the right-hand side.
fn check_error_period(
    merged: &mut DateRecord,
    keywords: &mut KeywordState,
    second: &Candidate,
    unit: PeriodUnit,
) -> String {
    let Some(mut number) = keywords.period_number(unit) else {
        return second.record.date_english.clone();
    };
    if number > 0 && second.record.date_end.is_some_and(|end| end <= 0) {
        number = -number;
        keywords.set_period(unit, number);
        convert_period(merged, unit, number, false);
        apply_qualifiers(merged, keywords);
    }

    let mut swapped = false;
    if let (Some(start), Some(second_start)) = (merged.date_start, second.record.date_start) {
        // "19th century, 7 - 22": small numbers after a period are noise
        let noise = start > 1000 && 0 < second_start && second_start < 32;
        if !noise {
            if second_start < start {
                merged.date_start = Some(second_start);
                swapped = true;
            } else {
                merged.date_end = second.record.date_end;
            }
        }
    }

    let first_english = merged.date_english.clone();
    let (left, left_fallback, right, right_fallback) = if swapped {
        (&second.keywords, second.record.date_english.as_str(), &*keywords, first_english.as_str())
    } else {
        (&*keywords, first_english.as_str(), &second.keywords, second.record.date_english.as_str())
    };
    let left_bc = left.period_number(unit).is_some_and(|n| n < 0);
    let right_english = side_english(right, unit, left_bc, right_fallback);
    merged.date_english = side_english(left, unit, false, left_fallback);
    right_english
}

/// Period on at least one side.
fn merge_periods(record: &DateRecord, keywords: &KeywordState, second: &Candidate) -> Candidate {
    let mut merged = record.clone();
    merged.note("Merge both elements...");
    let other = &second.keywords;

    // A second period found in the first element is closer to the range.
    let carried = if other.century().is_some() && keywords.secondary_with(PeriodUnit::Century).is_some() {
        keywords.secondary_with(PeriodUnit::Century)
    } else if keywords.millennium().is_some() && other.millennium().is_some() {
        keywords.secondary_with(PeriodUnit::Millennium)
    } else {
        None
    };
    let mut period_keywords = match carried {
        Some(alt) => {
            merged.adopt(&alt.record);
            alt.keywords.clone()
        }
        None => keywords.clone(),
    };

    let right_english = if let Some(unit) = period_keywords.period.map(|p| p.unit) {
        check_error_period(&mut merged, &mut period_keywords, second, unit)
    } else if let (true, Some(century), Some(start)) =
        (period_keywords.year, other.century(), merged.date_start)
    {
        if 0 < start && start < century {
            // "18 - 19th century": the bare number is a century too
            period_keywords.set_period(PeriodUnit::Century, start);
            convert_period(&mut merged, PeriodUnit::Century, start, false);
            check_error_period(&mut merged, &mut period_keywords, second, PeriodUnit::Century)
        } else {
            second.record.date_english.clone()
        }
    } else {
        second.record.date_english.clone()
    };
    merged.date_english = format!("{} - {right_english}", merged.date_english);

    let keywords = if carried.is_some() { keywords.clone() } else { period_keywords };
    Candidate { record: merged, keywords }
}

// ── Entry point ────────────────────────────────────────────────────

/// Merge `second` into the primary record and keywords.
pub fn check_error_elem(record: &DateRecord, keywords: &KeywordState, second: &Candidate) -> Candidate {
    let mut merged = if keywords.year && second.keywords.year {
        let mut years = merge_years(record, keywords, &second.record);
        let narrower = keywords
            .secondary_with(PeriodUnit::Century)
            .or_else(|| second.keywords.secondary_with(PeriodUnit::Century));
        if let (Some(alt), Some(width)) = (narrower, years.width()) {
            if alt.record.width().is_some_and(|w| width > w) {
                years.adopt(&alt.record);
                years.note("Keep century because of more narrow period.");
            }
        }
        Candidate { record: years, keywords: keywords.clone() }
    } else if record.date_start.is_some() && second.record.date_end.is_some() {
        merge_periods(record, keywords, second)
    } else {
        let mut only = record.clone();
        if record.date_start.is_none() {
            only.note("Keep only second element...");
            only.date_start = second.record.date_start;
            only.date_end = second.record.date_end;
            only.date_english = second.record.date_english.clone();
        }
        Candidate { record: only, keywords: keywords.clone() }
    };

    if let Some((start, end)) = merged.record.interval() {
        merged.record.note(format!("Corrected period is now: {start}-{end}"));
    }
    merged
}
