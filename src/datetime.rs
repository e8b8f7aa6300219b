//! Detection of date/time columns from textual samples.
//!
//! Candidate patterns are tried in a fixed order: year-first patterns that
//! cannot be misread come first, then the day/month family the locale
//! prefers, then the other family. A text such as `05/06/2024` fits both
//! families; the column then stays ambiguous until a later sample rules one
//! family out.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

use crate::{
    locale::{DateOrder, LocaleServices},
    model::{ColumnPair, DataType, TimeUnit},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Zoned,
    Naive,
    DateOnly,
    YearMonth,
    TimeOnly,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DatePattern {
    pub format: &'static str,
    pub unit: TimeUnit,
    kind: PatternKind,
    family: Option<DateOrder>,
}

const fn pattern(
    format: &'static str,
    kind: PatternKind,
    unit: TimeUnit,
    family: Option<DateOrder>,
) -> DatePattern {
    DatePattern {
        format,
        unit,
        kind,
        family,
    }
}

const DMY: Option<DateOrder> = Some(DateOrder::DayMonthYear);
const MDY: Option<DateOrder> = Some(DateOrder::MonthDayYear);

static PATTERNS: &[DatePattern] = &[
    pattern("%Y-%m-%dT%H:%M:%S%.fZ", PatternKind::Naive, TimeUnit::Second, None),
    pattern("%Y-%m-%dT%H:%M:%S%.f%:z", PatternKind::Zoned, TimeUnit::Second, None),
    pattern("%Y-%m-%dT%H:%M:%S%.f", PatternKind::Naive, TimeUnit::Second, None),
    pattern("%Y-%m-%d %H:%M:%S%.f", PatternKind::Naive, TimeUnit::Second, None),
    pattern("%Y-%m-%dT%H:%M", PatternKind::Naive, TimeUnit::Minute, None),
    pattern("%Y-%m-%d %H:%M", PatternKind::Naive, TimeUnit::Minute, None),
    pattern("%Y-%m-%d", PatternKind::DateOnly, TimeUnit::Day, None),
    pattern("%Y/%m/%d %H:%M:%S", PatternKind::Naive, TimeUnit::Second, None),
    pattern("%Y/%m/%d", PatternKind::DateOnly, TimeUnit::Day, None),
    pattern("%Y-%m", PatternKind::YearMonth, TimeUnit::Month, None),
    pattern("%a, %d %b %Y %H:%M:%S %z", PatternKind::Zoned, TimeUnit::Second, None),
    pattern("%d %b %Y", PatternKind::DateOnly, TimeUnit::Day, None),
    pattern("%b %d, %Y", PatternKind::DateOnly, TimeUnit::Day, None),
    pattern("%H:%M:%S", PatternKind::TimeOnly, TimeUnit::Second, None),
    pattern("%d.%m.%Y %H:%M:%S", PatternKind::Naive, TimeUnit::Second, DMY),
    pattern("%d.%m.%Y %H:%M", PatternKind::Naive, TimeUnit::Minute, DMY),
    pattern("%d.%m.%Y", PatternKind::DateOnly, TimeUnit::Day, DMY),
    pattern("%d/%m/%Y %H:%M:%S", PatternKind::Naive, TimeUnit::Second, DMY),
    pattern("%d/%m/%Y %H:%M", PatternKind::Naive, TimeUnit::Minute, DMY),
    pattern("%d/%m/%Y", PatternKind::DateOnly, TimeUnit::Day, DMY),
    pattern("%d-%m-%Y", PatternKind::DateOnly, TimeUnit::Day, DMY),
    pattern("%m/%d/%Y %H:%M:%S", PatternKind::Naive, TimeUnit::Second, MDY),
    pattern("%m/%d/%Y %H:%M", PatternKind::Naive, TimeUnit::Minute, MDY),
    pattern("%m/%d/%Y", PatternKind::DateOnly, TimeUnit::Day, MDY),
    pattern("%m-%d-%Y", PatternKind::DateOnly, TimeUnit::Day, MDY),
];

impl DatePattern {
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        let parsed = match self.kind {
            PatternKind::Zoned => DateTime::parse_from_str(text, self.format)
                .ok()
                .map(|dt| dt.naive_utc()),
            PatternKind::Naive => NaiveDateTime::parse_from_str(text, self.format).ok(),
            PatternKind::DateOnly => NaiveDate::parse_from_str(text, self.format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN)),
            PatternKind::YearMonth => {
                NaiveDate::parse_from_str(&format!("{text}-01"), &format!("{}-%d", self.format))
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            }
            PatternKind::TimeOnly => {
                return NaiveTime::parse_from_str(text, self.format)
                    .ok()
                    .map(|t| NaiveDate::default().and_time(t));
            }
        }?;
        (1000..=9999).contains(&parsed.year()).then_some(parsed)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.parse(text).is_some()
    }
}

pub fn pattern_for(format: &str) -> Option<&'static DatePattern> {
    PATTERNS.iter().find(|p| p.format == format)
}

// RFC 3339 text may carry either `Z` or a numeric offset.
static RFC3339_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S%.f%:z"];

fn accepted_patterns(format: &str) -> impl Iterator<Item = &'static DatePattern> {
    let siblings: &'static [&'static str] = if RFC3339_FORMATS.iter().any(|f| *f == format) {
        &RFC3339_FORMATS
    } else {
        &[]
    };
    pattern_for(format)
        .into_iter()
        .chain(siblings.iter().filter_map(|f| pattern_for(f)))
}

/// All patterns `text` fits, in locale preference order. A year-first
/// match is never ambiguous and is returned alone.
pub fn matching_patterns(text: &str, order: DateOrder) -> Vec<&'static DatePattern> {
    if let Some(universal) = PATTERNS
        .iter()
        .filter(|p| p.family.is_none())
        .find(|p| p.matches(text))
    {
        return vec![universal];
    }
    let families = match order {
        DateOrder::MonthDayYear => [MDY, DMY],
        DateOrder::DayMonthYear | DateOrder::YearMonthDay => [DMY, MDY],
    };
    families
        .iter()
        .flat_map(|family| PATTERNS.iter().filter(move |p| p.family == *family))
        .filter(|p| p.matches(text))
        .collect()
}

#[derive(Debug, Default)]
pub struct DateTimeColumnDetector {
    pending: HashMap<String, Vec<&'static DatePattern>>,
}

impl DateTimeColumnDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect(&mut self, pair: &mut ColumnPair, text: &str, locale: &dyn LocaleServices) {
        let matches = matching_patterns(text, locale.date_order());
        let Some(first) = matches.first() else {
            return;
        };
        pair.set_data_type(DataType::Time);
        pair.target.format = Some(first.unit.display_format().to_string());
        if matches.len() == 1 {
            pair.source.format = Some(first.format.to_string());
            debug!(
                "Column '{}' detected as time with pattern '{}'",
                pair.name(),
                first.format
            );
        } else {
            debug!(
                "Column '{}' detected as time, {} candidate patterns remain",
                pair.name(),
                matches.len()
            );
            self.pending.insert(pair.name().to_string(), matches);
        }
    }

    /// Narrows the pending candidates of an ambiguous time column.
    pub fn refine_format(&mut self, pair: &mut ColumnPair, text: &str) {
        if pair.data_type() != Some(DataType::Time) || pair.has_fixed_format() {
            return;
        }
        let Some(candidates) = self.pending.get(pair.name()) else {
            return;
        };
        let narrowed = candidates
            .iter()
            .copied()
            .filter(|p| p.matches(text))
            .collect::<Vec<_>>();
        match narrowed.as_slice() {
            [] => {}
            [only] => {
                pair.source.format = Some(only.format.to_string());
                pair.target.format = Some(only.unit.display_format().to_string());
                self.pending.remove(pair.name());
                debug!(
                    "Column '{}' format fixed to '{}'",
                    pair.name(),
                    only.format
                );
            }
            [first, ..] => {
                pair.target.format = Some(first.unit.display_format().to_string());
                self.pending.insert(pair.name().to_string(), narrowed);
            }
        }
    }

    /// Whether `text` fits the column's fixed pattern or a pending candidate.
    pub fn matches(&self, pair: &ColumnPair, text: &str) -> bool {
        if let Some(format) = &pair.source.format {
            return accepted_patterns(format).any(|p| p.matches(text));
        }
        self.pending
            .get(pair.name())
            .is_some_and(|candidates| candidates.iter().any(|p| p.matches(text)))
    }

    pub fn forget(&mut self, name: &str) {
        self.pending.remove(name);
    }
}
