use heck::ToSnakeCase;
use log::trace;

use crate::{
    classify::as_number,
    data::Value,
    locale::LocaleServices,
    model::{ColumnPair, TimeUnit},
};

const NON_TIMESTAMP_WORDS: &[&str] = &[
    "duration", "elapsed", "latency", "ttl", "timeout", "interval", "delay", "age", "count",
    "took", "wait", "runtime", "uptime", "offset", "size", "id",
];

const TEMPORAL_WORDS: &[&str] = &[
    "time", "timestamp", "ts", "epoch", "unix", "date", "datetime", "created", "updated",
    "modified", "deleted", "inserted", "started", "ended", "finished", "expires", "expiry",
    "birth", "born",
];

// Only temporal as the last word: `created_at`, `updated_on`.
const TEMPORAL_SUFFIXES: &[&str] = &["at", "on"];

const YEAR_WORDS: &[&str] = &["year", "yr", "yyyy"];

const MILLISECOND_FLOOR: f64 = 1e11;
const SECOND_FLOOR: f64 = 1e8;

#[derive(Debug, Clone, Default)]
pub struct TimeUnitDetector;

impl TimeUnitDetector {
    pub fn from_column_name(
        &self,
        pair: &ColumnPair,
        value: &Value,
        current: Option<TimeUnit>,
        locale: &dyn LocaleServices,
    ) -> Option<TimeUnit> {
        let words = name_words(pair.name());
        if words.iter().any(|w| NON_TIMESTAMP_WORDS.contains(&w.as_str())) {
            return None;
        }
        let number = as_number(value, locale).filter(|n| n.fract() == 0.0 && *n >= 0.0)?;

        let temporal = words.iter().any(|w| TEMPORAL_WORDS.contains(&w.as_str()))
            || words
                .last()
                .is_some_and(|w| TEMPORAL_SUFFIXES.contains(&w.as_str()));
        let year_named = words.iter().any(|w| YEAR_WORDS.contains(&w.as_str()));
        let mut detected = None;
        if temporal {
            detected = words
                .iter()
                .find_map(|w| unit_word(w))
                .or_else(|| unit_from_magnitude(number));
        }
        if detected.is_none() && year_named && (1000.0..=9999.0).contains(&number) {
            detected = Some(TimeUnit::Year);
        }

        trace!(
            "Column '{}' name words {:?} suggest unit {:?}",
            pair.name(),
            words,
            detected
        );
        detected.or(current)
    }
}

fn name_words(name: &str) -> Vec<String> {
    name.to_snake_case()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn unit_word(word: &str) -> Option<TimeUnit> {
    match word {
        "ms" | "msec" | "msecs" | "millis" | "milli" | "millisecond" | "milliseconds" => {
            Some(TimeUnit::Millisecond)
        }
        "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Second),
        "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minute),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hour),
        "d" | "day" | "days" => Some(TimeUnit::Day),
        _ => None,
    }
}

fn unit_from_magnitude(number: f64) -> Option<TimeUnit> {
    if number >= MILLISECOND_FLOOR {
        Some(TimeUnit::Millisecond)
    } else if number >= SECOND_FLOOR {
        Some(TimeUnit::Second)
    } else {
        None
    }
}
