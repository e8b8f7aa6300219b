use chrono::NaiveDate;
use log::trace;

use crate::{
    classify::as_number,
    data::Value,
    locale::LocaleServices,
    model::{ColumnPair, DataType},
};

// Millisecond epochs only; second epochs look like ten digit identifiers.
#[derive(Debug, Clone)]
pub struct TimeGuesser {
    min_millis: i64,
    max_millis: i64,
}

impl TimeGuesser {
    pub fn with_window(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            min_millis: epoch_millis(start),
            max_millis: epoch_millis(end),
        }
    }

    pub fn looks_like_epoch(
        &self,
        pair: &ColumnPair,
        value: &Value,
        locale: &dyn LocaleServices,
    ) -> bool {
        if pair.data_type() != Some(DataType::Number) {
            return false;
        }
        let Some(number) = as_number(value, locale) else {
            return false;
        };
        if number.fract() != 0.0 || number <= 0.0 {
            return false;
        }
        let assumed = number >= self.min_millis as f64 && number < self.max_millis as f64;
        trace!(
            "Column '{}' value {number} {} a millisecond epoch",
            pair.name(),
            if assumed { "looks like" } else { "is not" }
        );
        assumed
    }
}

impl Default for TimeGuesser {
    fn default() -> Self {
        Self::with_window(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            NaiveDate::from_ymd_opt(2100, 1, 1).unwrap_or(NaiveDate::MAX),
        )
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}
