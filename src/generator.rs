//! Column mapping generation over a document sample.
//!
//! [`ColumnMappingGenerator::generate`] is the only entry point of the
//! inference engine. Every observed value is folded into the pair of its
//! field: classification, then type refinement, then width and index
//! bookkeeping. Pairs come back in first-seen field order.
//!
//! ## Type precedence
//!
//! - OBJECT and BOOLEAN never merge with anything else.
//! - A TIME column accepts integer numbers; a fractional number downgrades it
//!   to NUMBER and attaches [`INCOMPATIBLE_DATA_TYPES`].
//! - Any other conflict collapses the column to TEXT for good.
//! - NUMBER and TEXT columns get one chance, right after their type first
//!   resolves, to be promoted to TIME.

use std::{collections::HashMap, fmt::Write as _};

use log::{debug, trace};

use crate::{
    classify::{classify, count_digits, is_integer},
    data::{Document, Value},
    datetime::DateTimeColumnDetector,
    locale::LocaleServices,
    model::{ColumnPair, DataType, TimeUnit},
    time_guess::TimeGuesser,
    time_unit::TimeUnitDetector,
};

pub const INCOMPATIBLE_DATA_TYPES: &str = "Column contains values of incompatible data types";
pub const MIN_WIDTH: usize = 10;
pub const MAX_WIDTH: usize = 300;
pub const MAX_TEXT_LENGTH_TO_BE_INDEXED: usize = 100;
const DATESTRING_MIN_EXPECTED_DIGITS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct ColumnMappingGenerator {
    time_guesser: TimeGuesser,
    time_unit_detector: TimeUnitDetector,
}

impl ColumnMappingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_guesser(time_guesser: TimeGuesser) -> Self {
        Self {
            time_guesser,
            ..Self::default()
        }
    }

    pub fn generate(&self, documents: &[Document], locale: &dyn LocaleServices) -> Vec<ColumnPair> {
        if documents.is_empty() {
            return Vec::new();
        }
        let mut inference = Inference {
            generator: self,
            locale,
            date_time_detector: DateTimeColumnDetector::new(),
        };
        let mut pairs: Vec<ColumnPair> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for document in documents {
            for (name, value) in document.iter() {
                match positions.get(name) {
                    Some(&idx) => inference.refine(&mut pairs[idx], value),
                    None => {
                        positions.insert(name.to_string(), pairs.len());
                        pairs.push(inference.create_pair(name, value));
                    }
                }
            }
        }
        for pair in pairs.iter_mut().filter(|p| p.data_type().is_none()) {
            pair.set_data_type(DataType::Text);
        }
        debug!(
            "Generated {} column pair(s) from {} document(s) using locale '{}'",
            pairs.len(),
            documents.len(),
            locale.tag()
        );
        pairs
    }
}

struct Inference<'a> {
    generator: &'a ColumnMappingGenerator,
    locale: &'a dyn LocaleServices,
    date_time_detector: DateTimeColumnDetector,
}

impl Inference<'_> {
    fn create_pair(&mut self, name: &str, value: &Value) -> ColumnPair {
        let data_type = classify(value, self.locale);
        let mut pair = ColumnPair::new(name, data_type, MIN_WIDTH, shall_be_indexed(value));
        if let Some(data_type) = data_type {
            self.sharpen(&mut pair, data_type, value);
        }
        let width = compute_width(value, &pair);
        pair.set_width(width);
        trace!("Column '{name}' created as {:?} with width {width}", pair.data_type());
        pair
    }

    fn refine(&mut self, pair: &mut ColumnPair, value: &Value) {
        let Some(data_type) = self.observed_type(pair, value) else {
            return;
        };
        match pair.data_type() {
            None => {
                pair.set_data_type(data_type);
                self.sharpen(pair, data_type, value);
            }
            Some(DataType::Time) if data_type == DataType::Number => {
                if !is_integer(value, self.locale) {
                    pair.warn(INCOMPATIBLE_DATA_TYPES);
                    self.downgrade(pair, DataType::Number);
                }
            }
            Some(current) if current != data_type => {
                if current == DataType::Time {
                    pair.warn(INCOMPATIBLE_DATA_TYPES);
                }
                self.downgrade(pair, DataType::Text);
            }
            Some(DataType::Time) if !pair.has_fixed_format() => {
                if let Value::String(text) = value {
                    self.date_time_detector.refine_format(pair, text);
                }
            }
            Some(_) => {}
        }
        let width = pair.target.width.max(compute_width(value, pair));
        pair.set_width(width);
        if pair.target.is_indexed() && !shall_be_indexed(value) {
            debug!("Column '{}' no longer qualifies for indexing", pair.name());
            pair.target.indexed = Some(false);
        }
    }

    /// Classifies `value`, counting text that fits the column's date
    /// patterns as time evidence.
    fn observed_type(&self, pair: &ColumnPair, value: &Value) -> Option<DataType> {
        let data_type = classify(value, self.locale)?;
        if data_type == DataType::Text
            && pair.data_type() == Some(DataType::Time)
            && let Value::String(text) = value
            && self.date_time_detector.matches(pair, text)
        {
            return Some(DataType::Time);
        }
        Some(data_type)
    }

    fn sharpen(&mut self, pair: &mut ColumnPair, data_type: DataType, value: &Value) {
        match data_type {
            DataType::Time => {
                pair.target.format = Some(TimeUnit::Second.display_format().to_string());
            }
            DataType::Number | DataType::Text => self.detect_date_time(pair, value),
            DataType::Boolean | DataType::Object => {}
        }
    }

    fn detect_date_time(&mut self, pair: &mut ColumnPair, value: &Value) {
        match (pair.data_type(), value) {
            (Some(DataType::Text), Value::String(text))
                if count_digits(text) >= DATESTRING_MIN_EXPECTED_DIGITS =>
            {
                self.date_time_detector.detect(pair, text, self.locale);
            }
            (Some(DataType::Number), _) => self.detect_date_time_from_number(pair, value),
            _ => {}
        }
    }

    fn detect_date_time_from_number(&self, pair: &mut ColumnPair, value: &Value) {
        let generator = self.generator;
        if generator.time_guesser.looks_like_epoch(pair, value, self.locale) {
            debug!("Column '{}' promoted to time from epoch magnitude", pair.name());
            pair.set_data_type(DataType::Time);
            pair.target.format = Some(TimeUnit::Second.display_format().to_string());
        } else if let Some(unit) =
            generator.time_unit_detector.from_column_name(pair, value, None, self.locale)
        {
            debug!("Column '{}' promoted to time by its name ({unit})", pair.name());
            pair.set_data_type(DataType::Time);
            pair.target.format = Some(unit.display_format().to_string());
        }
    }

    fn downgrade(&mut self, pair: &mut ColumnPair, data_type: DataType) {
        if pair.data_type() != Some(data_type) {
            debug!(
                "Column '{}' downgraded from {:?} to {data_type}",
                pair.name(),
                pair.data_type()
            );
        }
        pair.downgrade(data_type);
        self.date_time_detector.forget(pair.name());
    }
}

pub fn generate(documents: &[Document], locale: &dyn LocaleServices) -> Vec<ColumnPair> {
    ColumnMappingGenerator::new().generate(documents, locale)
}

fn shall_be_indexed(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(object) => serde_json::to_string_pretty(object)
            .is_ok_and(|text| text.chars().count() <= MAX_TEXT_LENGTH_TO_BE_INDEXED),
        Value::String(text) => text.chars().count() <= MAX_TEXT_LENGTH_TO_BE_INDEXED,
        _ => true,
    }
}

fn compute_width(value: &Value, pair: &ColumnPair) -> usize {
    let mut width = MIN_WIDTH;
    if !value.is_truthy() {
        return width;
    }
    let formatted = match (value, &pair.target.format) {
        (Value::DateTime(dt), Some(format)) => {
            let mut rendered = String::new();
            write!(rendered, "{}", dt.format(format)).ok().map(|_| rendered)
        }
        _ if pair.target.data_type != Some(DataType::Boolean) => {
            let display = value.as_display();
            (display.chars().count() > width).then_some(display)
        }
        _ => None,
    };
    if let Some(formatted) = formatted {
        width = formatted.chars().count().clamp(MIN_WIDTH, MAX_WIDTH);
    }
    width
}
