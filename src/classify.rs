use crate::{data::Value, locale::LocaleServices, model::DataType};

pub fn classify(value: &Value, locale: &dyn LocaleServices) -> Option<DataType> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Boolean(_) => Some(DataType::Boolean),
        Value::Integer(_) | Value::Float(_) => Some(DataType::Number),
        Value::DateTime(_) => Some(DataType::Time),
        Value::Object(_) => Some(DataType::Object),
        Value::String(s) => {
            if locale.parse_number(s).is_some() {
                Some(DataType::Number)
            } else {
                Some(DataType::Text)
            }
        }
    }
}

pub fn as_number(value: &Value, locale: &dyn LocaleServices) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) if f.is_finite() => Some(*f),
        Value::String(s) => locale.parse_number(s),
        _ => None,
    }
}

pub fn is_integer(value: &Value, locale: &dyn LocaleServices) -> bool {
    match value {
        Value::Integer(_) => true,
        _ => as_number(value, locale).is_some_and(|n| n.fract() == 0.0),
    }
}

pub fn count_digits(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}
