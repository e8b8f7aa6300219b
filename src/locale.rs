use std::{fmt, str::FromStr};

use log::debug;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

pub trait LocaleServices {
    fn tag(&self) -> &str;

    fn parse_number(&self, text: &str) -> Option<f64>;

    fn date_order(&self) -> DateOrder;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Locale tag must not be empty")]
    Empty,
    #[error("Malformed locale tag '{0}'")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    decimal_separator: char,
    grouping_separators: &'static [char],
    date_order: DateOrder,
}

const COMMA_GROUPING: &[char] = &[','];
const DOT_GROUPING: &[char] = &['.'];
const SPACE_GROUPING: &[char] = &[' ', '\u{a0}', '\u{202f}'];
const APOSTROPHE_GROUPING: &[char] = &['\'', '\u{2019}'];

impl Locale {
    pub fn en_us() -> Self {
        Self {
            tag: "en-US".to_string(),
            decimal_separator: '.',
            grouping_separators: COMMA_GROUPING,
            date_order: DateOrder::MonthDayYear,
        }
    }

    fn for_parts(tag: String, language: &str, region: Option<&str>) -> Self {
        use DateOrder::*;
        let (decimal_separator, grouping_separators, date_order) = match (language, region) {
            ("en", Some("US" | "PH") | None) => ('.', COMMA_GROUPING, MonthDayYear),
            ("en", Some("CA")) => ('.', COMMA_GROUPING, YearMonthDay),
            ("en", _) => ('.', COMMA_GROUPING, DayMonthYear),
            ("de" | "it" | "fr" | "rm", Some("CH" | "LI")) => ('.', APOSTROPHE_GROUPING, DayMonthYear),
            ("fr", _) => (',', SPACE_GROUPING, DayMonthYear),
            ("de" | "it" | "es" | "nl" | "pt" | "da" | "id" | "tr" | "el" | "ro" | "hr" | "sl", _) => {
                (',', DOT_GROUPING, DayMonthYear)
            }
            ("ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk" | "bg" | "et", _) => {
                (',', SPACE_GROUPING, DayMonthYear)
            }
            ("hu" | "lt", _) => (',', SPACE_GROUPING, YearMonthDay),
            ("ja" | "zh" | "ko", _) => ('.', COMMA_GROUPING, YearMonthDay),
            _ => {
                debug!("No number conventions known for locale '{tag}', using English defaults");
                ('.', COMMA_GROUPING, MonthDayYear)
            }
        };
        Self {
            tag,
            decimal_separator,
            grouping_separators,
            date_order,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::Empty);
        }
        let mut parts = trimmed.split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LocaleError::Malformed(trimmed.to_string()));
        }
        let mut region = None;
        for part in parts {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LocaleError::Malformed(trimmed.to_string()));
            }
            // Script subtags (e.g. `Latn`) are skipped; the first 2-letter or 3-digit subtag is the region.
            if region.is_none()
                && (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic())
                    || part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
            {
                region = Some(part.to_ascii_uppercase());
            }
        }
        let tag = match &region {
            Some(region) => format!("{language}-{region}"),
            None => language.clone(),
        };
        Ok(Locale::for_parts(tag, &language, region.as_deref()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl LocaleServices for Locale {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn parse_number(&self, text: &str) -> Option<f64> {
        parse_localized_number(text, self.decimal_separator, self.grouping_separators)
    }

    fn date_order(&self) -> DateOrder {
        self.date_order
    }
}

/// Parses `text` as a decimal number with optional sign, grouped integer
/// digits, fraction and exponent. Grouping must be in blocks of three and
/// multi-digit integers must not start with `0`, so codes like `007` stay
/// text.
pub fn parse_localized_number(text: &str, decimal: char, grouping: &[char]) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, body) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let (integer_part, fraction_part) = match mantissa.split_once(decimal) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };

    let integer_digits = parse_grouped_integer(integer_part, grouping)?;
    if let Some(fraction) = fraction_part
        && !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let fraction_digits = fraction_part.unwrap_or_default();
    if integer_digits.is_empty() && fraction_digits.is_empty() {
        return None;
    }
    if fraction_part.is_none()
        && exponent.is_none()
        && integer_digits.len() > 1
        && integer_digits.starts_with('0')
    {
        return None;
    }

    let mut normalized = String::with_capacity(trimmed.len() + 2);
    if negative {
        normalized.push('-');
    }
    if integer_digits.is_empty() {
        normalized.push('0');
    } else {
        normalized.push_str(&integer_digits);
    }
    if !fraction_digits.is_empty() {
        normalized.push('.');
        normalized.push_str(fraction_digits);
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        normalized.push('e');
        normalized.push_str(exponent);
    }

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_grouped_integer(text: &str, grouping: &[char]) -> Option<String> {
    if !text.contains(grouping) {
        return text
            .chars()
            .all(|c| c.is_ascii_digit())
            .then(|| text.to_string());
    }
    let groups = text.split(grouping).collect::<Vec<_>>();
    let (first, rest) = groups.split_first()?;
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !rest
        .iter()
        .all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    Some(groups.concat())
}
