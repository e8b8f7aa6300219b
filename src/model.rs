use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Boolean,
    Time,
    Object,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Time => "time",
            DataType::Object => "object",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Millisecond,
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    pub fn display_format(&self) -> &'static str {
        match self {
            TimeUnit::Millisecond => "%Y-%m-%d %H:%M:%S%.3f",
            TimeUnit::Second => "%Y-%m-%d %H:%M:%S",
            TimeUnit::Minute => "%Y-%m-%d %H:%M",
            TimeUnit::Hour => "%Y-%m-%d %H:00",
            TimeUnit::Day => "%Y-%m-%d",
            TimeUnit::Month => "%Y-%m",
            TimeUnit::Year => "%Y",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "datatype")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub width: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

impl ColumnDescriptor {
    pub fn new(name: &str, data_type: Option<DataType>, width: usize) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            format: None,
            width,
            indexed: None,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub source: ColumnDescriptor,
    pub target: ColumnDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ColumnPair {
    pub fn new(name: &str, data_type: Option<DataType>, width: usize, indexed: bool) -> Self {
        let source = ColumnDescriptor::new(name, data_type, width);
        let mut target = source.clone();
        target.indexed = Some(indexed);
        Self {
            source,
            target,
            warning: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.source.data_type
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.source.data_type = Some(data_type);
        self.target.data_type = Some(data_type);
    }

    /// Relaxes the type on both sides and drops any format atomically.
    pub fn downgrade(&mut self, data_type: DataType) {
        self.set_data_type(data_type);
        self.source.format = None;
        self.target.format = None;
    }

    pub fn set_width(&mut self, width: usize) {
        self.source.width = width;
        self.target.width = width;
    }

    pub fn warn(&mut self, message: &str) {
        self.warning.get_or_insert_with(|| message.to_string());
    }

    pub fn has_fixed_format(&self) -> bool {
        self.source.format.is_some()
    }
}
