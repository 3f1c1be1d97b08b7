use std::{
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const SENTINEL_PREFIX: &str = "TOTAL";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
        }
    }
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        match self {
            Value::String(s) => s.starts_with(SENTINEL_PREFIX),
            other => other.as_display().starts_with(SENTINEL_PREFIX),
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

pub fn is_sentinel_cell(cell: &Option<Value>) -> bool {
    cell.as_ref().is_some_and(Value::is_sentinel)
}

pub fn display_cell(cell: &Option<Value>) -> String {
    cell.as_ref().map(Value::as_display).unwrap_or_default()
}

pub fn normalize_datetime(value: NaiveDateTime) -> Value {
    if value.time() == NaiveTime::MIN {
        Value::Date(value.date())
    } else {
        Value::DateTime(value)
    }
}

pub fn excel_serial(value: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN);
    let elapsed = value - epoch;
    elapsed.num_milliseconds() as f64 / 86_400_000.0
}
