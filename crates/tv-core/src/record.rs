//! Record access and value coercion
//!
//! Rows are opaque to the engine. A row only has to answer "what is the value
//! at this key" (see [`Record`]); everything else (nested paths, string
//! rendering, numeric and date coercion) is interpreted here over
//! [`serde_json::Value`].

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// A row the pipeline can read values from.
///
/// `None` means the key is absent (undefined), `Some(Value::Null)` means it is
/// present but null. Both are treated as empty by the filter engine.
pub trait Record {
    /// Get the value stored under a single top-level key
    fn field(&self, key: &str) -> Option<Cow<'_, Value>>;

    /// Resolve a dot-separated path such as `"user.address.city"`.
    ///
    /// Missing intermediate objects resolve to `None` instead of failing.
    fn path(&self, path: &str) -> Option<Cow<'_, Value>> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let rest: Vec<&str> = segments.collect();

        match self.field(first)? {
            Cow::Borrowed(value) => walk(value, &rest).map(Cow::Borrowed),
            Cow::Owned(value) => walk(&value, &rest).cloned().map(Cow::Owned),
        }
    }
}

impl Record for Value {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        match self {
            Value::Object(map) => map.get(key).map(Cow::Borrowed),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx))
                .map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Record for Map<String, Value> {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, key: &str) -> Option<Cow<'_, Value>> {
        (**self).field(key)
    }

    fn path(&self, path: &str) -> Option<Cow<'_, Value>> {
        (**self).path(path)
    }
}

/// Walk the remaining path segments through nested objects and arrays
fn walk<'a>(mut value: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    for segment in segments {
        value = match value {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value)
}

/// Empty means absent, null, `""` or `[]`
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Truthiness used by boolean filters.
///
/// `false`, `0`, `NaN`, `""`, null and absent values are falsy; everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Render a value the way it is displayed and searched.
///
/// Absent and null values render as `""`, integral numbers drop the
/// fractional part, arrays join their items with `,`.
pub fn display_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Numeric coercion.
///
/// Absent → NaN, null → 0, booleans → 0/1, strings are trimmed and parsed
/// (empty → 0, unparsable → NaN), single-item arrays coerce their item.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(Some(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(f64::NAN),
    }
}

/// Calendar-date coercion used by date filters.
///
/// Accepts epoch milliseconds, RFC 3339 timestamps (converted to UTC),
/// `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`. The time of
/// day is discarded. Anything else is `None`.
pub fn to_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::Number(n) => {
            let millis = n.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            DateTime::<Utc>::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
        }
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

/// Parse a trimmed date or timestamp string
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
