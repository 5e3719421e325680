use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde_json::{Map, Number, Value};
use tracing::info;
use tv_core::{ColumnDescriptor, FilterType};

use crate::DataError;

/// Rows sampled for type detection
const MAX_SAMPLE_ROWS: usize = 5000;

/// Cell texts read as null
const NULL_PATTERNS: &[&str] = &["", "-", "n/a", "null", "none"];

fn is_null(value: &str) -> bool {
    let value = value.trim();
    NULL_PATTERNS.iter().any(|p| value.eq_ignore_ascii_case(p))
}

/// Detected type of a CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Date,
    Text,
}

impl ColumnKind {
    /// Filter type offered for columns of this kind
    pub fn filter_type(self) -> FilterType {
        match self {
            ColumnKind::Integer | ColumnKind::Float => FilterType::Number,
            ColumnKind::Boolean => FilterType::Boolean,
            ColumnKind::Date => FilterType::Date,
            ColumnKind::Text => FilterType::Text,
        }
    }
}

/// CSV file loaded into JSON rows
pub struct CsvSource {
    path: Option<PathBuf>,
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Value>,
}

impl CsvSource {
    /// Load a CSV file off the async runtime
    pub async fn load(path: PathBuf) -> Result<Self, DataError> {
        let source = tokio::task::spawn_blocking({
            let path = path.clone();
            move || -> Result<Self, DataError> {
                let file = std::fs::File::open(&path)?;
                Self::from_reader(file)
            }
        })
        .await??;

        info!("Loaded {} rows with {} columns from {}", source.rows.len(), source.headers.len(), path.display());
        Ok(Self {
            path: Some(path),
            ..source
        })
    }

    /// Parse CSV text with a header line
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            records.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        let sample = &records[..records.len().min(MAX_SAMPLE_ROWS)];
        let kinds: Vec<ColumnKind> = (0..headers.len()).map(|idx| detect_column_kind(sample, idx)).collect();

        let rows = records
            .iter()
            .map(|record| {
                let mut row = Map::new();
                for (idx, header) in headers.iter().enumerate() {
                    let cell = record.get(idx).map(String::as_str).unwrap_or("");
                    row.insert(header.clone(), convert_cell(cell, kinds[idx]));
                }
                Value::Object(row)
            })
            .collect();

        Ok(Self {
            path: None,
            headers,
            kinds,
            rows,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Value> {
        self.rows
    }

    /// One filterable column per header, typed from the detected kind
    pub fn column_descriptors(&self) -> Vec<ColumnDescriptor<Value>> {
        self.headers
            .iter()
            .zip(&self.kinds)
            .map(|(header, kind)| ColumnDescriptor::new(header.clone()).filterable(kind.filter_type()))
            .collect()
    }
}

/// Detect column type from sample data
fn detect_column_kind(samples: &[Vec<String>], col_idx: usize) -> ColumnKind {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;
    let mut is_date = true;
    let mut seen = false;

    for row in samples {
        let Some(value) = row.get(col_idx) else { continue };
        if is_null(value) {
            continue;
        }
        seen = true;
        let value = value.trim();

        if is_int && value.parse::<i64>().is_err() {
            is_int = false;
        }
        if is_float && value.parse::<f64>().is_err() {
            is_float = false;
        }
        if is_bool && !matches!(value.to_ascii_lowercase().as_str(), "true" | "false") {
            is_bool = false;
        }
        if is_date && tv_core::record::parse_date(value).is_none() {
            is_date = false;
        }
    }

    if !seen {
        ColumnKind::Text
    } else if is_int {
        ColumnKind::Integer
    } else if is_float {
        ColumnKind::Float
    } else if is_bool {
        ColumnKind::Boolean
    } else if is_date {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}

fn convert_cell(cell: &str, kind: ColumnKind) -> Value {
    if is_null(cell) {
        return Value::Null;
    }
    let trimmed = cell.trim();

    match kind {
        ColumnKind::Integer => trimmed.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        ColumnKind::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnKind::Boolean => Value::Bool(trimmed.eq_ignore_ascii_case("true")),
        // Dates stay strings; the filter engine parses them on demand
        ColumnKind::Date | ColumnKind::Text => Value::String(cell.to_string()),
    }
}
