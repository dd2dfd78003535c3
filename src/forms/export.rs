use serde_json::Value;

use crate::error::AppError;
use crate::models::{FormData, Submission};

pub const FIXED_HEADERS: [&str; 2] = ["Submission date", "user"];

pub const SUBMIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// How the data columns of an export are discovered from the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnPolicy {
    /// Keys of the first record, in that record's order. Keys that only
    /// appear in later records are not exported.
    #[default]
    FirstRecord,
    /// Every key across all records, in first-seen order.
    Union,
}

impl ColumnPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "first-record" => Some(ColumnPolicy::FirstRecord),
            "union" => Some(ColumnPolicy::Union),
            _ => None,
        }
    }
}

pub fn discover_columns<'a, I>(policy: ColumnPolicy, records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a FormData>,
{
    let mut records = records.into_iter();
    match policy {
        ColumnPolicy::FirstRecord => records
            .next()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default(),
        ColumnPolicy::Union => {
            let mut keys: Vec<String> = Vec::new();
            for record in records {
                for key in record.keys() {
                    if !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
            }
            keys
        }
    }
}

/// Render one form value as a cell. Missing and null values are empty.
pub fn cell_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) if items.iter().all(is_scalar) => items
            .iter()
            .map(|v| cell_value(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Serialize submissions as CSV: fixed columns first, then discovered ones.
pub fn write_csv(policy: ColumnPolicy, submissions: &[Submission]) -> Result<Vec<u8>, AppError> {
    let decoded = submissions
        .iter()
        .map(|s| s.form_data().map(|data| (s, data)))
        .collect::<Result<Vec<_>, _>>()?;

    let columns = discover_columns(policy, decoded.iter().map(|(_, data)| data));

    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = FIXED_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(columns.iter().cloned());
    writer.write_record(header)?;

    for (submission, data) in &decoded {
        let mut row = Vec::with_capacity(FIXED_HEADERS.len() + columns.len());
        row.push(submission.submit_time.format(SUBMIT_TIME_FORMAT).to_string());
        row.push(submission.username.clone().unwrap_or_default());
        row.extend(columns.iter().map(|col| cell_value(data.get(col))));
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Csv(csv::Error::from(e.into_error())))
}
