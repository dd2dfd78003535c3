use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Posted form fields, in the order they were submitted.
pub type FormData = serde_json::Map<String, Value>;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub page_id: Uuid,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub form_data: String,
    pub submit_time: DateTime<Utc>,
}

impl Submission {
    /// Decode the stored JSON text. A non-object payload decodes as no fields.
    pub fn form_data(&self) -> Result<FormData, serde_json::Error> {
        decode_form_data(&self.form_data)
    }
}

pub fn decode_form_data(raw: &str) -> Result<FormData, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Ok(FormData::new()),
    }
}
