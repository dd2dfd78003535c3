use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub url_path: String,
    pub content_type_id: Uuid,
    pub live: bool,
    pub created_at: DateTime<Utc>,
}

/// Index row: a form page with its type and how many submissions it holds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FormPageSummary {
    pub id: Uuid,
    pub title: String,
    pub url_path: String,
    pub live: bool,
    pub app_label: String,
    pub model: String,
    pub submission_count: i64,
}
