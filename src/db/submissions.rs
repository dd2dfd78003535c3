use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::forms::date_filter::SubmitTimeFilter;
use crate::models::Submission;

const SELECT_SUBMISSIONS: &str = "SELECT s.id, s.page_id, s.user_id, u.username, s.form_data, s.submit_time
     FROM form_submissions s
     LEFT JOIN users u ON s.user_id = u.id";

// $2: submit_time >= , $3: submit_time < , $4: submit_time <=
const FILTER_CLAUSE: &str = "WHERE s.page_id = $1
       AND ($2::timestamptz IS NULL OR s.submit_time >= $2)
       AND ($3::timestamptz IS NULL OR s.submit_time < $3)
       AND ($4::timestamptz IS NULL OR s.submit_time <= $4)";

type Bounds = (
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
);

fn bounds(filter: &SubmitTimeFilter) -> Bounds {
    match *filter {
        SubmitTimeFilter::Unbounded => (None, None, None),
        SubmitTimeFilter::From(from) => (Some(from), None, None),
        SubmitTimeFilter::UpTo(until) => (None, None, Some(until)),
        SubmitTimeFilter::Between { from, until } => (Some(from), Some(until), None),
    }
}

pub struct ListParams {
    pub page_id: Uuid,
    pub filter: SubmitTimeFilter,
    pub limit: i64,
    pub offset: i64,
}

pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Vec<Submission>, sqlx::Error> {
    let (from, before, up_to) = bounds(&params.filter);

    sqlx::query_as::<_, Submission>(&format!(
        "{SELECT_SUBMISSIONS}
         {FILTER_CLAUSE}
         ORDER BY s.submit_time, s.id LIMIT $5 OFFSET $6"
    ))
    .bind(params.page_id)
    .bind(from)
    .bind(before)
    .bind(up_to)
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
}

pub async fn count(
    pool: &PgPool,
    page_id: Uuid,
    filter: &SubmitTimeFilter,
) -> Result<i64, sqlx::Error> {
    let (from, before, up_to) = bounds(filter);

    let row: (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM form_submissions s {FILTER_CLAUSE}"
    ))
    .bind(page_id)
    .bind(from)
    .bind(before)
    .bind(up_to)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Every filtered submission of a page, unpaginated.
pub async fn list_for_export(
    pool: &PgPool,
    page_id: Uuid,
    filter: &SubmitTimeFilter,
) -> Result<Vec<Submission>, sqlx::Error> {
    let (from, before, up_to) = bounds(filter);

    sqlx::query_as::<_, Submission>(&format!(
        "{SELECT_SUBMISSIONS}
         {FILTER_CLAUSE}
         ORDER BY s.submit_time, s.id"
    ))
    .bind(page_id)
    .bind(from)
    .bind(before)
    .bind(up_to)
    .fetch_all(pool)
    .await
}

/// Raw form data of the filtered set in listing order; `limit` of `None` reads all.
pub async fn list_form_data(
    pool: &PgPool,
    page_id: Uuid,
    filter: &SubmitTimeFilter,
    limit: Option<i64>,
) -> Result<Vec<String>, sqlx::Error> {
    let (from, before, up_to) = bounds(filter);

    sqlx::query_scalar::<_, String>(&format!(
        "SELECT s.form_data FROM form_submissions s
         {FILTER_CLAUSE}
         ORDER BY s.submit_time, s.id LIMIT $5"
    ))
    .bind(page_id)
    .bind(from)
    .bind(before)
    .bind(up_to)
    .bind(limit)
    .fetch_all(pool)
    .await
}
