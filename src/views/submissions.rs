use askama::Template;
use axum::extract::{Path, RawQuery, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::forms::date_filter::{DateRangeForm, SubmitTimeFilter};
use crate::forms::export::{self, ColumnPolicy, SUBMIT_TIME_FORMAT};
use crate::forms::pagination::{PageWindow, Paginator};
use crate::models::submission::decode_form_data;
use crate::state::SharedState;

struct SubmissionRow {
    submit_time: String,
    user: String,
    cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "forms/submissions.html")]
struct SubmissionsTemplate {
    user_name: String,
    page_title: String,
    date_from: String,
    date_to: String,
    date_from_error: String,
    date_to_error: String,
    columns: Vec<String>,
    rows: Vec<SubmissionRow>,
    number: i64,
    num_pages: i64,
    total: i64,
    start_index: i64,
    end_index: i64,
    previous_link: String,
    next_link: String,
    csv_link: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct SubmissionsParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub p: Option<String>,
    pub action: Option<String>,
}

impl SubmissionsParams {
    /// Parse the raw query string. A repeated key keeps its last value.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = SubmissionsParams::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "date_from" => &mut params.date_from,
                "date_to" => &mut params.date_to,
                "p" => &mut params.p,
                "action" => &mut params.action,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        params
    }
}

/// Submissions of one form page: a paginated listing, or a CSV export
/// of the whole filtered set when `action=CSV`.
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(page_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let params = SubmissionsParams::parse(query.as_deref());
    let page_id = Uuid::parse_str(&page_id)
        .map_err(|_| AppError::NotFound("Page not found".to_string()))?;
    let page = db::pages::find_by_id(&state.pool, page_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;

    let date_form = DateRangeForm::bind(params.date_from.as_deref(), params.date_to.as_deref());
    if !date_form.is_valid() {
        tracing::debug!(page_id = %page.id, errors = ?date_form.errors(), "Ignoring invalid date filter");
    }
    let filter = date_form.filter();

    if params.action.as_deref() == Some("CSV") {
        let submissions = db::submissions::list_for_export(&state.pool, page.id, &filter).await?;
        let body = export::write_csv(state.config.csv_columns, &submissions)?;

        tracing::info!(page_id = %page.id, rows = submissions.len(), "Exported submissions as CSV");

        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment;filename=export.csv"),
            ],
            body,
        )
            .into_response());
    }

    let total = db::submissions::count(&state.pool, page.id, &filter).await?;
    let window = Paginator::new(total, state.config.per_page).page(params.p.as_deref());

    let list_params = db::submissions::ListParams {
        page_id: page.id,
        filter,
        limit: window.limit,
        offset: window.offset,
    };
    let submissions = db::submissions::list(&state.pool, &list_params).await?;

    let decoded = submissions
        .iter()
        .map(|s| s.form_data().map(|data| (s, data)))
        .collect::<Result<Vec<_>, _>>()?;
    let columns = filtered_columns(&state, page.id, &filter).await?;

    let rows: Vec<SubmissionRow> = decoded
        .iter()
        .map(|(sub, data)| SubmissionRow {
            submit_time: sub.submit_time.format(SUBMIT_TIME_FORMAT).to_string(),
            user: sub.username.clone().unwrap_or_default(),
            cells: columns
                .iter()
                .map(|col| export::cell_value(data.get(col)))
                .collect(),
        })
        .collect();

    let links = Links::new(&date_form, &window);

    let template = SubmissionsTemplate {
        user_name: auth.name,
        page_title: page.title,
        date_from: date_form.raw_from.clone(),
        date_to: date_form.raw_to.clone(),
        date_from_error: date_form.error_for("date_from").unwrap_or_default().to_string(),
        date_to_error: date_form.error_for("date_to").unwrap_or_default().to_string(),
        columns,
        rows,
        number: window.number,
        num_pages: window.num_pages,
        total: window.count,
        start_index: window.start_index(),
        end_index: window.end_index(),
        previous_link: links.previous,
        next_link: links.next,
        csv_link: links.csv,
    };
    Ok(Html(template.render()?).into_response())
}

/// Columns of the whole filtered set, so every page matches the CSV export.
async fn filtered_columns(
    state: &SharedState,
    page_id: Uuid,
    filter: &SubmitTimeFilter,
) -> Result<Vec<String>, AppError> {
    let policy = state.config.csv_columns;
    let limit = match policy {
        ColumnPolicy::FirstRecord => Some(1),
        ColumnPolicy::Union => None,
    };

    let records = db::submissions::list_form_data(&state.pool, page_id, filter, limit)
        .await?
        .iter()
        .map(|raw| decode_form_data(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(export::discover_columns(policy, &records))
}

/// Query strings for navigation; each keeps the submitted date filter.
struct Links {
    previous: String,
    next: String,
    csv: String,
}

impl Links {
    fn new(form: &DateRangeForm, window: &PageWindow) -> Self {
        let with = |extra: (&str, String)| {
            let mut query = form_urlencoded::Serializer::new(String::new());
            if !form.raw_from.is_empty() {
                query.append_pair("date_from", &form.raw_from);
            }
            if !form.raw_to.is_empty() {
                query.append_pair("date_to", &form.raw_to);
            }
            query.append_pair(extra.0, &extra.1);
            format!("?{}", query.finish())
        };

        Links {
            previous: if window.has_previous() {
                with(("p", (window.number - 1).to_string()))
            } else {
                String::new()
            },
            next: if window.has_next() {
                with(("p", (window.number + 1).to_string()))
            } else {
                String::new()
            },
            csv: with(("action", "CSV".to_string())),
        }
    }
}
