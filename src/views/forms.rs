use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::FormPageSummary;
use crate::state::SharedState;

struct FormPageRow {
    id: String,
    title: String,
    url_path: String,
    type_label: String,
    live: bool,
    submission_count: i64,
}

impl From<FormPageSummary> for FormPageRow {
    fn from(page: FormPageSummary) -> Self {
        FormPageRow {
            id: page.id.to_string(),
            title: page.title,
            url_path: page.url_path,
            type_label: format!("{}.{}", page.app_label, page.model),
            live: page.live,
            submission_count: page.submission_count,
        }
    }
}

#[derive(Template)]
#[template(path = "forms/index.html")]
struct IndexTemplate {
    user_name: String,
    heading: String,
    pages: Vec<FormPageRow>,
}

/// All pages of every form-capable type.
pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let pages = db::pages::list_form_pages(&state.pool, &state.form_types).await?;

    let template = IndexTemplate {
        user_name: auth.name,
        heading: "Forms".to_string(),
        pages: pages.into_iter().map(FormPageRow::from).collect(),
    };
    Ok(Html(template.render()?))
}

/// Pages of one form type, addressed by its natural key.
pub async fn type_index(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((app_label, model)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let content_type = state
        .form_types
        .resolve(&state.pool, &app_label, &model)
        .await?;

    let pages = db::pages::list_by_content_type(&state.pool, content_type.id).await?;

    let template = IndexTemplate {
        user_name: auth.name,
        heading: format!("Forms: {}", content_type.key()),
        pages: pages.into_iter().map(FormPageRow::from).collect(),
    };
    Ok(Html(template.render()?))
}
