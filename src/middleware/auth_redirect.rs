use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::state::SharedState;

/// Middleware that redirects 401 responses to the login page for browser requests.
pub async fn redirect_unauthorized(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    let next_path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        Redirect::to(&login_redirect(&state.config.login_url, &next_path)).into_response()
    } else {
        response
    }
}

fn login_redirect(login_url: &str, next_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next_path)
        .finish();
    let sep = if login_url.contains('?') { '&' } else { '?' };
    format!("{login_url}{sep}{query}")
}
