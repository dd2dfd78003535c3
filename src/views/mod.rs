pub mod forms;
pub mod submissions;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// Admin screens. Every route here sits behind the admin access guard.
pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/forms/", get(forms::index))
        .route("/forms/types/{app_label}/{model}/", get(forms::type_index))
        .route("/forms/submissions/{page_id}/", get(submissions::list_submissions))
}
