use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::extractor::AuthUser;
use crate::auth::Capability;
use crate::error::AppError;

/// Route guard for the admin screens: the principal must hold `access_admin`.
///
/// Runs before any handler, so a rejected request never reaches the store.
/// The resolved principal is handed on through request extensions.
pub async fn require_admin_access(
    auth: AuthUser,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = auth.require(Capability::AccessAdmin) {
        tracing::warn!(user_id = %auth.user_id, path = %req.uri().path(), "Admin access denied");
        return Err(err);
    }

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
