use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt::{self, Claims};
use crate::auth::Capability;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub capabilities: Vec<String>,
    pub is_superuser: bool,
}

impl AuthUser {
    /// Superusers hold every capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.is_superuser || self.capabilities.iter().any(|c| c == capability.as_str())
    }

    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing capability: {}",
                capability.as_str()
            )))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            user_id: claims.sub,
            name: claims.name,
            capabilities: claims.perms,
            is_superuser: claims.su,
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the access guard
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let claims = jwt::decode_token(token, &state.config.jwt_secret)
                    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

                return Ok(claims.into());
            }
        }

        // Try cookie-based auth
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get("access_token") {
            let claims = jwt::decode_token(cookie.value(), &state.config.jwt_secret)
                .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

            return Ok(claims.into());
        }

        Err(AppError::Unauthorized(
            "Missing authentication token".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(capabilities: &[&str], is_superuser: bool) -> AuthUser {
        AuthUser {
            user_id: Uuid::nil(),
            name: "tester".to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            is_superuser,
        }
    }

    #[test]
    fn capability_checks() {
        assert!(user(&["access_admin"], false).has_capability(Capability::AccessAdmin));
        assert!(user(&[], true).has_capability(Capability::AccessAdmin));
        assert!(!user(&["publish_pages"], false).has_capability(Capability::AccessAdmin));
        assert!(matches!(
            user(&[], false).require(Capability::AccessAdmin),
            Err(AppError::Forbidden(_))
        ));
    }
}
