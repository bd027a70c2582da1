//! Authorization guards.
//!
//! There are two levels: any authenticated user (extract `CurrentUser`
//! directly) and admin (`RequireAdmin`). The admin check reads the flag
//! loaded from the database row, never a token claim.

use crate::core::error::AppError;
use crate::features::auth::model::CurrentUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_user_auth};
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.email
    }

    fn router() -> Router {
        Router::new().route("/admin", get(admin_only))
    }

    #[tokio::test]
    async fn admin_passes() {
        let server = TestServer::new(with_admin_auth(router())).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let server = TestServer::new(with_user_auth(router())).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn unauthenticated_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        let response = server.get("/admin").await;
        response.assert_status_unauthorized();
    }
}
