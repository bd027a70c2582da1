use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// The acting user, loaded from the `users` row during authentication and
/// attached to the request extensions. The admin flag reflects the stored
/// row at request time, not whatever the token was minted with.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}
