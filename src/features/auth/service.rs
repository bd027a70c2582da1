use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
};
use crate::features::auth::jwt::JwtValidator;
use crate::features::auth::model::CurrentUser;
use crate::shared::constants::RESET_TOKEN_TTL_SECS;

/// Registration, login and credential-recovery flows.
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtValidator>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtValidator>) -> Self {
        Self { pool, jwt }
    }

    pub async fn register(&self, dto: RegisterRequestDto) -> Result<()> {
        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;
        let verification_token = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, verification_token)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(&verification_token)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email already registered"))?;

        // Email delivery is an external collaborator; surface the token in
        // the logs so operators can complete the flow without a provider.
        info!("User registered: {} (verification token issued)", dto.email);

        Ok(())
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let row = sqlx::query_as::<_, LoginRow>(
            "SELECT id, name, email, password_hash, is_admin FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await?;

        // Unknown email and wrong password produce the same response; only
        // the logs distinguish them.
        let row = row.ok_or_else(|| {
            warn!("Login failed: no user with email {}", dto.email);
            AppError::Unauthorized("Invalid credentials".to_string())
        })?;

        if !verify_password(&dto.password, &row.password_hash)? {
            warn!("Login failed: invalid password for {}", dto.email);
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = self.jwt.issue(row.id)?;
        info!("User {} logged in", row.email);

        Ok(AuthResponseDto {
            token,
            user: AuthUserDto {
                id: row.id,
                name: row.name,
                email: row.email,
                is_admin: row.is_admin,
            },
        })
    }

    /// Issue a single-use reset token with a one-hour window.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let user_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with this email".to_string()))?;

        let reset_token = Uuid::new_v4().to_string();
        let expiry = Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS);

        sqlx::query("UPDATE users SET reset_token = $1, reset_token_expiry = $2 WHERE id = $3")
            .bind(&reset_token)
            .bind(expiry)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!("Password reset token issued for {}", email);

        Ok(())
    }

    /// Consume a reset token: re-hash the new password and clear the token.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE reset_token = $1 AND reset_token_expiry > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid or expired reset token".to_string()))?;

        let password_hash = hash_password(password)?;

        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, reset_token = NULL, reset_token_expiry = NULL, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(&password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        info!("Password reset completed for user {}", user_id);

        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        let user_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE verification_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| {
                    AppError::Validation("Invalid verification token".to_string())
                })?;

        sqlx::query(
            "UPDATE users SET is_verified = TRUE, verification_token = NULL WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn me(&self, user: &CurrentUser) -> Result<MeResponseDto> {
        sqlx::query_as::<_, MeResponseDto>(
            r#"
            SELECT id, name, email, is_admin, bio, avatar_url, is_verified
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[derive(sqlx::FromRow)]
struct LoginRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    is_admin: bool,
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        // low cost keeps the test fast; production uses DEFAULT_COST
        let hash = bcrypt::hash("hunter2-hunter2", 4).unwrap();
        assert!(verify_password("hunter2-hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = bcrypt::hash("same-password", 4).unwrap();
        let b = bcrypt::hash("same-password", 4).unwrap();
        assert_ne!(a, b);
    }
}
