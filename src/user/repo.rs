use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::user::token;

/// Account record. Emails are stored normalized, so the UNIQUE constraint
/// on `email` doubles as the case-insensitive uniqueness invariant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// True when the error is the database rejecting a duplicate key, which on
/// the `users.email` constraint means a concurrent or repeated registration.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Patches `name` and/or `password_hash`; absent fields keep their value.
    /// Email is deliberately not updatable through this path.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash)
            WHERE id = $1
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl AuthToken {
    /// Returns the account's token, minting one on first login. The upsert
    /// keeps the token stable across repeat logins and serializes concurrent
    /// first logins on the `user_id` constraint.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
        let fresh = token::generate();
        let (value,): (String,) = sqlx::query_as(
            r#"
            INSERT INTO auth_tokens (token, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING token
            "#,
        )
        .bind(&fresh)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(value)
    }

    /// Resolves a presented token to its owning account.
    pub async fn resolve(db: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
    }
}
