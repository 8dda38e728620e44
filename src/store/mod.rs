//! Credential store access (Postgres via sqlx).
//!
//! The pool is acquired lazily; routes that never touch the store keep
//! serving when the database is unreachable.

use sqlx::{PgPool, Row};
use tracing::instrument;

/// A stored user account. `role` is `"user"` for every account created
/// through registration; there is no registration-time path to any other
/// role.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
    }
}

/// Create the users table when missing. Run once at startup; a failure is
/// reported to the caller who logs it and keeps the process alive.
pub async fn init(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user'
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[instrument(skip(pool))]
pub async fn find_by_username_or_email(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    match sqlx::query(
        "SELECT username, email, password_hash, role FROM users WHERE username = $1 OR email = $2",
    )
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await
    {
        Ok(row) => Ok(row.as_ref().map(record_from_row)),
        Err(e) => Err(e),
    }
}

#[instrument(skip(pool))]
pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    match sqlx::query("SELECT username, email, password_hash, role FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
    {
        Ok(row) => Ok(row.as_ref().map(record_from_row)),
        Err(e) => Err(e),
    }
}

/// Insert a new account. Every registration gets role `user`; the caller has
/// no say in it. A unique violation from a concurrent registration surfaces
/// as `sqlx::Error` and the caller maps it to "User already exists".
#[instrument(skip(pool, password_hash))]
pub async fn insert(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (username, email, password_hash, role) VALUES ($1, $2, $3, 'user')")
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

/// True when the error is the database rejecting a duplicate username/email.
#[must_use]
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}
