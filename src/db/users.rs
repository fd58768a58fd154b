use chrono::Utc;

use super::Db;
use crate::error::{AppError, Result};
use crate::models::{Credentials, Role, User};

/// Stored credentials for login, if the email is registered
pub async fn find_credentials(pool: &Db, email: &str) -> Result<Option<Credentials>> {
    let credentials = sqlx::query_as::<_, Credentials>(
        "SELECT email, password_hash, role FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(credentials)
}

/// Current role of an identity, `None` if the identity is unknown
pub async fn find_role(pool: &Db, email: &str) -> Result<Option<Role>> {
    let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(role)
}

/// Insert a new identity. Fails with `UserAlreadyExists` on a duplicate email.
pub async fn insert_user(pool: &Db, email: &str, password_hash: &str, role: Role) -> Result<User> {
    let created_at = Utc::now();

    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(created_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(User {
            email: email.to_string(),
            role,
            created_at,
        }),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AppError::UserAlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Every identity, oldest first
pub async fn list_users(pool: &Db) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT email, role, created_at FROM users ORDER BY created_at, email",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Create the admin account unless the email is already registered.
///
/// Returns `true` when a new row was written. An existing account keeps its
/// password and role.
pub async fn ensure_admin(pool: &Db, email: &str, password_hash: &str) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO users (email, password_hash, role, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(Role::Admin)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
