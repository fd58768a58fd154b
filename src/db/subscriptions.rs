//! Subscription queries.
//!
//! Every read or write on a caller's rows takes a [`Scope`] and embeds its
//! predicate in the same statement, so the role check and the data access
//! cannot drift apart.

use chrono::Utc;

use super::Db;
use crate::auth::Scope;
use crate::constants::ERR_UNKNOWN_OWNER;
use crate::error::{AppError, Result};
use crate::models::{Subscription, SubscriptionForm, Visibility};

const COLUMNS: &str = "subscriptions.id, subscriptions.email, subscriptions.service_name, \
     subscriptions.cost, subscriptions.billing_cycle, subscriptions.renewal_date, \
     subscriptions.notes, subscriptions.visibility, subscriptions.created_at";

/// Rows visible to the scope, in insertion order
pub async fn list(pool: &Db, scope: &Scope) -> Result<Vec<Subscription>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE {} ORDER BY subscriptions.id",
        scope.predicate()
    );

    let rows = sqlx::query_as::<_, Subscription>(&sql)
        .bind(scope.principal())
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Rows any signed-in user may see
pub async fn list_shared(pool: &Db) -> Result<Vec<Subscription>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE subscriptions.visibility = ?1 \
         ORDER BY subscriptions.id"
    );

    let rows = sqlx::query_as::<_, Subscription>(&sql)
        .bind(Visibility::Shared)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Single row within the scope
pub async fn find(pool: &Db, scope: &Scope, id: i64) -> Result<Subscription> {
    let sql = format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE subscriptions.id = ?2 AND {}",
        scope.predicate()
    );

    sqlx::query_as::<_, Subscription>(&sql)
        .bind(scope.principal())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::SubscriptionNotFound)
}

/// Insert a subscription owned by `owner`.
///
/// The scope must cover the owner: a user may only create for themselves,
/// an admin for any registered identity.
pub async fn insert(
    pool: &Db,
    scope: &Scope,
    owner: &str,
    form: &SubscriptionForm,
) -> Result<Subscription> {
    if !scope.covers_owner(owner) {
        return Err(AppError::Forbidden);
    }

    // The admin role is re-asserted inside the INSERT itself
    let sql = format!(
        "INSERT INTO subscriptions \
         (email, service_name, cost, billing_cycle, renewal_date, notes, visibility, created_at) \
         SELECT ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9 \
         WHERE ?2 = ?1 OR ({})",
        Scope::ADMIN_PREDICATE
    );

    let result = sqlx::query(&sql)
        .bind(scope.principal())
        .bind(owner)
        .bind(&form.service_name)
        .bind(form.cost)
        .bind(form.billing_cycle)
        .bind(form.renewal_date)
        .bind(&form.notes)
        .bind(form.visibility)
        .bind(Utc::now())
        .execute(pool)
        .await;

    let result = match result {
        Ok(result) => result,
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            return Err(AppError::InvalidInput(ERR_UNKNOWN_OWNER.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    if result.rows_affected() == 0 {
        return Err(AppError::Forbidden);
    }

    find(pool, &Scope::Owner(owner.to_string()), result.last_insert_rowid()).await
}

/// Replace every editable field of a row within the scope
pub async fn update(pool: &Db, scope: &Scope, id: i64, form: &SubscriptionForm) -> Result<Subscription> {
    let sql = format!(
        "UPDATE subscriptions SET service_name = ?3, cost = ?4, billing_cycle = ?5, \
         renewal_date = ?6, notes = ?7, visibility = ?8 \
         WHERE subscriptions.id = ?2 AND {}",
        scope.predicate()
    );

    let result = sqlx::query(&sql)
        .bind(scope.principal())
        .bind(id)
        .bind(&form.service_name)
        .bind(form.cost)
        .bind(form.billing_cycle)
        .bind(form.renewal_date)
        .bind(&form.notes)
        .bind(form.visibility)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::SubscriptionNotFound);
    }

    find(pool, scope, id).await
}

/// Change only the visibility of a row within the scope
pub async fn set_visibility(
    pool: &Db,
    scope: &Scope,
    id: i64,
    visibility: Visibility,
) -> Result<Subscription> {
    let sql = format!(
        "UPDATE subscriptions SET visibility = ?3 WHERE subscriptions.id = ?2 AND {}",
        scope.predicate()
    );

    let result = sqlx::query(&sql)
        .bind(scope.principal())
        .bind(id)
        .bind(visibility)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::SubscriptionNotFound);
    }

    find(pool, scope, id).await
}

/// Delete a row within the scope
pub async fn delete(pool: &Db, scope: &Scope, id: i64) -> Result<()> {
    let sql = format!(
        "DELETE FROM subscriptions WHERE subscriptions.id = ?2 AND {}",
        scope.predicate()
    );

    let result = sqlx::query(&sql)
        .bind(scope.principal())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::SubscriptionNotFound);
    }

    Ok(())
}
