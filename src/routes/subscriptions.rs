use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Admin, Caller};
use crate::billing::{self, Category};
use crate::constants::ERR_MISSING_SUBSCRIPTION_ID;
use crate::db;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::models::{Subscription, SubscriptionForm, Visibility};
use crate::AppState;

/// Create/update body: the form is wrapped in `formdata`
#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub formdata: SubscriptionForm,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub id: i64,
    pub visibility: Visibility,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSubscriptionRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteSubscriptionResponse {
    pub success: bool,
    pub id: i64,
}

/// A subscription with the values the dashboard displays next to it
#[derive(Debug, Serialize)]
pub struct RenewalView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub days_until_renewal: i64,
    pub monthly_cost: f64,
    pub category: Category,
    pub formatted_cost: String,
    pub formatted_renewal_date: String,
}

impl RenewalView {
    fn new(subscription: Subscription, now: DateTime<Utc>) -> Self {
        let days_until_renewal = billing::days_until_renewal(subscription.renewal_date, now);
        let monthly_cost = billing::monthly_cost(subscription.cost, subscription.billing_cycle);
        let category = billing::categorize(&subscription.service_name);
        let formatted_cost = billing::format_currency(subscription.cost);
        let formatted_renewal_date = billing::format_date(subscription.renewal_date);

        Self {
            subscription,
            days_until_renewal,
            monthly_cost,
            category,
            formatted_cost,
            formatted_renewal_date,
        }
    }
}

/// List subscriptions in the caller's scope
pub async fn list_subscriptions(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Subscription>>> {
    let rows = db::subscriptions::list(&state.pool, &caller.scope()).await?;
    Ok(Json(rows))
}

/// Create a subscription owned by the caller, or by `formdata.email` for admins
pub async fn create_subscription(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>)> {
    let form = payload.formdata.validate()?;
    let owner = form.email.clone().unwrap_or_else(|| caller.email.clone());

    let created = db::subscriptions::insert(&state.pool, &caller.scope(), &owner, &form).await?;

    tracing::info!(
        "Subscription {} created for {} by {}",
        created.id,
        created.email,
        caller.email
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace every editable field of a subscription in the caller's scope
pub async fn update_subscription(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<Json<Subscription>> {
    let form = payload.formdata.validate()?;
    let id = form
        .id
        .ok_or_else(|| AppError::InvalidInput(ERR_MISSING_SUBSCRIPTION_ID.to_string()))?;

    let updated = db::subscriptions::update(&state.pool, &caller.scope(), id, &form).await?;

    tracing::info!("Subscription {} updated by {}", id, caller.email);

    Ok(Json(updated))
}

/// Change a subscription's visibility (admin only)
pub async fn set_visibility(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Json(payload): Json<VisibilityRequest>,
) -> Result<Json<Subscription>> {
    let updated = db::subscriptions::set_visibility(
        &state.pool,
        &admin.scope(),
        payload.id,
        payload.visibility,
    )
    .await?;

    tracing::info!(
        "Subscription {} visibility set to {:?} by {}",
        payload.id,
        payload.visibility,
        admin.email
    );

    Ok(Json(updated))
}

/// Delete a subscription in the caller's scope
pub async fn delete_subscription(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<DeleteSubscriptionRequest>,
) -> Result<Json<DeleteSubscriptionResponse>> {
    db::subscriptions::delete(&state.pool, &caller.scope(), payload.id).await?;

    tracing::info!("Subscription {} deleted by {}", payload.id, caller.email);

    Ok(Json(DeleteSubscriptionResponse {
        success: true,
        id: payload.id,
    }))
}

/// List every shared subscription
pub async fn list_shared(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<Subscription>>> {
    let rows = db::subscriptions::list_shared(&state.pool).await?;
    Ok(Json(rows))
}

/// Subscriptions in the caller's scope renewing within the window, earliest first
pub async fn upcoming_renewals(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<RenewalView>>> {
    let rows = db::subscriptions::list(&state.pool, &caller.scope()).await?;
    let now = Utc::now();

    let upcoming = billing::upcoming_renewals(&rows, now)
        .into_iter()
        .map(|sub| RenewalView::new(sub, now))
        .collect();

    Ok(Json(upcoming))
}

