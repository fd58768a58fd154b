use axum::extract::State;
use serde::Serialize;

use crate::ai::{self, Categorization};
use crate::auth::Caller;
use crate::billing::{format_currency, SpendSummary};
use crate::db;
use crate::error::Result;
use crate::extract::Json;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    #[serde(flatten)]
    pub summary: SpendSummary,
    pub formatted: FormattedSummary,
}

/// Display strings for the monetary fields of a [`SpendSummary`]
#[derive(Debug, Serialize)]
pub struct FormattedSummary {
    pub total_monthly_cost: String,
    pub necessary_monthly_cost: String,
    pub optional_monthly_cost: String,
    pub potential_savings: String,
}

impl From<&SpendSummary> for FormattedSummary {
    fn from(summary: &SpendSummary) -> Self {
        Self {
            total_monthly_cost: format_currency(summary.total_monthly_cost),
            necessary_monthly_cost: format_currency(summary.necessary_monthly_cost),
            optional_monthly_cost: format_currency(summary.optional_monthly_cost),
            potential_savings: format_currency(summary.potential_savings),
        }
    }
}

/// Keyword-based spend summary over the caller's scope
pub async fn spend_insights(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<InsightsResponse>> {
    let rows = db::subscriptions::list(&state.pool, &caller.scope()).await?;
    let summary = SpendSummary::from_subscriptions(&rows);
    let formatted = FormattedSummary::from(&summary);

    Ok(Json(InsightsResponse { summary, formatted }))
}

/// Language-model categorization of the caller's subscriptions
pub async fn ai_categorize(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Categorization>> {
    let rows = db::subscriptions::list(&state.pool, &caller.scope()).await?;

    let categorization = ai::categorize_with(state.llm.as_ref(), &rows).await?;

    tracing::info!(
        "AI categorization for {}: {} optional, {} necessary of {}",
        caller.email,
        categorization.optional.len(),
        categorization.necessary.len(),
        rows.len()
    );

    Ok(Json(categorization))
}
