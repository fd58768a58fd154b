use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ERR_INVALID_COST, ERR_INVALID_SERVICE_NAME, ERR_NOTES_TOO_LONG, MAX_NOTES_LEN,
    MAX_SERVICE_NAME_LEN,
};
use crate::error::{AppError, Result};

/// How often a subscription's cost recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    /// Number of months covered by one payment
    pub fn months(self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Quarterly => 3,
            BillingCycle::Yearly => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the lower-case wire tag; anything else is `InvalidInput`
impl FromStr for BillingCycle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "monthly" => Ok(BillingCycle::Monthly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(AppError::InvalidInput(format!(
                "Unknown billing cycle: {other}"
            ))),
        }
    }
}

/// Whether a subscription appears in the shared view
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Shared,
}

/// A recurring subscription owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Server-assigned identifier
    pub id: i64,
    /// Owner identity
    pub email: String,
    pub service_name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub renewal_date: NaiveDate,
    pub notes: Option<String>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

/// Client-submitted subscription fields, used for both create and full replace
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionForm {
    /// Required for updates, ignored on create
    #[serde(default)]
    pub id: Option<i64>,
    pub service_name: String,
    pub cost: f64,
    pub billing_cycle: BillingCycle,
    pub renewal_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Owner to create on behalf of (admin only)
    #[serde(default)]
    pub email: Option<String>,
}

impl SubscriptionForm {
    /// Check field invariants and normalize whitespace
    pub fn validate(mut self) -> Result<Self> {
        self.service_name = self.service_name.trim().to_string();
        let name_len = self.service_name.chars().count();
        if name_len == 0 || name_len > MAX_SERVICE_NAME_LEN {
            return Err(AppError::InvalidInput(ERR_INVALID_SERVICE_NAME.to_string()));
        }

        if !self.cost.is_finite() || self.cost <= 0.0 {
            return Err(AppError::InvalidInput(ERR_INVALID_COST.to_string()));
        }

        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(AppError::InvalidInput(ERR_NOTES_TOO_LONG.to_string()));
            }
        }

        self.email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SubscriptionForm {
        SubscriptionForm {
            id: None,
            service_name: "  Netflix  ".to_string(),
            cost: 15.99,
            billing_cycle: BillingCycle::Monthly,
            renewal_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            notes: Some("   ".to_string()),
            visibility: Visibility::Private,
            email: None,
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let validated = form().validate().unwrap();
        assert_eq!(validated.service_name, "Netflix");
        assert!(validated.notes.is_none());
    }

    #[test]
    fn test_validate_rejects_non_positive_cost() {
        for cost in [0.0, -4.5, f64::NAN, f64::INFINITY] {
            let mut f = form();
            f.cost = cost;
            assert!(matches!(f.validate(), Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_validate_rejects_blank_or_long_name() {
        let mut blank = form();
        blank.service_name = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut long = form();
        long.service_name = "x".repeat(MAX_SERVICE_NAME_LEN + 1);
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_form_deserializes_wire_format() {
        let form: SubscriptionForm = serde_json::from_value(serde_json::json!({
            "service_name": "Spotify",
            "cost": 9.99,
            "billing_cycle": "quarterly",
            "renewal_date": "2025-06-30",
            "visibility": "shared"
        }))
        .unwrap();

        assert_eq!(form.billing_cycle, BillingCycle::Quarterly);
        assert_eq!(form.visibility, Visibility::Shared);
        assert_eq!(form.id, None);
    }

    #[test]
    fn test_unknown_billing_cycle_is_rejected() {
        let parsed: std::result::Result<SubscriptionForm, _> =
            serde_json::from_value(serde_json::json!({
                "service_name": "Gym",
                "cost": 30.0,
                "billing_cycle": "weekly",
                "renewal_date": "2025-06-30"
            }));
        assert!(parsed.is_err());
        assert!("weekly".parse::<BillingCycle>().is_err());
        assert_eq!("yearly".parse::<BillingCycle>().unwrap(), BillingCycle::Yearly);
    }
}
