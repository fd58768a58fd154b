//! Pure subscription arithmetic: monthly normalization, renewal windows,
//! keyword categorization, and display formatting.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::constants::{NECESSARY_KEYWORDS, POTENTIAL_SAVINGS_RATE, UPCOMING_RENEWAL_WINDOW_DAYS};
use crate::models::{BillingCycle, Subscription};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Spending category of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Necessary,
    Optional,
}

/// Cost expressed as an equivalent monthly figure, at full precision
pub fn monthly_cost(cost: f64, cycle: BillingCycle) -> f64 {
    cost / f64::from(cycle.months())
}

/// Like [`monthly_cost`] for a raw cycle tag; unknown tags pass the cost through.
///
/// Entry point for callers holding an unvalidated tag string (imports, client
/// payloads read outside the typed forms). Routes use the closed enum.
pub fn monthly_cost_for_tag(cost: f64, tag: &str) -> f64 {
    match BillingCycle::from_str(tag) {
        Ok(cycle) => monthly_cost(cost, cycle),
        Err(_) => cost,
    }
}

/// Signed whole days from `now` until the renewal date, rounded up.
///
/// The renewal date is taken as midnight UTC. Negative values mean the
/// renewal date has already passed and are never clamped.
pub fn days_until_renewal(renewal_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let renewal = renewal_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (renewal - now).num_milliseconds();

    // ceiling division for signed values
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Due within the window, including lapsed renewals
pub fn is_upcoming(renewal_date: NaiveDate, now: DateTime<Utc>) -> bool {
    days_until_renewal(renewal_date, now) <= UPCOMING_RENEWAL_WINDOW_DAYS
}

/// Subscriptions due soon, earliest renewal first. Ties keep input order.
pub fn upcoming_renewals(subscriptions: &[Subscription], now: DateTime<Utc>) -> Vec<Subscription> {
    let mut upcoming: Vec<Subscription> = subscriptions
        .iter()
        .filter(|sub| is_upcoming(sub.renewal_date, now))
        .cloned()
        .collect();

    // sort_by_key is stable
    upcoming.sort_by_key(|sub| sub.renewal_date);
    upcoming
}

/// Keyword heuristic: a name containing any necessary keyword is necessary
pub fn categorize(service_name: &str) -> Category {
    let name = service_name.to_lowercase();
    if NECESSARY_KEYWORDS.iter().any(|keyword| name.contains(keyword)) {
        Category::Necessary
    } else {
        Category::Optional
    }
}

/// US-dollar display string, e.g. `$1,234.50` or `-$5.00`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{remainder:02}")
}

/// Short display date, e.g. `Jan 5, 2025`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Aggregate monthly spend split by keyword category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendSummary {
    pub total: usize,
    pub necessary: usize,
    pub optional: usize,
    pub total_monthly_cost: f64,
    pub necessary_monthly_cost: f64,
    pub optional_monthly_cost: f64,
    pub potential_savings: f64,
}

impl SpendSummary {
    pub fn from_subscriptions(subscriptions: &[Subscription]) -> Self {
        let mut summary = SpendSummary {
            total: subscriptions.len(),
            necessary: 0,
            optional: 0,
            total_monthly_cost: 0.0,
            necessary_monthly_cost: 0.0,
            optional_monthly_cost: 0.0,
            potential_savings: 0.0,
        };

        for sub in subscriptions {
            let monthly = monthly_cost(sub.cost, sub.billing_cycle);
            summary.total_monthly_cost += monthly;
            match categorize(&sub.service_name) {
                Category::Necessary => {
                    summary.necessary += 1;
                    summary.necessary_monthly_cost += monthly;
                }
                Category::Optional => {
                    summary.optional += 1;
                    summary.optional_monthly_cost += monthly;
                }
            }
        }

        summary.potential_savings = summary.optional_monthly_cost * POTENTIAL_SAVINGS_RATE;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sub(id: i64, name: &str, cost: f64, cycle: BillingCycle, renewal: NaiveDate) -> Subscription {
        Subscription {
            id,
            email: "owner@example.com".to_string(),
            service_name: name.to_string(),
            cost,
            billing_cycle: cycle,
            renewal_date: renewal,
            notes: None,
            visibility: Visibility::Private,
            created_at: at(2025, 1, 1, 0),
        }
    }

    #[test]
    fn test_monthly_cost_per_cycle() {
        for cost in [0.01, 9.99, 120.0, 1234.56] {
            assert_eq!(monthly_cost(cost, BillingCycle::Monthly), cost);
            assert_eq!(monthly_cost(cost, BillingCycle::Quarterly), cost / 3.0);
            assert_eq!(monthly_cost(cost, BillingCycle::Yearly), cost / 12.0);
        }
    }

    #[test]
    fn test_monthly_cost_keeps_precision() {
        let monthly = monthly_cost(10.0, BillingCycle::Quarterly);
        assert!((monthly - 3.333_333_333_333_333).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_cost_for_unknown_tag_passes_through() {
        assert_eq!(monthly_cost_for_tag(50.0, "weekly"), 50.0);
        assert_eq!(monthly_cost_for_tag(60.0, "yearly"), 5.0);
    }

    #[test]
    fn test_days_until_renewal_rounds_up() {
        let now = at(2025, 3, 10, 15);
        assert_eq!(days_until_renewal(date(2025, 3, 11), now), 1);
        assert_eq!(days_until_renewal(date(2025, 3, 17), now), 7);
        assert_eq!(days_until_renewal(date(2025, 3, 10), now), 0);
    }

    #[test]
    fn test_days_until_renewal_at_midnight_is_exact() {
        let now = at(2025, 3, 10, 0);
        assert_eq!(days_until_renewal(date(2025, 3, 13), now), 3);
        assert_eq!(days_until_renewal(date(2025, 3, 10), now), 0);
    }

    #[test]
    fn test_days_until_renewal_negative_iff_date_passed() {
        let now = at(2025, 3, 10, 9);
        for offset in -40..40 {
            let renewal = now.date_naive() + Duration::days(offset);
            let days = days_until_renewal(renewal, now);
            assert_eq!(days < 0, renewal < now.date_naive(), "offset {offset}");
            assert_eq!(days, offset);
        }
    }

    #[test]
    fn test_is_upcoming_includes_lapsed() {
        let now = at(2025, 3, 10, 12);
        assert!(is_upcoming(date(2025, 3, 17), now));
        assert!(!is_upcoming(date(2025, 3, 18), now));
        assert!(is_upcoming(date(2024, 12, 1), now));
    }

    #[test]
    fn test_upcoming_renewals_filters_and_sorts() {
        let now = at(2025, 3, 10, 12);
        let today = now.date_naive();
        let subs = vec![
            sub(1, "Gym", 30.0, BillingCycle::Monthly, today + Duration::days(3)),
            sub(2, "Cloud", 99.0, BillingCycle::Yearly, today + Duration::days(10)),
            sub(3, "Rent", 1500.0, BillingCycle::Monthly, today + Duration::days(1)),
        ];

        let ids: Vec<i64> = upcoming_renewals(&subs, now).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_upcoming_renewals_ties_keep_input_order() {
        let now = at(2025, 3, 10, 12);
        let due = now.date_naive() + Duration::days(2);
        let subs = vec![
            sub(7, "B", 1.0, BillingCycle::Monthly, due),
            sub(4, "A", 1.0, BillingCycle::Monthly, due),
            sub(9, "C", 1.0, BillingCycle::Monthly, due - Duration::days(30)),
        ];

        let ids: Vec<i64> = upcoming_renewals(&subs, now).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![9, 7, 4]);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("Netflix Premium"), Category::Necessary);
        assert_eq!(categorize("Home INTERNET"), Category::Necessary);
        assert_eq!(categorize("Credit Card Protection"), Category::Necessary);
        assert_eq!(categorize("Random Game Pass"), Category::Optional);
        assert_eq!(categorize(""), Category::Optional);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(9.5), "$9.50");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(3.333_333), "$3.33");
        assert_eq!(format_currency(-5.0), "-$5.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2025, 1, 5)), "Jan 5, 2025");
        assert_eq!(format_date(date(2024, 12, 31)), "Dec 31, 2024");
    }

    #[test]
    fn test_spend_summary() {
        let today = date(2025, 3, 10);
        let subs = vec![
            sub(1, "Netflix", 12.0, BillingCycle::Monthly, today),
            sub(2, "Game Pass", 36.0, BillingCycle::Quarterly, today),
            sub(3, "Car Insurance", 600.0, BillingCycle::Yearly, today),
        ];

        let summary = SpendSummary::from_subscriptions(&subs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.necessary, 2);
        assert_eq!(summary.optional, 1);
        assert!((summary.necessary_monthly_cost - 62.0).abs() < 1e-9);
        assert!((summary.optional_monthly_cost - 12.0).abs() < 1e-9);
        assert!((summary.total_monthly_cost - 74.0).abs() < 1e-9);
        assert!((summary.potential_savings - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_spend_summary_empty() {
        let summary = SpendSummary::from_subscriptions(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.total_monthly_cost, 0.0);
        assert_eq!(summary.potential_savings, 0.0);
    }
}
