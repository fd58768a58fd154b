//! Language-model categorization of a caller's subscriptions.

pub mod client;
pub mod parse;

pub use client::{GeminiClient, TextGenerator};
pub use parse::{parse_reply, CategorizationReply};

use serde::Serialize;

use crate::constants::CATEGORIZATION_PROMPT;
use crate::error::Result;
use crate::models::Subscription;

/// Subscriptions partitioned by the model's id lists
#[derive(Debug, Clone, Default, Serialize)]
pub struct Categorization {
    pub optional: Vec<Subscription>,
    pub necessary: Vec<Subscription>,
    pub improvements: String,
}

/// Flatten subscriptions as `id ,name, cost, cycle. ` records
pub fn encode_subscriptions(subscriptions: &[Subscription]) -> String {
    subscriptions
        .iter()
        .map(|sub| {
            format!(
                "{} ,{}, {}, {}. ",
                sub.id, sub.service_name, sub.cost, sub.billing_cycle
            )
        })
        .collect()
}

pub fn build_prompt(summary: &str) -> String {
    format!("{CATEGORIZATION_PROMPT}{summary}")
}

/// Split `subscriptions` by membership in the reply's id lists.
///
/// Ids are not checked against the submitted set: unknown ids simply match
/// nothing.
pub fn partition(subscriptions: &[Subscription], reply: CategorizationReply) -> Categorization {
    let pick = |ids: &[i64]| -> Vec<Subscription> {
        subscriptions
            .iter()
            .filter(|sub| ids.contains(&sub.id))
            .cloned()
            .collect()
    };

    Categorization {
        optional: pick(&reply.optional_ids),
        necessary: pick(&reply.necessary_ids),
        improvements: reply.improvements,
    }
}

/// Ask the model to categorize `subscriptions` and partition them by its reply
pub async fn categorize_with(
    generator: &dyn TextGenerator,
    subscriptions: &[Subscription],
) -> Result<Categorization> {
    if subscriptions.is_empty() {
        return Ok(Categorization::default());
    }

    let prompt = build_prompt(&encode_subscriptions(subscriptions));
    let text = generator.generate(&prompt).await?;

    let reply = parse_reply(&text);
    tracing::debug!(
        "Model categorized {} optional and {} necessary ids",
        reply.optional_ids.len(),
        reply.necessary_ids.len()
    );

    Ok(partition(subscriptions, reply))
}
