use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::scoring::{PrimaryGoal, Snapshot, ValidatedInput};

/// Lead identity plus the snapshot that triggered the notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadNotification {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_contact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub requested_amount: f64,
    pub primary_goal: PrimaryGoal,
    pub snapshot: Snapshot,
}

impl LeadNotification {
    pub fn new(input: &ValidatedInput, snapshot: &Snapshot) -> Self {
        Self {
            name: input.full_name(),
            email: input.email.clone(),
            external_contact_id: input.external_contact_id.clone(),
            source: input.source.clone(),
            requested_amount: input.requested_amount,
            primary_goal: input.primary_goal,
            snapshot: snapshot.clone(),
        }
    }
}

const MAX_CHAT_ACTIONS: usize = 3;

fn mrkdwn_field(label: &str, value: impl std::fmt::Display) -> Value {
    json!({ "type": "mrkdwn", "text": format!("*{label}:*\n{value}") })
}

/// Chat message with header, summary fields, top actions and a context footer.
pub fn chat_message(notification: &LeadNotification) -> Value {
    let snapshot = &notification.snapshot;
    let tier = format!(
        "{} - {}",
        snapshot.fundability_tier_numeric, snapshot.fundability_tier_label
    );

    let actions = if snapshot.high_impact_actions.is_empty() {
        "_No immediate actions_".to_string()
    } else {
        snapshot
            .high_impact_actions
            .iter()
            .take(MAX_CHAT_ACTIONS)
            .map(|action| format!("• {action}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut footer = format!(
        "{} | generated {}",
        snapshot.meta.version,
        snapshot.meta.generated_at.to_rfc3339()
    );
    if let Some(source) = &notification.source {
        footer.push_str(&format!(" | source {source}"));
    }
    if snapshot.flags.high_risk_profile {
        footer.push_str(" | high-risk profile");
    }

    json!({
        "text": format!(
            "New fundability assessment: {} scored {} (Tier {})",
            notification.name, snapshot.fundability_score, snapshot.fundability_tier_numeric
        ),
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("Fundability Snapshot: {}", notification.name),
                }
            },
            {
                "type": "section",
                "fields": [
                    mrkdwn_field("Score", format!("{}/100", snapshot.fundability_score)),
                    mrkdwn_field("Tier", tier),
                    mrkdwn_field("Email", &notification.email),
                    mrkdwn_field("Goal", notification.primary_goal),
                    mrkdwn_field("Funding now", &snapshot.funding_range_now),
                    mrkdwn_field("After optimization", &snapshot.funding_range_after_optimization),
                ]
            },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*Top actions:*\n{actions}") }
            },
            {
                "type": "context",
                "elements": [ { "type": "mrkdwn", "text": footer } ]
            }
        ]
    })
}

/// CRM contact property update keyed by `fundability_*` property names.
///
/// The contact is addressed by its external id when one was supplied,
/// otherwise by email.
pub fn crm_update(notification: &LeadNotification) -> Value {
    let snapshot = &notification.snapshot;
    let contact = match &notification.external_contact_id {
        Some(id) => json!({ "id": id, "email": notification.email }),
        None => json!({ "email": notification.email }),
    };

    json!({
        "contact": contact,
        "properties": {
            "fundability_score": snapshot.fundability_score,
            "fundability_tier": snapshot.fundability_tier_numeric,
            "fundability_tier_label": snapshot.fundability_tier_label,
            "fundability_funding_range_now": snapshot.funding_range_now,
            "fundability_funding_range_optimized": snapshot.funding_range_after_optimization,
            "fundability_goal": notification.primary_goal,
            "fundability_goal_path": snapshot.goal_path,
            "fundability_top_action": snapshot.high_impact_actions.first().cloned().unwrap_or_default(),
            "fundability_high_risk": snapshot.flags.high_risk_profile,
            "fundability_requested_amount": notification.requested_amount,
            "fundability_generated_at": snapshot.meta.generated_at.to_rfc3339(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_at;
    use chrono::{TimeZone, Utc};

    fn notification(external_contact_id: Option<&str>) -> LeadNotification {
        let input = ValidatedInput {
            first_name: "Morgan".to_string(),
            last_name: "Lee".to_string(),
            email: "morgan@example.com".to_string(),
            credit_score: Some(690),
            revolving_utilization_pct: 55.0,
            dti_pct: Some(38.0),
            inquiries_6m: 4,
            oldest_account_years: 6.0,
            open_tradelines: 4,
            recent_derogs_24m: 0,
            bk_or_major_event: false,
            requested_amount: 40_000.0,
            primary_goal: PrimaryGoal::AutoLoan,
            est_home_value: None,
            mortgage_balance: None,
            source: Some("landing-page".to_string()),
            external_contact_id: external_contact_id.map(str::to_string),
        };
        let at = Utc
            .with_ymd_and_hms(2025, 10, 2, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        LeadNotification::new(&input, &score_at(&input, at))
    }

    #[test]
    fn chat_message_carries_headline_fields() {
        let message = chat_message(&notification(None));

        let headline = message["text"].as_str().expect("text");
        assert!(headline.contains("Morgan Lee"));
        let blocks = message["blocks"].as_array().expect("blocks");
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[1]["fields"].as_array().map(Vec::len), Some(6));
        let actions = blocks[2]["text"]["text"].as_str().expect("actions");
        assert!(actions.starts_with("*Top actions:*"));
        assert!(actions.lines().count() <= 1 + MAX_CHAT_ACTIONS);
        let footer = blocks[3]["elements"][0]["text"].as_str().expect("footer");
        assert!(footer.contains("source landing-page"));
    }

    #[test]
    fn crm_update_prefers_external_id() {
        let with_id = crm_update(&notification(Some("contact-77")));
        assert_eq!(with_id["contact"]["id"], "contact-77");
        assert_eq!(with_id["properties"]["fundability_goal"], "auto_loan");

        let by_email = crm_update(&notification(None));
        assert!(by_email["contact"].get("id").is_none());
        assert_eq!(by_email["contact"]["email"], "morgan@example.com");
    }

    #[test]
    fn crm_update_mirrors_snapshot_values() {
        let lead = notification(None);
        let update = crm_update(&lead);
        let properties = &update["properties"];

        assert_eq!(properties["fundability_score"], lead.snapshot.fundability_score);
        assert_eq!(
            properties["fundability_tier_label"],
            lead.snapshot.fundability_tier_label.as_str()
        );
        assert_eq!(
            properties["fundability_top_action"],
            lead.snapshot
                .high_impact_actions
                .first()
                .map(String::as_str)
                .unwrap_or_default()
        );
    }
}
