//! Fundability scoring: a pure mapping from a validated applicant record to a
//! [`Snapshot`] with the aggregate score, tier, subscores, narrative and
//! funding estimates.
//!
//! Every business threshold lives in an ordered lookup table next to the rule
//! that reads it, so tuning a cutoff is a data change.

pub mod domain;
mod funding;
mod narrative;
mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    FundabilityTier, PrimaryGoal, Snapshot, SnapshotFlags, SnapshotMeta, Subscores,
    ValidatedInput,
};
pub use rules::{ScoreWeights, SCORE_WEIGHTS};

use chrono::{DateTime, Utc};

pub const ENGINE_VERSION: &str = concat!("fundability-engine/", env!("CARGO_PKG_VERSION"));

/// Penalty at or below which a profile is flagged high risk regardless of tier.
const HIGH_RISK_PENALTY: i8 = -20;

/// Score an input using the current wall-clock time.
pub fn score(input: &ValidatedInput) -> Snapshot {
    score_at(input, Utc::now())
}

/// Score an input with an explicit generation timestamp.
pub fn score_at(input: &ValidatedInput, generated_at: DateTime<Utc>) -> Snapshot {
    let subscores = rules::subscores_for(input);
    let fundability_score = rules::aggregate_score(&subscores);
    let tier = rules::tier_for_score(fundability_score);

    let flags = SnapshotFlags {
        missing_credit_score: input.credit_score.is_none(),
        missing_utilization: false,
        missing_dti: input.dti_pct.is_none(),
        high_risk_profile: tier == FundabilityTier::Rehab
            || subscores.penalty_points <= HIGH_RISK_PENALTY,
    };

    Snapshot {
        fundability_score,
        fundability_tier_numeric: tier.numeric(),
        fundability_tier_label: tier.label().to_string(),
        subscores,
        key_strengths: narrative::key_strengths(&subscores),
        key_risks: narrative::key_risks(&subscores),
        high_impact_actions: narrative::high_impact_actions(input, &subscores),
        funding_range_now: funding::funding_range_now(tier),
        funding_range_after_optimization: funding::funding_range_after_optimization(
            tier, input, &subscores,
        ),
        goal_path: funding::goal_path(input.primary_goal, tier),
        flags,
        meta: SnapshotMeta {
            version: ENGINE_VERSION.to_string(),
            generated_at,
        },
    }
}
