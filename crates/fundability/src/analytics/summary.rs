use std::collections::BTreeMap;

use super::store::AnalyticsEntry;
use super::views::{
    AnalyticsFilter, AnalyticsSummary, AnalyticsWindow, FlagCounts, GoalCount, NarrativeCount,
    ScoreBucket, TierCount,
};
use crate::scoring::{FundabilityTier, PrimaryGoal};

const TOP_NARRATIVES: usize = 5;

/// `(label, inclusive lower bound, inclusive upper bound)` aligned with the tier cutoffs.
const SCORE_BUCKETS: [(&str, u8, u8); 4] = [
    ("0-54", 0, 54),
    ("55-69", 55, 69),
    ("70-84", 70, 84),
    ("85-100", 85, 100),
];

const TIERS: [FundabilityTier; 4] = [
    FundabilityTier::ReadyNow,
    FundabilityTier::TuneUp,
    FundabilityTier::OptimizationRequired,
    FundabilityTier::Rehab,
];

pub(crate) fn matches(entry: &AnalyticsEntry, filter: &AnalyticsFilter) -> bool {
    let recorded_at = entry.recorded_at;
    filter.from.map_or(true, |from| recorded_at >= from)
        && filter.to.map_or(true, |to| recorded_at <= to)
        && filter
            .tier
            .map_or(true, |tier| entry.snapshot.fundability_tier_numeric == tier.numeric())
        && filter
            .goal
            .map_or(true, |goal| entry.input.primary_goal == goal)
}

pub(crate) fn summarize<'a, I>(entries: I, filter: &AnalyticsFilter) -> AnalyticsSummary
where
    I: IntoIterator<Item = &'a AnalyticsEntry>,
{
    let selected: Vec<&AnalyticsEntry> = entries
        .into_iter()
        .filter(|entry| matches(entry, filter))
        .collect();

    let total_assessments = selected.len();
    let average_score = if selected.is_empty() {
        None
    } else {
        let sum: u64 = selected
            .iter()
            .map(|entry| u64::from(entry.snapshot.fundability_score))
            .sum();
        let mean = sum as f64 / total_assessments as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let tier_distribution = TIERS
        .iter()
        .map(|tier| TierCount {
            tier: tier.numeric(),
            label: tier.label(),
            count: selected
                .iter()
                .filter(|entry| entry.snapshot.fundability_tier_numeric == tier.numeric())
                .count(),
        })
        .collect();

    let goal_distribution = PrimaryGoal::ALL
        .iter()
        .map(|goal| GoalCount {
            goal: *goal,
            count: selected
                .iter()
                .filter(|entry| entry.input.primary_goal == *goal)
                .count(),
        })
        .collect();

    let score_buckets = SCORE_BUCKETS
        .iter()
        .map(|&(range, low, high)| ScoreBucket {
            range,
            count: selected
                .iter()
                .filter(|entry| (low..=high).contains(&entry.snapshot.fundability_score))
                .count(),
        })
        .collect();

    let mut flags = FlagCounts::default();
    for entry in &selected {
        let snapshot_flags = entry.snapshot.flags;
        flags.missing_credit_score += usize::from(snapshot_flags.missing_credit_score);
        flags.missing_dti += usize::from(snapshot_flags.missing_dti);
        flags.high_risk_profile += usize::from(snapshot_flags.high_risk_profile);
    }

    let top_strengths = top_narratives(
        selected
            .iter()
            .flat_map(|entry| entry.snapshot.key_strengths.iter()),
    );
    let top_risks = top_narratives(selected.iter().flat_map(|entry| entry.snapshot.key_risks.iter()));
    let top_actions = top_narratives(
        selected
            .iter()
            .flat_map(|entry| entry.snapshot.high_impact_actions.iter()),
    );

    let window = AnalyticsWindow {
        from: filter.from,
        to: filter.to,
        earliest: selected.iter().map(|entry| entry.recorded_at).min(),
        latest: selected.iter().map(|entry| entry.recorded_at).max(),
    };

    AnalyticsSummary {
        total_assessments,
        average_score,
        tier_distribution,
        goal_distribution,
        score_buckets,
        flags,
        top_strengths,
        top_risks,
        top_actions,
        window,
    }
}

/// Most frequent sentences first; ties break alphabetically.
fn top_narratives<'a, I>(sentences: I) -> Vec<NarrativeCount>
where
    I: Iterator<Item = &'a String>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for sentence in sentences {
        *counts.entry(sentence.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<NarrativeCount> = counts
        .into_iter()
        .map(|(text, count)| NarrativeCount {
            text: text.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|left, right| right.count.cmp(&left.count));
    ranked.truncate(TOP_NARRATIVES);
    ranked
}
