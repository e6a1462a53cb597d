use super::domain::{Subscores, ValidatedInput};

const MAX_STRENGTHS: usize = 3;
const MAX_RISKS: usize = 3;
const MAX_ACTIONS: usize = 5;

const STRENGTH_THRESHOLD: u8 = 80;

const STRENGTH_CREDIT: &str = "Credit score sits in a range most lenders treat as strong.";
const STRENGTH_UTILIZATION: &str =
    "Revolving utilization is low, which signals disciplined use of available credit.";
const STRENGTH_DTI: &str = "Debt-to-income ratio leaves healthy room for new obligations.";
const STRENGTH_DEPTH_MIX: &str = "Seasoned credit history with a solid mix of open accounts.";
const STRENGTH_FALLBACK: &str =
    "The profile has a workable foundation that targeted changes can build on.";

const RISK_UTILIZATION: &str =
    "High revolving utilization is suppressing the score and approval odds.";
const RISK_DTI: &str = "Debt-to-income ratio is above what most lenders prefer to see.";
const RISK_INQUIRIES: &str =
    "Recent hard inquiries may read as credit-seeking behavior to underwriters.";
const RISK_DEROGATORY: &str =
    "Recent derogatory marks or a major credit event weigh heavily on approvals.";
const RISK_FALLBACK: &str =
    "No major risk factors detected; keep balances low and avoid new inquiries.";

pub(crate) fn key_strengths(subscores: &Subscores) -> Vec<String> {
    let candidates = [
        (subscores.credit, STRENGTH_CREDIT),
        (subscores.utilization, STRENGTH_UTILIZATION),
        (subscores.dti, STRENGTH_DTI),
        (subscores.depth_mix, STRENGTH_DEPTH_MIX),
    ];

    let strengths: Vec<String> = candidates
        .iter()
        .filter(|(score, _)| *score >= STRENGTH_THRESHOLD)
        .map(|(_, sentence)| sentence.to_string())
        .take(MAX_STRENGTHS)
        .collect();

    if strengths.is_empty() {
        vec![STRENGTH_FALLBACK.to_string()]
    } else {
        strengths
    }
}

pub(crate) fn key_risks(subscores: &Subscores) -> Vec<String> {
    let candidates = [
        (subscores.utilization <= 50, RISK_UTILIZATION),
        (subscores.dti <= 45, RISK_DTI),
        (subscores.inquiry <= 60, RISK_INQUIRIES),
        (subscores.penalty_points < 0, RISK_DEROGATORY),
    ];

    let risks: Vec<String> = candidates
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, sentence)| sentence.to_string())
        .take(MAX_RISKS)
        .collect();

    if risks.is_empty() {
        vec![RISK_FALLBACK.to_string()]
    } else {
        risks
    }
}

/// Ranked recommendation before truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActionCandidate {
    pub(crate) priority: u8,
    pub(crate) sentence: String,
}

pub(crate) fn action_candidates(
    input: &ValidatedInput,
    subscores: &Subscores,
) -> Vec<ActionCandidate> {
    let mut candidates = Vec::new();
    let utilization = input.revolving_utilization_pct;

    if subscores.utilization <= 75 {
        candidates.push(ActionCandidate {
            priority: if subscores.utilization <= 50 { 100 } else { 80 },
            sentence: format!(
                "Pay revolving balances down from {utilization}% to under 30% utilization (under 10% is ideal)."
            ),
        });
    }

    if subscores.dti <= 70 {
        let sentence = match input.dti_pct {
            Some(dti) => format!(
                "Bring debt-to-income down from {dti}% to below 35% by paying down installment debt or documenting additional income."
            ),
            None => "Document income and monthly debts so lenders can verify a debt-to-income ratio below 35%."
                .to_string(),
        };
        candidates.push(ActionCandidate {
            priority: if subscores.dti <= 45 { 95 } else { 75 },
            sentence,
        });
    }

    if subscores.inquiry <= 60 {
        candidates.push(ActionCandidate {
            priority: 85,
            sentence: format!(
                "Pause new credit applications; {} hard inquiries in the last 6 months need time to age.",
                input.inquiries_6m
            ),
        });
    }

    if subscores.penalty_points < 0 {
        candidates.push(ActionCandidate {
            priority: 90,
            sentence: "Address derogatory items: dispute inaccuracies and request goodwill removals where possible."
                .to_string(),
        });
    }

    if subscores.depth_mix <= 70 {
        candidates.push(ActionCandidate {
            priority: 60,
            sentence: format!(
                "Strengthen credit depth with seasoned tradelines; currently {} open accounts with the oldest at {} years.",
                input.open_tradelines, input.oldest_account_years
            ),
        });
    }

    if subscores.credit <= 65 {
        candidates.push(ActionCandidate {
            priority: 70,
            sentence: "Focus on lifting the credit score above 680 to unlock better rates and terms."
                .to_string(),
        });
    }

    if utilization >= 50.0 && subscores.credit >= 65 {
        candidates.push(ActionCandidate {
            priority: 85,
            sentence: format!(
                "Use a 0% balance transfer to consolidate revolving balances and cut utilization from {utilization}%."
            ),
        });
    }

    candidates
}

/// Highest priority first; ties keep their candidate order.
pub(crate) fn high_impact_actions(input: &ValidatedInput, subscores: &Subscores) -> Vec<String> {
    let mut candidates = action_candidates(input, subscores);
    candidates.sort_by(|left, right| right.priority.cmp(&left.priority));
    candidates
        .into_iter()
        .take(MAX_ACTIONS)
        .map(|candidate| candidate.sentence)
        .collect()
}
