use super::domain::{FundabilityTier, PrimaryGoal, Subscores, ValidatedInput};

const OPTIMIZATION_UTILIZATION_PCT: f64 = 75.0;
const OPTIMIZATION_DTI_PCT: f64 = 70.0;
const OPTIMIZATION_INQUIRY_SUBSCORE: u8 = 60;

fn current_range(tier: FundabilityTier) -> &'static str {
    match tier {
        FundabilityTier::ReadyNow => "$75,000 - $250,000",
        FundabilityTier::TuneUp => "$35,000 - $100,000",
        FundabilityTier::OptimizationRequired => "$10,000 - $35,000",
        FundabilityTier::Rehab => "$0 - $10,000",
    }
}

fn optimized_range(tier: FundabilityTier) -> &'static str {
    match tier {
        FundabilityTier::ReadyNow => "$100,000 - $350,000",
        FundabilityTier::TuneUp => "$50,000 - $150,000",
        FundabilityTier::OptimizationRequired => "$20,000 - $50,000",
        FundabilityTier::Rehab => "$5,000 - $15,000",
    }
}

pub(crate) fn funding_range_now(tier: FundabilityTier) -> String {
    current_range(tier).to_string()
}

/// Compares raw utilization and DTI percentages but the inquiry *subscore*.
/// An absent DTI never satisfies the DTI clause.
pub(crate) fn has_optimization_headroom(input: &ValidatedInput, subscores: &Subscores) -> bool {
    input.revolving_utilization_pct <= OPTIMIZATION_UTILIZATION_PCT
        || input
            .dti_pct
            .map(|dti| dti <= OPTIMIZATION_DTI_PCT)
            .unwrap_or(false)
        || subscores.inquiry <= OPTIMIZATION_INQUIRY_SUBSCORE
}

pub(crate) fn funding_range_after_optimization(
    tier: FundabilityTier,
    input: &ValidatedInput,
    subscores: &Subscores,
) -> String {
    if has_optimization_headroom(input, subscores) {
        optimized_range(tier.promoted()).to_string()
    } else {
        funding_range_now(tier)
    }
}

struct GoalPath {
    goal: PrimaryGoal,
    ready: &'static str,
    /// Used for tiers 3 and 4; `None` when the goal reads the same at every tier.
    rebuilding: Option<&'static str>,
}

const GOAL_PATHS: [GoalPath; 7] = [
    GoalPath {
        goal: PrimaryGoal::BusinessFunding,
        ready: "Apply for 0% business credit lines and an SBA-backed term loan while the profile is strong.",
        rebuilding: Some("Optimize personal credit first, then open starter business tradelines before pursuing larger business funding."),
    },
    GoalPath {
        goal: PrimaryGoal::PersonalLoan,
        ready: "Shop prime personal-loan offers with soft-pull prequalification to lock the best rate.",
        rebuilding: Some("Hold off on personal-loan applications until utilization and inquiries improve; consider a credit-builder loan meanwhile."),
    },
    GoalPath {
        goal: PrimaryGoal::AutoLoan,
        ready: "Get preapproved through a credit union before visiting dealers to anchor the rate negotiation.",
        rebuilding: Some("Plan a larger down payment and target a co-signer or credit-union auto program while rebuilding credit."),
    },
    GoalPath {
        goal: PrimaryGoal::Mortgage,
        ready: "Request mortgage preapproval from multiple lenders within a 14-day window to limit inquiry impact.",
        rebuilding: Some("Work on DTI and payment history for 6-12 months, then revisit FHA or other low-down-payment programs."),
    },
    GoalPath {
        goal: PrimaryGoal::DebtConsolidation,
        ready: "Consolidate high-interest balances with a low-rate consolidation loan or 0% balance transfer.",
        rebuilding: Some("Start with a debt-management plan or secured consolidation option before applying for unsecured consolidation."),
    },
    GoalPath {
        goal: PrimaryGoal::ImproveCredit,
        ready: "Follow a 90-day credit improvement plan: lower utilization, dispute errors, and keep every payment on time.",
        rebuilding: None,
    },
    GoalPath {
        goal: PrimaryGoal::RaiseScoreFast,
        ready: "Pay cards below 10% utilization before statement dates and request rapid rescoring to lift the score quickly.",
        rebuilding: None,
    },
];

pub(crate) fn goal_path(goal: PrimaryGoal, tier: FundabilityTier) -> String {
    let rebuilding_tier = tier.numeric() >= 3;
    GOAL_PATHS
        .iter()
        .find(|path| path.goal == goal)
        .map(|path| match (rebuilding_tier, path.rebuilding) {
            (true, Some(sentence)) => sentence,
            _ => path.ready,
        })
        .unwrap_or(GOAL_PATHS[0].ready)
        .to_string()
}
