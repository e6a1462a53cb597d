use super::domain::{FundabilityTier, Subscores, ValidatedInput};

/// `(minimum credit score, subscore)`; first matching row wins.
const CREDIT_SCORE_STEPS: [(u16, u8); 6] = [
    (750, 95),
    (720, 90),
    (680, 80),
    (640, 65),
    (600, 45),
    (550, 30),
];
const CREDIT_SCORE_FLOOR: u8 = 15;
const CREDIT_SCORE_MISSING: u8 = 40;

/// `(exclusive upper bound %, subscore)`.
const UTILIZATION_STEPS: [(f64, u8); 5] = [(10.0, 95), (30.0, 90), (50.0, 75), (75.0, 50), (90.0, 30)];
const UTILIZATION_FLOOR: u8 = 15;

/// `(exclusive upper bound %, subscore)`.
const DTI_STEPS: [(f64, u8); 4] = [(25.0, 95), (35.0, 85), (45.0, 70), (55.0, 45)];
const DTI_FLOOR: u8 = 25;
const DTI_MISSING: u8 = 55;

/// `(inclusive upper bound, subscore)`.
const INQUIRY_STEPS: [(u32, u8); 4] = [(1, 95), (3, 80), (5, 60), (8, 35)];
const INQUIRY_FLOOR: u8 = 20;

/// `(minimum oldest-account years, minimum open tradelines, subscore)`.
const DEPTH_MIX_STEPS: [(f64, u32, u8); 3] = [(10.0, 6, 95), (7.0, 4, 85), (3.0, 3, 70)];
const DEPTH_MIX_FLOOR: u8 = 45;

const MAJOR_EVENT_PENALTY: i8 = -25;
/// `(minimum derogatory marks, penalty)`.
const DEROG_PENALTY_STEPS: [(u32, i8); 2] = [(3, -20), (1, -10)];
const PENALTY_FLOOR: i8 = -35;

/// Aggregate weights expressed in percent of each subscore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub credit: u32,
    pub utilization: u32,
    pub dti: u32,
    pub inquiry: u32,
    pub depth_mix: u32,
}

pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    credit: 30,
    utilization: 25,
    dti: 20,
    inquiry: 10,
    depth_mix: 10,
};

/// `(minimum aggregate score, tier)`; scores below the last row land in tier 4.
const TIER_STEPS: [(u8, FundabilityTier); 3] = [
    (85, FundabilityTier::ReadyNow),
    (70, FundabilityTier::TuneUp),
    (55, FundabilityTier::OptimizationRequired),
];

fn step_at_least<T: PartialOrd + Copy, V: Copy>(value: T, steps: &[(T, V)], floor: V) -> V {
    steps
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, mapped)| *mapped)
        .unwrap_or(floor)
}

fn step_below<T: PartialOrd + Copy, V: Copy>(value: T, steps: &[(T, V)], floor: V) -> V {
    steps
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, mapped)| *mapped)
        .unwrap_or(floor)
}

fn step_at_most<T: PartialOrd + Copy, V: Copy>(value: T, steps: &[(T, V)], floor: V) -> V {
    steps
        .iter()
        .find(|(bound, _)| value <= *bound)
        .map(|(_, mapped)| *mapped)
        .unwrap_or(floor)
}

pub(crate) fn credit_subscore(credit_score: Option<u16>) -> u8 {
    match credit_score {
        Some(score) => step_at_least(score, &CREDIT_SCORE_STEPS, CREDIT_SCORE_FLOOR),
        None => CREDIT_SCORE_MISSING,
    }
}

pub(crate) fn utilization_subscore(utilization_pct: f64) -> u8 {
    step_below(utilization_pct, &UTILIZATION_STEPS, UTILIZATION_FLOOR)
}

pub(crate) fn dti_subscore(dti_pct: Option<f64>) -> u8 {
    match dti_pct {
        Some(pct) => step_below(pct, &DTI_STEPS, DTI_FLOOR),
        None => DTI_MISSING,
    }
}

pub(crate) fn inquiry_subscore(inquiries: u32) -> u8 {
    step_at_most(inquiries, &INQUIRY_STEPS, INQUIRY_FLOOR)
}

pub(crate) fn depth_mix_subscore(oldest_account_years: f64, open_tradelines: u32) -> u8 {
    DEPTH_MIX_STEPS
        .iter()
        .find(|(years, lines, _)| oldest_account_years >= *years && open_tradelines >= *lines)
        .map(|(_, _, mapped)| *mapped)
        .unwrap_or(DEPTH_MIX_FLOOR)
}

pub(crate) fn penalty_points(major_event: bool, recent_derogs: u32) -> i8 {
    let event = if major_event { MAJOR_EVENT_PENALTY } else { 0 };
    let derogs = step_at_least(recent_derogs, &DEROG_PENALTY_STEPS, 0);
    (event + derogs).max(PENALTY_FLOOR)
}

pub(crate) fn subscores_for(input: &ValidatedInput) -> Subscores {
    Subscores {
        credit: credit_subscore(input.credit_score),
        utilization: utilization_subscore(input.revolving_utilization_pct),
        dti: dti_subscore(input.dti_pct),
        inquiry: inquiry_subscore(input.inquiries_6m),
        depth_mix: depth_mix_subscore(input.oldest_account_years, input.open_tradelines),
        penalty_points: penalty_points(input.bk_or_major_event, input.recent_derogs_24m),
    }
}

/// Weighted sum of the positive subscores plus the raw penalty, rounded half up
/// and clamped into `0..=100`.
pub(crate) fn aggregate_score(subscores: &Subscores) -> u8 {
    let weights = SCORE_WEIGHTS;
    let weighted_hundredths = i64::from(subscores.credit) * i64::from(weights.credit)
        + i64::from(subscores.utilization) * i64::from(weights.utilization)
        + i64::from(subscores.dti) * i64::from(weights.dti)
        + i64::from(subscores.inquiry) * i64::from(weights.inquiry)
        + i64::from(subscores.depth_mix) * i64::from(weights.depth_mix)
        + i64::from(subscores.penalty_points) * 100;

    let rounded = (weighted_hundredths as f64 / 100.0).round();
    rounded.clamp(0.0, 100.0) as u8
}

pub(crate) fn tier_for_score(score: u8) -> FundabilityTier {
    step_at_least(score, &TIER_STEPS, FundabilityTier::Rehab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_boundaries_are_inclusive_lower() {
        assert_eq!(credit_subscore(Some(750)), 95);
        assert_eq!(credit_subscore(Some(749)), 90);
        assert_eq!(credit_subscore(Some(550)), 30);
        assert_eq!(credit_subscore(Some(549)), 15);
        assert_eq!(credit_subscore(None), 40);
    }

    #[test]
    fn utilization_upper_bounds_are_exclusive() {
        assert_eq!(utilization_subscore(9.99), 95);
        assert_eq!(utilization_subscore(29.9), 90);
        assert_eq!(utilization_subscore(30.0), 75);
        assert_eq!(utilization_subscore(89.0), 30);
        assert_eq!(utilization_subscore(90.0), 15);
    }

    #[test]
    fn dti_defaults_when_missing() {
        assert_eq!(dti_subscore(None), 55);
        assert_eq!(dti_subscore(Some(24.0)), 95);
        assert_eq!(dti_subscore(Some(55.0)), 25);
    }

    #[test]
    fn inquiry_bounds_are_inclusive() {
        assert_eq!(inquiry_subscore(0), 95);
        assert_eq!(inquiry_subscore(1), 95);
        assert_eq!(inquiry_subscore(3), 80);
        assert_eq!(inquiry_subscore(5), 60);
        assert_eq!(inquiry_subscore(8), 35);
        assert_eq!(inquiry_subscore(9), 20);
    }

    #[test]
    fn depth_mix_requires_both_dimensions() {
        assert_eq!(depth_mix_subscore(10.0, 6), 95);
        assert_eq!(depth_mix_subscore(12.0, 5), 85);
        assert_eq!(depth_mix_subscore(20.0, 2), 45);
        assert_eq!(depth_mix_subscore(3.0, 3), 70);
    }

    #[test]
    fn penalties_stop_at_floor() {
        assert_eq!(penalty_points(false, 0), 0);
        assert_eq!(penalty_points(false, 2), -10);
        assert_eq!(penalty_points(false, 3), -20);
        assert_eq!(penalty_points(true, 0), -25);
        assert_eq!(penalty_points(true, 1), -35);
        assert_eq!(penalty_points(true, 9), -35);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(tier_for_score(100), FundabilityTier::ReadyNow);
        assert_eq!(tier_for_score(85), FundabilityTier::ReadyNow);
        assert_eq!(tier_for_score(84), FundabilityTier::TuneUp);
        assert_eq!(tier_for_score(70), FundabilityTier::TuneUp);
        assert_eq!(tier_for_score(69), FundabilityTier::OptimizationRequired);
        assert_eq!(tier_for_score(55), FundabilityTier::OptimizationRequired);
        assert_eq!(tier_for_score(54), FundabilityTier::Rehab);
        assert_eq!(tier_for_score(0), FundabilityTier::Rehab);
    }

    #[test]
    fn aggregate_rounds_half_up_and_clamps() {
        let prime = Subscores {
            credit: 90,
            utilization: 90,
            dti: 85,
            inquiry: 95,
            depth_mix: 95,
            penalty_points: 0,
        };
        assert_eq!(aggregate_score(&prime), 86);

        let distressed = Subscores {
            credit: 15,
            utilization: 15,
            dti: 25,
            inquiry: 20,
            depth_mix: 45,
            penalty_points: -35,
        };
        assert_eq!(aggregate_score(&distressed), 0);
    }
}
