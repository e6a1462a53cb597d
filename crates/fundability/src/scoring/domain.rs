use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Funding objective declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    BusinessFunding,
    PersonalLoan,
    AutoLoan,
    Mortgage,
    DebtConsolidation,
    ImproveCredit,
    RaiseScoreFast,
}

impl PrimaryGoal {
    pub const ALL: [PrimaryGoal; 7] = [
        PrimaryGoal::BusinessFunding,
        PrimaryGoal::PersonalLoan,
        PrimaryGoal::AutoLoan,
        PrimaryGoal::Mortgage,
        PrimaryGoal::DebtConsolidation,
        PrimaryGoal::ImproveCredit,
        PrimaryGoal::RaiseScoreFast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryGoal::BusinessFunding => "business_funding",
            PrimaryGoal::PersonalLoan => "personal_loan",
            PrimaryGoal::AutoLoan => "auto_loan",
            PrimaryGoal::Mortgage => "mortgage",
            PrimaryGoal::DebtConsolidation => "debt_consolidation",
            PrimaryGoal::ImproveCredit => "improve_credit",
            PrimaryGoal::RaiseScoreFast => "raise_score_fast",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str() == normalized)
    }
}

impl fmt::Display for PrimaryGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structurally checked applicant record accepted by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub credit_score: Option<u16>,
    pub revolving_utilization_pct: f64,
    pub dti_pct: Option<f64>,
    pub inquiries_6m: u32,
    pub oldest_account_years: f64,
    pub open_tradelines: u32,
    pub recent_derogs_24m: u32,
    pub bk_or_major_event: bool,
    pub requested_amount: f64,
    pub primary_goal: PrimaryGoal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_home_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_contact_id: Option<String>,
}

impl ValidatedInput {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Coarse readiness classification derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FundabilityTier {
    ReadyNow,
    TuneUp,
    OptimizationRequired,
    Rehab,
}

impl FundabilityTier {
    pub fn numeric(&self) -> u8 {
        match self {
            FundabilityTier::ReadyNow => 1,
            FundabilityTier::TuneUp => 2,
            FundabilityTier::OptimizationRequired => 3,
            FundabilityTier::Rehab => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FundabilityTier::ReadyNow => "Ready Now (Prime)",
            FundabilityTier::TuneUp => "Tune-Up Then Ready",
            FundabilityTier::OptimizationRequired => "Optimization Required",
            FundabilityTier::Rehab => "Rehab / Long-Term Plan",
        }
    }

    pub fn from_numeric(value: u8) -> Option<Self> {
        match value {
            1 => Some(FundabilityTier::ReadyNow),
            2 => Some(FundabilityTier::TuneUp),
            3 => Some(FundabilityTier::OptimizationRequired),
            4 => Some(FundabilityTier::Rehab),
            _ => None,
        }
    }

    /// One level closer to tier 1; tier 1 stays put.
    pub fn promoted(&self) -> Self {
        match self {
            FundabilityTier::ReadyNow | FundabilityTier::TuneUp => FundabilityTier::ReadyNow,
            FundabilityTier::OptimizationRequired => FundabilityTier::TuneUp,
            FundabilityTier::Rehab => FundabilityTier::OptimizationRequired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscores {
    pub credit: u8,
    pub utilization: u8,
    pub dti: u8,
    pub inquiry: u8,
    pub depth_mix: u8,
    pub penalty_points: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFlags {
    pub missing_credit_score: bool,
    pub missing_utilization: bool,
    pub missing_dti: bool,
    pub high_risk_profile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: String,
    pub generated_at: DateTime<Utc>,
}

/// Scoring result returned to callers and consumed by the collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fundability_score: u8,
    pub fundability_tier_numeric: u8,
    pub fundability_tier_label: String,
    pub subscores: Subscores,
    pub key_strengths: Vec<String>,
    pub key_risks: Vec<String>,
    pub high_impact_actions: Vec<String>,
    pub funding_range_now: String,
    pub funding_range_after_optimization: String,
    pub goal_path: String,
    pub flags: SnapshotFlags,
    pub meta: SnapshotMeta,
}

impl Snapshot {
    pub fn tier(&self) -> Option<FundabilityTier> {
        FundabilityTier::from_numeric(self.fundability_tier_numeric)
    }
}
