use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::intake::ValidationErrors;
use crate::scoring::{FundabilityTier, PrimaryGoal};

/// Raw query-string filters accepted by the analytics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// Parsed filter; every populated field must match for an entry to count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub tier: Option<FundabilityTier>,
    pub goal: Option<PrimaryGoal>,
}

impl AnalyticsFilter {
    pub fn from_query(query: &AnalyticsQuery) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        let from = parse_bound(query.from.as_deref(), "from", false, &mut errors);
        let to = parse_bound(query.to.as_deref(), "to", true, &mut errors);

        let tier = match non_blank(query.tier.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = raw.parse::<u8>().ok().and_then(FundabilityTier::from_numeric);
                if parsed.is_none() {
                    errors.push("tier must be an integer between 1 and 4".to_string());
                }
                parsed
            }
        };

        let goal = match non_blank(query.goal.as_deref()) {
            None => None,
            Some(raw) => {
                let parsed = PrimaryGoal::parse(raw);
                if parsed.is_none() {
                    errors.push(format!(
                        "goal must be one of: {}",
                        crate::intake::goal_options()
                    ));
                }
                parsed
            }
        };

        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                errors.push("from must not be later than to".to_string());
            }
        }

        if errors.is_empty() {
            Ok(Self {
                from,
                to,
                tier,
                goal,
            })
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

/// RFC 3339 timestamps or plain dates; a plain `to` date covers the whole day.
fn parse_bound(
    value: Option<&str>,
    name: &str,
    end_of_day: bool,
    errors: &mut Vec<String>,
) -> Option<DateTime<Utc>> {
    let raw = non_blank(value)?;

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| {
            if end_of_day {
                date.and_hms_milli_opt(23, 59, 59, 999)
            } else {
                date.and_hms_opt(0, 0, 0)
            }
        })
        .map(|naive| naive.and_utc());

    if parsed.is_none() {
        errors.push(format!(
            "{name} must be an RFC 3339 timestamp or a YYYY-MM-DD date"
        ));
    }
    parsed
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: u8,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCount {
    pub goal: PrimaryGoal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucket {
    pub range: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlagCounts {
    pub missing_credit_score: usize,
    pub missing_dti: usize,
    pub high_risk_profile: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeCount {
    pub text: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<DateTime<Utc>>,
}

/// Aggregate view over the retained assessments matching a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_assessments: usize,
    pub average_score: Option<f64>,
    pub tier_distribution: Vec<TierCount>,
    pub goal_distribution: Vec<GoalCount>,
    pub score_buckets: Vec<ScoreBucket>,
    pub flags: FlagCounts,
    pub top_strengths: Vec<NarrativeCount>,
    pub top_risks: Vec<NarrativeCount>,
    pub top_actions: Vec<NarrativeCount>,
    pub window: AnalyticsWindow,
}
