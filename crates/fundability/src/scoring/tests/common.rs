use chrono::{DateTime, TimeZone, Utc};

use crate::scoring::domain::{PrimaryGoal, ValidatedInput};

pub(super) fn frozen_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Profile from the reference scenario: every subscore in its top bands.
pub(super) fn prime_input() -> ValidatedInput {
    ValidatedInput {
        first_name: "Dana".to_string(),
        last_name: "Whitfield".to_string(),
        email: "dana@example.com".to_string(),
        credit_score: Some(720),
        revolving_utilization_pct: 25.0,
        dti_pct: Some(30.0),
        inquiries_6m: 1,
        oldest_account_years: 10.0,
        open_tradelines: 8,
        recent_derogs_24m: 0,
        bk_or_major_event: false,
        requested_amount: 50_000.0,
        primary_goal: PrimaryGoal::BusinessFunding,
        est_home_value: None,
        mortgage_balance: None,
        source: None,
        external_contact_id: None,
    }
}

pub(super) fn distressed_input() -> ValidatedInput {
    ValidatedInput {
        credit_score: Some(580),
        revolving_utilization_pct: 92.0,
        dti_pct: Some(60.0),
        inquiries_6m: 9,
        oldest_account_years: 2.0,
        open_tradelines: 2,
        recent_derogs_24m: 3,
        bk_or_major_event: true,
        primary_goal: PrimaryGoal::Mortgage,
        ..prime_input()
    }
}

pub(super) fn revolving_heavy_input() -> ValidatedInput {
    ValidatedInput {
        credit_score: Some(700),
        revolving_utilization_pct: 60.0,
        dti_pct: Some(20.0),
        inquiries_6m: 2,
        oldest_account_years: 8.0,
        open_tradelines: 5,
        primary_goal: PrimaryGoal::DebtConsolidation,
        ..prime_input()
    }
}
