use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::analytics::{AnalyticsFilter, AnalyticsSink, AnalyticsSummary};
use crate::intake::{self, ValidationErrors};
use crate::notify::{LeadNotification, NotificationPublisher};
use crate::scoring::{self, Snapshot, ValidatedInput};

/// Service composing the validator, the scoring function, the analytics sink
/// and outbound notifications.
pub struct FundabilityService<S, N> {
    analytics: Arc<S>,
    notifier: Arc<N>,
    expose_internal_errors: bool,
}

impl<S, N> FundabilityService<S, N>
where
    S: AnalyticsSink + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(analytics: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            analytics,
            notifier,
            expose_internal_errors: true,
        }
    }

    /// Controls whether internal failure details reach HTTP callers.
    pub fn with_internal_error_details(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    pub fn exposes_internal_errors(&self) -> bool {
        self.expose_internal_errors
    }

    pub fn analytics(&self) -> &Arc<S> {
        &self.analytics
    }

    /// Validate a raw submission and score it.
    pub fn assess(&self, raw: &Value) -> Result<Snapshot, FundabilityServiceError> {
        let input = intake::validate(raw).map_err(|errors| {
            tracing::info!(violations = errors.details().len(), "fundability submission rejected");
            errors
        })?;
        self.assess_validated(&input)
    }

    /// Score an already validated input, then record and announce the result.
    /// Analytics and notification failures never fail the assessment.
    pub fn assess_validated(
        &self,
        input: &ValidatedInput,
    ) -> Result<Snapshot, FundabilityServiceError> {
        let snapshot = panic::catch_unwind(AssertUnwindSafe(|| scoring::score(input)))
            .map_err(|payload| FundabilityServiceError::Internal(panic_message(payload)))?;

        self.analytics.record(input, &snapshot);

        if let Err(error) = self
            .notifier
            .publish(LeadNotification::new(input, &snapshot))
        {
            tracing::warn!(%error, "lead notification not dispatched");
        }

        tracing::info!(
            score = snapshot.fundability_score,
            tier = snapshot.fundability_tier_numeric,
            goal = %input.primary_goal,
            high_risk = snapshot.flags.high_risk_profile,
            "fundability snapshot generated"
        );

        Ok(snapshot)
    }

    pub fn summarize(&self, filter: &AnalyticsFilter) -> AnalyticsSummary {
        self.analytics.summarize(filter)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scoring panicked".to_string()
    }
}

/// Error raised by the fundability service.
#[derive(Debug, thiserror::Error)]
pub enum FundabilityServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("internal scoring failure: {0}")]
    Internal(String),
}
