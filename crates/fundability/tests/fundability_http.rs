//! End-to-end scenarios through the public router: validation, scoring,
//! analytics recording and notification hand-off.

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use fundability::analytics::AnalyticsStore;
use fundability::notify::{LeadNotification, NotificationPublisher, NotifyError};
use fundability::{fundability_router, FundabilityService};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Default)]
struct CapturedLeads {
    leads: Mutex<Vec<LeadNotification>>,
}

impl NotificationPublisher for CapturedLeads {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        self.leads
            .lock()
            .expect("lead mutex poisoned")
            .push(notification);
        Ok(())
    }
}

fn scenario_body() -> Value {
    json!({
        "first_name": "Dana",
        "last_name": "Whitfield",
        "email": "dana@example.com",
        "credit_score": 720,
        "revolving_utilization_pct": 25,
        "dti_pct": 30,
        "inquiries_6m": 1,
        "oldest_account_years": 10,
        "open_tradelines": 8,
        "recent_derogs_24m": 0,
        "bk_or_major_event": false,
        "requested_amount": 50000,
        "primary_goal": "business_funding",
        "source": "website"
    })
}

async fn call(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn post(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/fundability")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn build() -> (axum::Router, Arc<AnalyticsStore>, Arc<CapturedLeads>) {
    let analytics = Arc::new(AnalyticsStore::with_capacity(100));
    let leads = Arc::new(CapturedLeads::default());
    let service = FundabilityService::new(analytics.clone(), leads.clone());
    (fundability_router(Arc::new(service)), analytics, leads)
}

#[tokio::test]
async fn prime_applicant_scores_ready_now() {
    let (router, analytics, leads) = build();

    let (status, body) = call(router, post(&scenario_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fundability_score"], 86);
    assert_eq!(body["fundability_tier_numeric"], 1);
    assert_eq!(body["fundability_tier_label"], "Ready Now (Prime)");
    assert_eq!(body["funding_range_now"], "$75,000 - $250,000");
    assert_eq!(body["flags"]["missing_dti"], false);
    assert_eq!(body["flags"]["high_risk_profile"], false);
    assert!(body["key_strengths"].as_array().map_or(0, Vec::len) <= 3);
    assert!(body["high_impact_actions"].as_array().map_or(0, Vec::len) <= 5);

    assert_eq!(analytics.len(), 1);
    let leads = leads.leads.lock().expect("lead mutex poisoned");
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Dana Whitfield");
    assert_eq!(leads[0].source.as_deref(), Some("website"));
}

#[tokio::test]
async fn missing_credit_and_dti_use_defaults() {
    let (router, _, _) = build();
    let mut body = scenario_body();
    body["credit_score"] = Value::Null;
    body.as_object_mut()
        .expect("object body")
        .remove("dti_pct");

    let (status, snapshot) = call(router, post(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["subscores"]["credit"], 40);
    assert_eq!(snapshot["subscores"]["dti"], 55);
    assert_eq!(snapshot["flags"]["missing_credit_score"], true);
    assert_eq!(snapshot["flags"]["missing_dti"], true);
}

#[tokio::test]
async fn every_violation_is_reported() {
    let (router, analytics, leads) = build();
    let body = json!({
        "first_name": "",
        "email": "not-an-email",
        "revolving_utilization_pct": 150,
        "open_tradelines": 3,
        "requested_amount": 0
    });

    let (status, payload) = call(router, post(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], "Validation failed");
    let details: Vec<String> = payload["details"]
        .as_array()
        .expect("details array")
        .iter()
        .filter_map(|detail| detail.as_str().map(str::to_string))
        .collect();
    assert!(details.iter().any(|d| d.contains("first_name")));
    assert!(details.iter().any(|d| d.contains("last_name")));
    assert!(details.iter().any(|d| d.contains("email")));
    assert!(details
        .iter()
        .any(|d| d.contains("revolving_utilization_pct") && d.contains("0 and 100")));
    assert!(details.iter().any(|d| d.contains("requested_amount")));
    let goal = details
        .iter()
        .find(|d| d.contains("primary_goal"))
        .expect("goal violation reported");
    for option in ["business_funding", "raise_score_fast", "debt_consolidation"] {
        assert!(goal.contains(option));
    }

    assert!(analytics.is_empty());
    assert!(leads.leads.lock().expect("lead mutex poisoned").is_empty());
}

#[tokio::test]
async fn analytics_filters_by_goal_and_tier() {
    let (router, _, _) = build();
    let mut consolidation = scenario_body();
    consolidation["primary_goal"] = json!("debt_consolidation");
    consolidation["revolving_utilization_pct"] = json!(85);
    consolidation["recent_derogs_24m"] = json!(2);

    for body in [scenario_body(), scenario_body(), consolidation] {
        let (status, _) = call(router.clone(), post(&body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let analytics_request = |query: &str| {
        Request::builder()
            .uri(format!("/api/v1/fundability/analytics{query}"))
            .body(Body::empty())
            .expect("request builds")
    };

    let (status, all) = call(router.clone(), analytics_request("")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total_assessments"], 3);

    let (_, business) = call(
        router.clone(),
        analytics_request("?goal=business_funding&tier=1"),
    )
    .await;
    assert_eq!(business["total_assessments"], 2);
    assert_eq!(business["average_score"], 86.0);

    let (_, none) = call(router, analytics_request("?from=2999-01-01")).await;
    assert_eq!(none["total_assessments"], 0);
}
