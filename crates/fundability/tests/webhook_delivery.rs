//! Webhook delivery against local mock endpoints.

use std::sync::Arc;
use std::time::Duration;

use fundability::analytics::AnalyticsStore;
use fundability::intake;
use fundability::notify::{
    LeadNotification, NotifyError, WebhookKind, WebhookNotifier, WebhookTarget,
};
use fundability::{score, FundabilityService};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lead_body() -> Value {
    json!({
        "first_name": "Quinn",
        "last_name": "Ellis",
        "email": "quinn@example.com",
        "credit_score": 705,
        "revolving_utilization_pct": 38,
        "dti_pct": 33,
        "open_tradelines": 5,
        "requested_amount": 30000,
        "primary_goal": "auto_loan",
        "external_contact_id": "crm-314"
    })
}

fn notification() -> LeadNotification {
    let input = intake::validate(&lead_body()).expect("lead validates");
    let snapshot = score(&input);
    LeadNotification::new(&input, &snapshot)
}

#[tokio::test]
async fn failing_target_does_not_block_the_other() {
    let chat = MockServer::start().await;
    let crm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&chat)
        .await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(header("authorization", "Bearer crm-secret"))
        .and(body_partial_json(json!({
            "contact": { "id": "crm-314", "email": "quinn@example.com" },
            "properties": { "fundability_goal": "auto_loan" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&crm)
        .await;

    let notifier = WebhookNotifier::new(vec![
        WebhookTarget {
            kind: WebhookKind::Chat,
            url: format!("{}/chat", chat.uri()),
            bearer_token: None,
        },
        WebhookTarget {
            kind: WebhookKind::Crm,
            url: format!("{}/contacts", crm.uri()),
            bearer_token: Some("crm-secret".to_string()),
        },
    ])
    .expect("notifier builds");

    let handles = notifier
        .dispatch(&notification())
        .expect("runtime available");
    assert_eq!(handles.len(), 2);

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("delivery task completes"));
    }

    assert!(matches!(
        results[0],
        Err(NotifyError::Rejected {
            target: "chat",
            status: 500
        })
    ));
    assert!(results[1].is_ok());
}

#[test]
fn dispatch_outside_runtime_is_reported() {
    let notifier = WebhookNotifier::new(vec![WebhookTarget {
        kind: WebhookKind::Chat,
        url: "http://127.0.0.1:9/unused".to_string(),
        bearer_token: None,
    }])
    .expect("notifier builds");

    assert!(matches!(
        notifier.dispatch(&notification()),
        Err(NotifyError::NoRuntime)
    ));
}

#[tokio::test]
async fn service_assessment_triggers_chat_message() {
    let chat = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&chat)
        .await;

    let notifier = WebhookNotifier::new(vec![WebhookTarget {
        kind: WebhookKind::Chat,
        url: format!("{}/hook", chat.uri()),
        bearer_token: None,
    }])
    .expect("notifier builds");
    let service = FundabilityService::new(
        Arc::new(AnalyticsStore::with_capacity(4)),
        Arc::new(notifier),
    );

    let snapshot = service.assess(&lead_body()).expect("lead scores");

    let mut received = Vec::new();
    for _ in 0..50 {
        received = chat.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(received.len(), 1);
    let message: Value = serde_json::from_slice(&received[0].body).expect("json payload");
    assert_eq!(message["blocks"][0]["type"], "header");
    assert!(message["text"]
        .as_str()
        .expect("fallback text")
        .contains(&snapshot.fundability_score.to_string()));
}
