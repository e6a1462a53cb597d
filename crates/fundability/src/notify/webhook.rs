use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::format::{chat_message, crm_update, LeadNotification};
use super::{NotificationPublisher, NotifyError};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload family a webhook destination expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookKind {
    Chat,
    Crm,
}

impl WebhookKind {
    pub fn label(&self) -> &'static str {
        match self {
            WebhookKind::Chat => "chat",
            WebhookKind::Crm => "crm",
        }
    }

    fn payload(&self, notification: &LeadNotification) -> Value {
        match self {
            WebhookKind::Chat => chat_message(notification),
            WebhookKind::Crm => crm_update(notification),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub kind: WebhookKind,
    pub url: String,
    pub bearer_token: Option<String>,
}

/// Posts each notification to every configured target on its own task.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    targets: Vec<WebhookTarget>,
}

impl WebhookNotifier {
    pub fn new(targets: Vec<WebhookTarget>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|err| NotifyError::Transport(format!("failed to build client: {err}")))?;
        Ok(Self { client, targets })
    }

    pub fn targets(&self) -> &[WebhookTarget] {
        &self.targets
    }

    /// Spawn one delivery task per target; a failing target never affects the others.
    pub fn dispatch(
        &self,
        notification: &LeadNotification,
    ) -> Result<Vec<JoinHandle<Result<(), NotifyError>>>, NotifyError> {
        let runtime = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;

        let handles = self
            .targets
            .iter()
            .cloned()
            .map(|target| {
                let client = self.client.clone();
                let payload = target.kind.payload(notification);
                runtime.spawn(async move {
                    let result = deliver(&client, &target, &payload).await;
                    match &result {
                        Ok(()) => tracing::debug!(
                            target_kind = target.kind.label(),
                            "webhook delivered"
                        ),
                        Err(err) => tracing::warn!(
                            target_kind = target.kind.label(),
                            error = %err,
                            "webhook delivery failed"
                        ),
                    }
                    result
                })
            })
            .collect();

        Ok(handles)
    }
}

impl NotificationPublisher for WebhookNotifier {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        self.dispatch(&notification).map(|_| ())
    }
}

async fn deliver(
    client: &reqwest::Client,
    target: &WebhookTarget,
    payload: &Value,
) -> Result<(), NotifyError> {
    let mut request = client.post(&target.url).json(payload);
    if let Some(token) = &target.bearer_token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|err| NotifyError::Transport(err.to_string()))?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(NotifyError::Rejected {
            target: target.kind.label(),
            status: status.as_u16(),
        })
    }
}
