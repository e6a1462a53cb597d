use fundability::config::WebhookConfig;
use fundability::notify::{
    LeadNotification, NoopPublisher, NotificationPublisher, NotifyError, WebhookNotifier,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Publisher chosen from the webhook settings at startup.
pub(crate) enum ConfiguredPublisher {
    Webhooks(WebhookNotifier),
    Disabled(NoopPublisher),
}

impl ConfiguredPublisher {
    pub(crate) fn from_config(config: &WebhookConfig) -> Result<Self, NotifyError> {
        let targets = config.targets();
        if targets.is_empty() {
            return Ok(Self::Disabled(NoopPublisher));
        }
        WebhookNotifier::new(targets).map(Self::Webhooks)
    }

    pub(crate) fn target_count(&self) -> usize {
        match self {
            Self::Webhooks(notifier) => notifier.targets().len(),
            Self::Disabled(_) => 0,
        }
    }
}

impl NotificationPublisher for ConfiguredPublisher {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        match self {
            Self::Webhooks(notifier) => notifier.publish(notification),
            Self::Disabled(noop) => noop.publish(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_urls_disable_delivery() {
        let publisher = ConfiguredPublisher::from_config(&WebhookConfig::default())
            .expect("publisher builds");
        assert!(matches!(publisher, ConfiguredPublisher::Disabled(_)));
        assert_eq!(publisher.target_count(), 0);
    }

    #[test]
    fn configured_urls_enable_webhooks() {
        let config = WebhookConfig {
            slack_url: Some("https://hooks.example.com/services/T1".to_string()),
            crm_url: Some("https://crm.example.com/contacts".to_string()),
            crm_token: Some("token".to_string()),
        };
        let publisher = ConfiguredPublisher::from_config(&config).expect("publisher builds");
        assert_eq!(publisher.target_count(), 2);
    }
}
