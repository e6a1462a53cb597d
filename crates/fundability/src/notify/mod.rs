//! Outbound lead notifications: pure payload formatting plus fire-and-forget
//! webhook delivery.

pub mod format;
mod webhook;

pub use format::{chat_message, crm_update, LeadNotification};
pub use webhook::{WebhookKind, WebhookNotifier, WebhookTarget};

/// Outbound notification hook invoked after a snapshot is produced.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: LeadNotification) -> Result<(), NotifyError>;
}

/// Publisher used when no webhook destinations are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl NotificationPublisher for NoopPublisher {
    fn publish(&self, _notification: LeadNotification) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("no async runtime available for webhook delivery")]
    NoRuntime,
    #[error("webhook transport failed: {0}")]
    Transport(String),
    #[error("{target} webhook rejected the payload with status {status}")]
    Rejected { target: &'static str, status: u16 },
}
