//! Deterministic fundability scoring with the collaborators that surround it:
//! intake validation, an HTTP router, a bounded analytics store, CSV batch
//! processing and webhook notifications.

pub mod analytics;
pub mod batch;
pub mod config;
pub mod error;
pub mod intake;
pub mod notify;
pub mod router;
pub mod scoring;
pub mod service;
pub mod telemetry;

pub use router::fundability_router;
pub use scoring::{score, score_at, Snapshot, ValidatedInput};
pub use service::{FundabilityService, FundabilityServiceError};
