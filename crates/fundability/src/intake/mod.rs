//! Structural validation of inbound applicant records.

mod validator;

pub(crate) use validator::goal_options;
pub use validator::{validate, ValidationErrors};
