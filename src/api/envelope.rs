//! JSON envelope returned by the patient data endpoint.

use serde::Serialize;

use crate::upstream::EmyRecord;

/// Message shown to the client on any upstream failure.
pub const FAILURE_MESSAGE: &str = "Internal error happened. Try again";

/// Outcome status in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// Records were fetched.
    Success,
    /// Upstream fetch failed.
    Failed,
}

/// Uniform `{status, data|message}` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Outcome status.
    pub status: EnvelopeStatus,
    /// Records, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<EmyRecord>>,
    /// User-facing message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Success envelope carrying `records`.
    pub fn success(records: Vec<EmyRecord>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(records),
            message: None,
        }
    }

    /// Generic failure envelope.
    pub fn failed() -> Self {
        Self {
            status: EnvelopeStatus::Failed,
            data: None,
            message: Some(FAILURE_MESSAGE.to_string()),
        }
    }
}
