//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Contact directory error: {0}")]
    Directory(String),

    #[error("Tag store error: {0}")]
    TagStore(String),

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Bio fetch failed: {0}")]
    BioFetch(String),

    #[error("SMS send failed: {0}")]
    Sms(String),

    /// The send capability is not configured or not permitted on this device.
    #[error("SMS is not available: {0}")]
    SmsUnavailable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Aggregate failure of a dispatch. Groups sent before `label` stay sent.
    #[error("Dispatch halted at '{label}' after {groups_sent} group(s) sent: {reason}")]
    Dispatch {
        label: String,
        groups_sent: usize,
        reason: String,
    },
}
