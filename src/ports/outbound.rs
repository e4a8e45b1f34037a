//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{AccessStatus, Contact, DomainError, TagMap, ToneLabel};

/// Device contact directory.
#[async_trait::async_trait]
pub trait ContactDirectoryPort: Send + Sync {
    /// Ask for access. `Denied` is a steady state, not an error.
    async fn request_access(&self) -> AccessStatus;

    /// List contacts with their tone unset. Only meaningful after access is granted.
    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError>;
}

/// Tag store port. Persists contact id -> tone label.
#[async_trait::async_trait]
pub trait TagStorePort: Send + Sync {
    /// Load the saved map. Returns an empty map on first run or when stored data is unreadable.
    async fn load(&self) -> Result<TagMap, DomainError>;

    /// Replace the saved map in full.
    async fn save(&self, tags: &TagMap) -> Result<(), DomainError>;
}

/// Generative language model used for rephrasing and conversation starters.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Rewrite `original` so it matches the tone `label`.
    async fn rephrase(&self, original: &str, label: &ToneLabel) -> Result<String, DomainError>;

    /// Produce an opening line for a conversation with the owner of `bio`.
    async fn conversation_starter(&self, bio: &str) -> Result<String, DomainError>;
}

/// SMS sending capability.
#[async_trait::async_trait]
pub trait SmsPort: Send + Sync {
    /// Whether sending is possible at all (credentials present, capability granted).
    async fn is_available(&self) -> bool;

    /// Send `body` to every number in `recipients` as one dispatch.
    async fn send(&self, recipients: &[String], body: &str) -> Result<(), DomainError>;
}

/// Public profile biography lookup.
#[async_trait::async_trait]
pub trait BioFetcherPort: Send + Sync {
    /// Biography of `handle`, or an empty string when the profile has none.
    async fn fetch_bio(&self, handle: &str) -> Result<String, DomainError>;
}
