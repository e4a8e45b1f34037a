//! Social flow: scrape a profile biography, then ask the AI for a conversation starter.

use crate::domain::DomainError;
use crate::ports::{AiPort, BioFetcherPort};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StarterService {
    bios: Arc<dyn BioFetcherPort>,
    ai: Arc<dyn AiPort>,
}

impl StarterService {
    pub fn new(bios: Arc<dyn BioFetcherPort>, ai: Arc<dyn AiPort>) -> Self {
        Self { bios, ai }
    }

    /// Biography for `handle`. `None` on transport failure, `Some("")` when the profile has no bio.
    pub async fn bio_for(&self, handle: &str) -> Result<Option<String>, DomainError> {
        let handle = normalize_handle(handle)?;
        match self.bios.fetch_bio(&handle).await {
            Ok(bio) => Ok(Some(bio)),
            Err(e) => {
                warn!(handle = %handle, error = %e, "bio fetch failed");
                Ok(None)
            }
        }
    }

    /// Conversation starter for `handle`, or `None` when no usable bio could be found.
    pub async fn starter_for(&self, handle: &str) -> Result<Option<String>, DomainError> {
        let bio = match self.bio_for(handle).await? {
            Some(bio) if !bio.trim().is_empty() => bio,
            _ => {
                info!(handle, "no biography to work from");
                return Ok(None);
            }
        };
        let starter = self.ai.conversation_starter(&bio).await?;
        Ok(Some(starter))
    }
}

/// Trim whitespace and a leading `@`. Empty handles are rejected.
fn normalize_handle(raw: &str) -> Result<String, DomainError> {
    let handle = raw.trim().trim_start_matches('@').trim();
    if handle.is_empty() {
        return Err(DomainError::Validation("profile handle is empty".into()));
    }
    Ok(handle.to_string())
}
