//! Degrade-to-original wrapper around any AiPort.
//!
//! Opt-in via `TONE_RELAY_REPHRASE_FALLBACK=true`. A failed rephrase yields the
//! unmodified draft and a warning instead of an error, so dispatch keeps going.

use crate::domain::{DomainError, ToneLabel};
use crate::ports::AiPort;
use std::sync::Arc;
use tracing::warn;

pub struct FallbackAi {
    inner: Arc<dyn AiPort>,
}

impl FallbackAi {
    pub fn new(inner: Arc<dyn AiPort>) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl AiPort for FallbackAi {
    async fn rephrase(&self, original: &str, label: &ToneLabel) -> Result<String, DomainError> {
        match self.inner.rephrase(original, label).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(label = %label, error = %e, "rephrase failed; sending original message");
                Ok(original.to_string())
            }
        }
    }

    /// Starters have no sensible fallback; errors pass through.
    async fn conversation_starter(&self, bio: &str) -> Result<String, DomainError> {
        self.inner.conversation_starter(bio).await
    }
}
