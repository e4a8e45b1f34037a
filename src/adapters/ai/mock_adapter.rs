//! Mock AI adapter for running without API calls.
//!
//! Returns tagged, deterministic text for development and testing purposes.

use crate::domain::{DomainError, ToneLabel};
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// Mock AI adapter.
///
/// Prefixes the draft with its tone instead of calling a model.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn rephrase(&self, original: &str, label: &ToneLabel) -> Result<String, DomainError> {
        info!(label = %label, "[MOCK] Simulating rephrase");
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        Ok(format!("[{}] {}", label, original.trim()))
    }

    async fn conversation_starter(&self, bio: &str) -> Result<String, DomainError> {
        info!(bio_len = bio.len(), "[MOCK] Simulating conversation starter");
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        let hook: String = bio.split_whitespace().take(6).collect::<Vec<_>>().join(" ");
        Ok(format!("[MOCK] I saw your bio mentions \"{}\" - how did you get into that?", hook))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_rephrase_tags_tone() {
        let adapter = MockAiAdapter::with_delay(0);
        let text = adapter
            .rephrase(" lunch? ", &ToneLabel::new("Humorous"))
            .await
            .unwrap();
        assert_eq!(text, "[Humorous] lunch?");
    }

    #[tokio::test]
    async fn test_mock_starter_quotes_bio() {
        let adapter = MockAiAdapter::with_delay(0);
        let text = adapter
            .conversation_starter("Rust developer and weekend climber based in Leeds")
            .await
            .unwrap();
        assert!(text.contains("Rust developer and weekend climber based"));
    }
}
