//! Implements SmsPort as a dry run: appends each dispatch to a JSONL outbox file.
//! One JSON object per line: `{sent_at, recipients, body}`. Append-only; never read back by the app.

use crate::domain::DomainError;
use crate::ports::SmsPort;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// One line of the outbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub sent_at: DateTime<Utc>,
    pub recipients: Vec<String>,
    pub body: String,
}

/// Outbox SMS adapter. Used when no SMS gateway is configured.
pub struct OutboxSmsAdapter {
    path: PathBuf,
}

impl OutboxSmsAdapter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl SmsPort for OutboxSmsAdapter {
    async fn is_available(&self) -> bool {
        true
    }

    async fn send(&self, recipients: &[String], body: &str) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Sms(e.to_string()))?;
        }
        let record = OutboxRecord {
            sent_at: Utc::now(),
            recipients: recipients.to_vec(),
            body: body.to_string(),
        };
        let mut line =
            serde_json::to_string(&record).map_err(|e| DomainError::Sms(e.to_string()))?;
        line.push('\n');

        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DomainError::Sms(e.to_string()))?;
        f.write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::Sms(e.to_string()))?;
        f.flush().await.map_err(|e| DomainError::Sms(e.to_string()))?;

        info!(
            path = %self.path.display(),
            recipients = recipients.len(),
            "message written to outbox (dry run)"
        );
        Ok(())
    }
}
