//! Twilio adapter. Implements SmsPort via the Programmable Messaging REST API.

use crate::domain::DomainError;
use crate::ports::SmsPort;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";

/// Twilio SMS adapter.
///
/// Requires an account SID, auth token and a sender number from the Twilio console.
/// One `send` posts one message per recipient, in order, and stops at the first rejection.
pub struct TwilioSmsAdapter {
    client: Arc<Client>,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioSmsAdapter {
    /// Create a new Twilio adapter.
    ///
    /// # Arguments
    /// * `api_url` - API base (normally `DEFAULT_TWILIO_API_URL`)
    /// * `account_sid` - Account SID (`AC...`)
    /// * `auth_token` - Auth token for the account
    /// * `from` - Sender phone number in E.164 format
    pub fn new(api_url: String, account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_url: api_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
            from,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, self.account_sid
        )
    }
}

#[async_trait::async_trait]
impl SmsPort for TwilioSmsAdapter {
    async fn is_available(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.from.is_empty()
    }

    async fn send(&self, recipients: &[String], body: &str) -> Result<(), DomainError> {
        let url = self.messages_url();
        for to in recipients {
            let res = self
                .client
                .post(&url)
                .basic_auth(&self.account_sid, Some(&self.auth_token))
                .form(&[("To", to.as_str()), ("From", self.from.as_str()), ("Body", body)])
                .send()
                .await
                .map_err(|e| DomainError::Sms(format!("Request failed: {}", e)))?;

            if !res.status().is_success() {
                let status = res.status();
                let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
                return Err(DomainError::Sms(format!(
                    "Twilio API error {} for {}: {}",
                    status,
                    to,
                    text.chars().take(200).collect::<String>()
                )));
            }
            debug!(to = %to, "message accepted");
        }

        info!(recipients = recipients.len(), "sent via Twilio");
        Ok(())
    }
}
