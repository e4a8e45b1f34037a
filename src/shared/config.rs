//! Application configuration. API credentials, paths, tone catalog.
//!
//! Sources: `TONE_RELAY_*` environment variables (and `.env`), plus an optional
//! file named by `TONE_RELAY_CONFIG`. Provider keys also accept their vendors'
//! usual variable names.

use crate::adapters::ai::gemini_adapter::{DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};
use crate::adapters::sms::twilio::DEFAULT_TWILIO_API_URL;
use crate::adapters::social::apify::{DEFAULT_APIFY_ACTOR_ID, DEFAULT_APIFY_API_URL};
use crate::domain::ToneCatalog;
use serde::Deserialize;
use std::path::PathBuf;

/// Default total wait for a scraper run, in seconds.
pub const DEFAULT_APIFY_WAIT_SECS: u64 = 120;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub data_dir: Option<String>,

    /// Contact directory CSV. Defaults to `<data_dir>/contacts.csv`.
    #[serde(default)]
    pub contacts_path: Option<String>,

    /// Comma-separated tone labels offered when tagging contacts.
    #[serde(default)]
    pub tones: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Gemini
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from TONE_RELAY_GEMINI_API_KEY or GEMINI_API_KEY.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default)]
    pub gemini_api_url: Option<String>,

    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Send the original draft when a rephrase fails instead of halting dispatch.
    #[serde(default)]
    pub rephrase_fallback: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Apify
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from TONE_RELAY_APIFY_TOKEN or APIFY_TOKEN.
    #[serde(default)]
    pub apify_token: Option<String>,

    #[serde(default)]
    pub apify_actor_id: Option<String>,

    #[serde(default)]
    pub apify_api_url: Option<String>,

    #[serde(default)]
    pub apify_wait_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Twilio
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from TONE_RELAY_TWILIO_ACCOUNT_SID or TWILIO_ACCOUNT_SID.
    #[serde(default)]
    pub twilio_account_sid: Option<String>,

    /// Read from TONE_RELAY_TWILIO_AUTH_TOKEN or TWILIO_AUTH_TOKEN.
    #[serde(default)]
    pub twilio_auth_token: Option<String>,

    /// Sender number. Read from TONE_RELAY_TWILIO_FROM or TWILIO_FROM.
    #[serde(default)]
    pub twilio_from: Option<String>,

    #[serde(default)]
    pub twilio_api_url: Option<String>,
}

/// Non-empty env var value.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Non-empty configured value, else the first non-empty env var among `fallbacks`.
fn value_or_env(value: &Option<String>, fallbacks: &[&str]) -> Option<String> {
    value
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallbacks.iter().find_map(|name| env_var(name)))
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TONE_RELAY"));
        if let Ok(path) = std::env::var("TONE_RELAY_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // APIFY_WAIT_SECS: total wait for a scraper run (default 120)
        if let Ok(s) = std::env::var("TONE_RELAY_APIFY_WAIT_SECS") {
            if let Ok(n) = s.trim().parse::<u64>() {
                cfg.apify_wait_secs = Some(n);
            }
        }
        // REPHRASE_FALLBACK: accept the usual truthy spellings, not just "true"
        if let Ok(s) = std::env::var("TONE_RELAY_REPHRASE_FALLBACK") {
            cfg.rephrase_fallback = Some(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("./data"))
    }

    pub fn contacts_path_or_default(&self) -> PathBuf {
        self.contacts_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("contacts.csv"))
    }

    /// Key-value record file holding the tag map.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir_or_default().join("store.json")
    }

    /// Dry-run SMS outbox.
    pub fn outbox_path(&self) -> PathBuf {
        self.data_dir_or_default().join("outbox.jsonl")
    }

    pub fn tone_catalog(&self) -> ToneCatalog {
        self.tones
            .as_deref()
            .map(ToneCatalog::parse)
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gemini Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn gemini_api_key(&self) -> Option<String> {
        value_or_env(&self.gemini_api_key, &["GEMINI_API_KEY"])
    }

    pub fn gemini_api_url_or_default(&self) -> String {
        self.gemini_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
    }

    pub fn gemini_model_or_default(&self) -> String {
        self.gemini_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
    }

    /// Defaults to false: rephrase failures halt the dispatch.
    pub fn rephrase_fallback_enabled(&self) -> bool {
        self.rephrase_fallback.unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Apify Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn apify_token(&self) -> Option<String> {
        value_or_env(&self.apify_token, &["APIFY_TOKEN"])
    }

    pub fn apify_actor_id_or_default(&self) -> String {
        self.apify_actor_id
            .clone()
            .unwrap_or_else(|| DEFAULT_APIFY_ACTOR_ID.to_string())
    }

    pub fn apify_api_url_or_default(&self) -> String {
        self.apify_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_APIFY_API_URL.to_string())
    }

    pub fn apify_wait_secs_or_default(&self) -> u64 {
        self.apify_wait_secs.unwrap_or(DEFAULT_APIFY_WAIT_SECS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Twilio Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn twilio_account_sid(&self) -> Option<String> {
        value_or_env(&self.twilio_account_sid, &["TWILIO_ACCOUNT_SID"])
    }

    pub fn twilio_auth_token(&self) -> Option<String> {
        value_or_env(&self.twilio_auth_token, &["TWILIO_AUTH_TOKEN"])
    }

    pub fn twilio_from(&self) -> Option<String> {
        value_or_env(&self.twilio_from, &["TWILIO_FROM"])
    }

    pub fn twilio_api_url_or_default(&self) -> String {
        self.twilio_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TWILIO_API_URL.to_string())
    }

    /// Returns true if Twilio is fully configured.
    pub fn is_twilio_configured(&self) -> bool {
        self.twilio_account_sid().is_some()
            && self.twilio_auth_token().is_some()
            && self.twilio_from().is_some()
    }
}
