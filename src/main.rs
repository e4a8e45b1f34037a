//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tone_relay::adapters::ai::{FallbackAi, GeminiAdapter, MockAiAdapter};
use tone_relay::adapters::directory::CsvContactDirectory;
use tone_relay::adapters::persistence::JsonTagStore;
use tone_relay::adapters::sms::{OutboxSmsAdapter, TwilioSmsAdapter};
use tone_relay::adapters::social::ApifyBioFetcher;
use tone_relay::adapters::ui::tui::TuiInputPort;
use tone_relay::ports::{
    AiPort, BioFetcherPort, ContactDirectoryPort, InputPort, SmsPort, TagStorePort,
};
use tone_relay::shared::config::AppConfig;
use tone_relay::usecases::{DirectoryService, DispatchService, StarterService};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    tone_relay::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config could not be read; using defaults");
        AppConfig::default()
    });

    let data_path = cfg.data_dir_or_default();
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Contacts + tags ---
    let contacts_path = cfg.contacts_path_or_default();
    let directory: Arc<dyn ContactDirectoryPort> =
        Arc::new(CsvContactDirectory::new(&contacts_path));
    let tag_store: Arc<dyn TagStorePort> = Arc::new(JsonTagStore::new(cfg.store_path()));
    let directory_service = Arc::new(DirectoryService::new(directory, tag_store));

    // --- AI ---
    let gemini: Arc<dyn AiPort> = match cfg.gemini_api_key() {
        Some(key) => {
            info!(
                model = %cfg.gemini_model_or_default(),
                url = %cfg.gemini_api_url_or_default(),
                "Gemini enabled"
            );
            Arc::new(GeminiAdapter::new(
                cfg.gemini_api_url_or_default(),
                key,
                cfg.gemini_model_or_default(),
            ))
        }
        None => {
            warn!("TONE_RELAY_GEMINI_API_KEY not set, using mock AI adapter");
            Arc::new(MockAiAdapter::new())
        }
    };
    let ai: Arc<dyn AiPort> = if cfg.rephrase_fallback_enabled() {
        info!("rephrase fallback enabled: failed rephrases send the original draft");
        Arc::new(FallbackAi::new(gemini))
    } else {
        gemini
    };

    // --- SMS ---
    let sms: Arc<dyn SmsPort> = if cfg.is_twilio_configured() {
        info!("Twilio SMS enabled (TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_FROM)");
        Arc::new(TwilioSmsAdapter::new(
            cfg.twilio_api_url_or_default(),
            cfg.twilio_account_sid().unwrap_or_default(),
            cfg.twilio_auth_token().unwrap_or_default(),
            cfg.twilio_from().unwrap_or_default(),
        ))
    } else {
        let outbox = cfg.outbox_path();
        warn!(path = %outbox.display(), "Twilio not configured, writing messages to outbox");
        Arc::new(OutboxSmsAdapter::new(outbox))
    };
    let dispatch_service = Arc::new(DispatchService::new(Arc::clone(&ai), sms));

    // --- Social (optional) ---
    let starter_service = cfg.apify_token().map(|token| {
        info!(actor = %cfg.apify_actor_id_or_default(), "Apify profile scraping enabled");
        let bios: Arc<dyn BioFetcherPort> = Arc::new(ApifyBioFetcher::new(
            cfg.apify_api_url_or_default(),
            token,
            cfg.apify_actor_id_or_default(),
            Duration::from_secs(cfg.apify_wait_secs_or_default()),
        ));
        Arc::new(StarterService::new(bios, Arc::clone(&ai)))
    });
    if starter_service.is_none() {
        info!("TONE_RELAY_APIFY_TOKEN not set; conversation starters disabled");
    }

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        directory_service,
        dispatch_service,
        starter_service,
        cfg.tone_catalog(),
        contacts_path,
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
