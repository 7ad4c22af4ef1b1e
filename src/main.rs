use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_reply_bot::controllers::{storage_events::StorageEventsController, webhook::WebhookController};
use voice_reply_bot::domain::audio::AudioTranscoder;
use voice_reply_bot::domain::reply::ReplySender;
use voice_reply_bot::domain::speech::{DispatcherService, FinisherService, VoiceSelector};
use voice_reply_bot::infrastructure::config::{Config, LogFormat};
use voice_reply_bot::infrastructure::http::start_http_server;
use voice_reply_bot::infrastructure::repositories::{
    PollySpeechRepository, S3StorageRepository, SpeechRepository, StorageRepository,
};
use voice_reply_bot::infrastructure::telegram::TelegramClient;
use voice_reply_bot::infrastructure::transcoder::OpusTranscoder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting voice reply bot on {}:{}",
        config.host,
        config.port
    );

    if config.is_development() {
        tracing::debug!(
            bucket = %config.audio_bucket,
            bot_name = %config.bot_name,
            text_limit = config.text_limit,
            sync_task_limit = config.sync_task_limit,
            sample_rate = config.sample_rate.hz(),
            voices = ?config.voice_pool,
            opus_bitrate = config.opus_bitrate,
            opus_frame_ms = config.opus_frame_duration.as_millis_f64(),
            "Pipeline configuration"
        );
    }

    tracing::info!("Initializing AWS clients with region: {}", config.aws_region);

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));

    let settings = config.pipeline_settings();
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories and adapters
    tracing::info!("Instantiating repositories...");
    let speech_repo: Arc<dyn SpeechRepository> =
        Arc::new(PollySpeechRepository::new(polly_client));
    let storage_repo: Arc<dyn StorageRepository> = Arc::new(S3StorageRepository::new(
        s3_client,
        config.aws_region.clone(),
    ));
    let transcoder: Arc<dyn AudioTranscoder> = Arc::new(OpusTranscoder::new(config.codec_config()));
    let reply_sender: Arc<dyn ReplySender> = Arc::new(TelegramClient::new(
        config.bot_token.clone(),
        config.telegram_api_url.clone(),
    ));

    // 2. Services
    tracing::info!("Instantiating services...");
    let voice_selector = VoiceSelector::new(config.voice_pool.clone())?;
    let dispatcher = Arc::new(DispatcherService::new(
        speech_repo,
        storage_repo.clone(),
        transcoder.clone(),
        voice_selector,
        settings.clone(),
    ));
    let finisher = Arc::new(FinisherService::new(
        storage_repo,
        transcoder,
        reply_sender,
        settings,
    ));

    // 3. Controllers
    tracing::info!("Instantiating controllers...");
    let webhook_controller = Arc::new(WebhookController::new(dispatcher.clone()));
    let storage_events_controller = Arc::new(StorageEventsController::new(finisher));

    start_http_server(config, dispatcher, webhook_controller, storage_events_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voice_reply_bot=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
