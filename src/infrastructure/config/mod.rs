use crate::domain::audio::{CodecConfig, FrameDuration};
use crate::domain::speech::{OutputFormat, PipelineSettings, SampleRate, Voice};
use crate::infrastructure::telegram::TELEGRAM_API_URL;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aws_region: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub audio_bucket: String,
    // Telegram
    pub bot_name: String,
    pub bot_token: String,
    pub telegram_api_url: String,
    // Pipeline
    pub text_limit: usize,
    pub sync_task_limit: usize,
    pub sample_rate: SampleRate,
    pub voice_pool: Vec<Voice>,
    // Encoder
    pub opus_bitrate: u32,
    pub opus_frame_duration: FrameDuration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            audio_bucket: required("AUDIO_BUCKET")?,
            bot_name: required("TELEGRAM_BOT_NAME")?,
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| TELEGRAM_API_URL.to_string()),
            text_limit: env::var("TEXT_LIMIT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,
            sync_task_limit: env::var("SYNC_TASK_LIMIT")
                .unwrap_or_else(|_| "140".to_string())
                .parse()?,
            sample_rate: env::var("SAMPLE_RATE")
                .unwrap_or_else(|_| "16000".to_string())
                .parse()?,
            voice_pool: match env::var("VOICE_POOL") {
                Ok(pool) => parse_voice_pool(&pool)?,
                Err(_) => Voice::ALL.to_vec(),
            },
            opus_bitrate: env::var("OPUS_BITRATE")
                .unwrap_or_else(|_| "40000".to_string())
                .parse()?,
            opus_frame_duration: env::var("OPUS_FRAME_MS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            bucket: self.audio_bucket.clone(),
            mention: self.bot_name.clone(),
            text_limit: self.text_limit,
            sync_task_limit: self.sync_task_limit,
            sample_rate: self.sample_rate,
            raw_format: OutputFormat::Pcm,
        }
    }

    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            bitrate: self.opus_bitrate,
            frame_duration: self.opus_frame_duration,
        }
    }
}

fn required(name: &str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("missing required environment variable {}", name)),
    }
}

/// Comma-separated voice names, e.g. `Joanna,Kevin`
pub fn parse_voice_pool(pool: &str) -> Result<Vec<Voice>, String> {
    let voices = pool
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::parse::<Voice>)
        .collect::<Result<Vec<_>, _>>()?;

    if voices.is_empty() {
        return Err("VOICE_POOL must name at least one voice".to_string());
    }

    Ok(voices)
}
