use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type ChatId = i64;

/// Voices the bot is allowed to speak with (US English, neural engine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Salli,
    Joanna,
    Ivy,
    Kendra,
    Kimberly,
    Kevin,
    Matthew,
    Justin,
    Joey,
}

impl Voice {
    pub const ALL: [Voice; 9] = [
        Voice::Salli,
        Voice::Joanna,
        Voice::Ivy,
        Voice::Kendra,
        Voice::Kimberly,
        Voice::Kevin,
        Voice::Matthew,
        Voice::Justin,
        Voice::Joey,
    ];

    /// Voice name as the synthesis service knows it
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Salli => "Salli",
            Voice::Joanna => "Joanna",
            Voice::Ivy => "Ivy",
            Voice::Kendra => "Kendra",
            Voice::Kimberly => "Kimberly",
            Voice::Kevin => "Kevin",
            Voice::Matthew => "Matthew",
            Voice::Justin => "Justin",
            Voice::Joey => "Joey",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .iter()
            .copied()
            .find(|voice| voice.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown voice '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pcm,
    Mp3,
    Ogg,
}

impl OutputFormat {
    /// File extension the synthesis service gives objects of this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pcm => "pcm",
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Ogg => "ogg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleRate {
    #[serde(rename = "8000")]
    Hz8000,
    #[serde(rename = "16000")]
    Hz16000,
}

impl SampleRate {
    pub fn hz(&self) -> u32 {
        match self {
            SampleRate::Hz8000 => 8000,
            SampleRate::Hz16000 => 16000,
        }
    }
}

impl FromStr for SampleRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "8000" => Ok(SampleRate::Hz8000),
            "16000" => Ok(SampleRate::Hz16000),
            other => Err(format!("unsupported sample rate '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    Sync,
    Async,
}

impl SynthesisMode {
    /// Synchronous synthesis calls have a hard size ceiling, anything longer
    /// has to go through a job.
    pub fn for_text(text: &str, sync_task_limit: usize) -> Self {
        if text.chars().count() > sync_task_limit {
            SynthesisMode::Async
        } else {
            SynthesisMode::Sync
        }
    }
}

/// Normalized text addressed to the bot in a given chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRequest {
    pub chat_id: ChatId,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisTask {
    pub voice: Voice,
    pub output_format: OutputFormat,
    pub sample_rate: SampleRate,
    pub mode: SynthesisMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub visibility: Visibility,
}

impl StoredAsset {
    pub fn public(bucket: impl Into<String>, key: impl Into<String>, content_type: &str) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            content_type: content_type.to_string(),
            visibility: Visibility::PublicRead,
        }
    }
}
