use super::model::{OutputFormat, SampleRate};

/// Process-wide pipeline constants, read-only after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Bucket holding both raw job output and delivered assets
    pub bucket: String,
    /// Mention a message must start with to be handled, e.g. `@BlackAbbot`
    pub mention: String,
    /// Characters kept from a message after the mention
    pub text_limit: usize,
    /// Longest text synthesized inline, anything longer becomes a job
    pub sync_task_limit: usize,
    pub sample_rate: SampleRate,
    /// Format the synthesis service produces, the transcoder's input
    pub raw_format: OutputFormat,
}

impl PipelineSettings {
    pub fn new(bucket: impl Into<String>, mention: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            mention: mention.into(),
            text_limit: 1000,
            sync_task_limit: 140,
            sample_rate: SampleRate::Hz16000,
            raw_format: OutputFormat::Pcm,
        }
    }
}
