use super::speech_repository::{JobDestination, SpeechRepository};
use crate::domain::speech::{OutputFormat, SpeechError, SynthesisTask};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat as PollyOutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

const TEXT_PREVIEW_CHARS: usize = 200;

/// AWS Polly implementation of the speech repository
pub struct PollySpeechRepository {
    polly_client: Arc<PollyClient>,
}

impl PollySpeechRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn polly_output_format(format: OutputFormat) -> PollyOutputFormat {
        match format {
            OutputFormat::Pcm => PollyOutputFormat::Pcm,
            OutputFormat::Mp3 => PollyOutputFormat::Mp3,
            OutputFormat::Ogg => PollyOutputFormat::OggVorbis,
        }
    }

    /// Characters, the unit the sync/async threshold is measured in
    fn text_length(text: &str) -> usize {
        text.chars().count()
    }

    fn preview(text: &str) -> String {
        text.chars().take(TEXT_PREVIEW_CHARS).collect()
    }
}

#[async_trait]
impl SpeechRepository for PollySpeechRepository {
    async fn synthesize(&self, text: &str, task: &SynthesisTask) -> Result<Vec<u8>, SpeechError> {
        let start_time = std::time::Instant::now();
        let voice_id = VoiceId::from(task.voice.as_str());
        let output_format = Self::polly_output_format(task.output_format);

        tracing::info!(
            voice = %task.voice,
            output_format = ?output_format,
            sample_rate = task.sample_rate.hz(),
            text_length = Self::text_length(text),
            text_preview = %Self::preview(text),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(output_format)
            .sample_rate(task.sample_rate.hz().to_string())
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = %task.voice,
                    text_length = Self::text_length(text),
                    "AWS Polly synthesize_speech failed"
                );
                SpeechError::Synthesis(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            SpeechError::Synthesis(format!("failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = Self::text_length(text),
            audio_size_bytes = audio_bytes.len(),
            "Speech synthesis completed"
        );

        Ok(audio_bytes)
    }

    async fn submit_job(
        &self,
        text: &str,
        task: &SynthesisTask,
        destination: &JobDestination,
    ) -> Result<String, SpeechError> {
        let voice_id = VoiceId::from(task.voice.as_str());
        let output_format = Self::polly_output_format(task.output_format);

        tracing::info!(
            voice = %task.voice,
            output_format = ?output_format,
            sample_rate = task.sample_rate.hz(),
            bucket = %destination.bucket,
            key_prefix = %destination.key_prefix,
            text_length = Self::text_length(text),
            "Calling AWS Polly start_speech_synthesis_task"
        );

        let result = self
            .polly_client
            .start_speech_synthesis_task()
            .text(text)
            .voice_id(voice_id)
            .output_format(output_format)
            .sample_rate(task.sample_rate.hz().to_string())
            .engine(Engine::Neural)
            .output_s3_bucket_name(&destination.bucket)
            .output_s3_key_prefix(&destination.key_prefix)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    bucket = %destination.bucket,
                    key_prefix = %destination.key_prefix,
                    "AWS Polly start_speech_synthesis_task failed"
                );
                SpeechError::Synthesis(format!("AWS Polly error: {}", e))
            })?;

        let task_id = result
            .synthesis_task()
            .and_then(|t| t.task_id())
            .map(str::to_string)
            .ok_or_else(|| {
                SpeechError::Synthesis("AWS Polly returned no synthesis task id".to_string())
            })?;

        tracing::info!(
            task_id = %task_id,
            key_prefix = %destination.key_prefix,
            "Speech synthesis task submitted"
        );

        Ok(task_id)
    }
}
