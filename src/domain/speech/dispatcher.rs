use super::correlation::job_key_prefix;
use super::error::SpeechError;
use super::model::{ChatId, StoredAsset, SynthesisMode, SynthesisTask, VoiceRequest};
use super::settings::PipelineSettings;
use super::text::normalize_text;
use super::voice::VoiceSelector;
use crate::domain::audio::{is_silence, AudioTranscoder, PCM_CHANNELS};
use crate::domain::reply::ChatReply;
use crate::infrastructure::repositories::{JobDestination, SpeechRepository, StorageRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// What the Dispatcher did with an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Message is not addressed to the bot
    Ignored,
    /// Reply ready to be delivered now
    Replied(ChatReply),
    /// A synthesis job was submitted, the Finisher replies later
    Deferred { job_id: String },
}

impl DispatchOutcome {
    pub fn into_reply(self) -> Option<ChatReply> {
        match self {
            DispatchOutcome::Replied(reply) => Some(reply),
            DispatchOutcome::Ignored | DispatchOutcome::Deferred { .. } => None,
        }
    }
}

pub struct DispatcherService {
    speech_repo: Arc<dyn SpeechRepository>,
    storage_repo: Arc<dyn StorageRepository>,
    transcoder: Arc<dyn AudioTranscoder>,
    voice_selector: VoiceSelector,
    settings: PipelineSettings,
}

impl DispatcherService {
    pub fn new(
        speech_repo: Arc<dyn SpeechRepository>,
        storage_repo: Arc<dyn StorageRepository>,
        transcoder: Arc<dyn AudioTranscoder>,
        voice_selector: VoiceSelector,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            speech_repo,
            storage_repo,
            transcoder,
            voice_selector,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn voice_selector(&self) -> &VoiceSelector {
        &self.voice_selector
    }
}

#[async_trait]
pub trait DispatcherApi: Send + Sync {
    /// Turn one inbound chat message into at most one reply
    ///
    /// This operation:
    /// - Ignores messages that do not start with the bot mention
    /// - Picks a voice and a synthesis mode
    /// - Sync: synthesizes, encodes and uploads inline, replies with the voice
    /// - Async: submits a job writing under the chat-scoped key, no reply
    ///
    /// Failures are returned as a text reply to the same chat, never as `Err`.
    async fn dispatch(&self, chat_id: ChatId, text: &str) -> DispatchOutcome;
}

#[async_trait]
impl DispatcherApi for DispatcherService {
    async fn dispatch(&self, chat_id: ChatId, text: &str) -> DispatchOutcome {
        let Some(raw_text) = normalize_text(text, &self.settings.mention, self.settings.text_limit)
        else {
            tracing::debug!(chat_id, "Message not addressed to the bot, ignoring");
            return DispatchOutcome::Ignored;
        };

        let request = VoiceRequest { chat_id, raw_text };

        if request.raw_text.trim().is_empty() {
            let err = SpeechError::Validation("message has no text to speak".to_string());
            return DispatchOutcome::Replied(ChatReply::error(chat_id, &err));
        }

        let task = SynthesisTask {
            voice: self.voice_selector.pick(),
            output_format: self.settings.raw_format,
            sample_rate: self.settings.sample_rate,
            mode: SynthesisMode::for_text(&request.raw_text, self.settings.sync_task_limit),
        };

        tracing::info!(
            chat_id,
            text_length = request.raw_text.chars().count(),
            sync_task_limit = self.settings.sync_task_limit,
            mode = ?task.mode,
            voice = %task.voice,
            "Dispatching voice request"
        );

        match task.mode {
            SynthesisMode::Sync => match self.run_sync(&request, &task).await {
                Ok(asset_uri) => {
                    DispatchOutcome::Replied(ChatReply::voice(request.chat_id, asset_uri))
                }
                Err(err) => {
                    tracing::warn!(chat_id, error = %err, "Synchronous voice reply failed");
                    DispatchOutcome::Replied(ChatReply::error(request.chat_id, &err))
                }
            },
            SynthesisMode::Async => match self.submit_async(&request, &task).await {
                Ok(job_id) => DispatchOutcome::Deferred { job_id },
                Err(err) => {
                    tracing::warn!(chat_id, error = %err, "Synthesis job submission failed");
                    DispatchOutcome::Replied(ChatReply::error(request.chat_id, &err))
                }
            },
        }
    }
}

impl DispatcherService {
    async fn run_sync(
        &self,
        request: &VoiceRequest,
        task: &SynthesisTask,
    ) -> Result<String, SpeechError> {
        let pcm = self.speech_repo.synthesize(&request.raw_text, task).await?;

        if is_silence(&pcm) {
            return Err(SpeechError::Silence);
        }

        let encoded = self
            .transcoder
            .encode(&pcm, task.sample_rate.hz(), PCM_CHANNELS)?;

        let key = format!("{}.{}", Uuid::new_v4(), self.transcoder.extension());
        let asset = StoredAsset::public(&self.settings.bucket, key, self.transcoder.content_type());

        self.storage_repo.put(&asset, encoded).await
    }

    async fn submit_async(
        &self,
        request: &VoiceRequest,
        task: &SynthesisTask,
    ) -> Result<String, SpeechError> {
        let destination = JobDestination {
            bucket: self.settings.bucket.clone(),
            key_prefix: job_key_prefix(request.chat_id),
        };

        let job_id = self
            .speech_repo
            .submit_job(&request.raw_text, task, &destination)
            .await?;

        tracing::info!(
            chat_id = request.chat_id,
            job_id = %job_id,
            key_prefix = %destination.key_prefix,
            "Voice reply deferred to synthesis job"
        );

        Ok(job_id)
    }
}
