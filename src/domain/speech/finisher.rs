use super::correlation::{chat_id_from_key, key_extension, retarget_key};
use super::error::SpeechError;
use super::model::{ChatId, StoredAsset};
use super::settings::PipelineSettings;
use crate::domain::audio::{is_silence, AudioTranscoder, PCM_CHANNELS};
use crate::domain::reply::{ChatReply, ReplySender};
use crate::infrastructure::repositories::StorageRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage notification for one newly created object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreated {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Object is not raw synthesis output (e.g. a delivered asset)
    Skipped,
    /// Reply was handed to the chat platform
    Replied(ChatReply),
}

pub struct FinisherService {
    storage_repo: Arc<dyn StorageRepository>,
    transcoder: Arc<dyn AudioTranscoder>,
    reply_sender: Arc<dyn ReplySender>,
    settings: PipelineSettings,
}

impl FinisherService {
    pub fn new(
        storage_repo: Arc<dyn StorageRepository>,
        transcoder: Arc<dyn AudioTranscoder>,
        reply_sender: Arc<dyn ReplySender>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            storage_repo,
            transcoder,
            reply_sender,
            settings,
        }
    }
}

#[async_trait]
pub trait FinisherApi: Send + Sync {
    /// Deliver the output of a finished synthesis job to its chat
    ///
    /// Only a key that does not name a chat is returned as `Err`: there is
    /// nobody to tell. Every later failure becomes a text reply.
    async fn finish(&self, event: &ObjectCreated) -> Result<FinishOutcome, SpeechError>;
}

#[async_trait]
impl FinisherApi for FinisherService {
    async fn finish(&self, event: &ObjectCreated) -> Result<FinishOutcome, SpeechError> {
        let Some(chat_id) = self.resolve_chat(event)? else {
            tracing::debug!(
                bucket = %event.bucket,
                key = %event.key,
                "Object is not raw synthesis output, skipping"
            );
            return Ok(FinishOutcome::Skipped);
        };

        tracing::info!(chat_id, bucket = %event.bucket, key = %event.key, "Finishing synthesis job");

        let reply = match self.deliver_asset(chat_id, event).await {
            Ok(asset_uri) => ChatReply::voice(chat_id, asset_uri),
            Err(err) => {
                tracing::warn!(chat_id, key = %event.key, error = %err, "Synthesis job failed");
                ChatReply::error(chat_id, &err)
            }
        };

        if let Err(err) = self.reply_sender.send(&reply).await {
            tracing::error!(chat_id, error = %err, "Failed to deliver reply");
        }

        Ok(FinishOutcome::Replied(reply))
    }
}

impl FinisherService {
    /// Chat the object must be delivered to, `None` when it is not raw
    /// synthesis output. Has no side effects, so a whole batch of
    /// notifications can be checked before any of them is finished.
    pub fn resolve_chat(&self, event: &ObjectCreated) -> Result<Option<ChatId>, SpeechError> {
        if key_extension(&event.key) != Some(self.settings.raw_format.extension()) {
            return Ok(None);
        }

        chat_id_from_key(&event.key).map(Some).map_err(|err| {
            tracing::error!(key = %event.key, error = %err, "Cannot resolve chat for object");
            err
        })
    }

    /// Fetched → {Silent | Transcoded} → Uploaded
    async fn deliver_asset(
        &self,
        chat_id: ChatId,
        event: &ObjectCreated,
    ) -> Result<String, SpeechError> {
        let pcm = self.storage_repo.get(&event.bucket, &event.key).await?;

        if is_silence(&pcm) {
            tracing::info!(chat_id, key = %event.key, size_bytes = pcm.len(), "Synthesized audio is silent");
            return Err(SpeechError::Silence);
        }

        let encoded = self.transcoder.encode(
            &pcm,
            self.settings.sample_rate.hz(),
            PCM_CHANNELS,
        )?;

        let asset = StoredAsset::public(
            &event.bucket,
            retarget_key(&event.key, self.transcoder.extension()),
            self.transcoder.content_type(),
        );

        self.storage_repo.put(&asset, encoded).await
    }
}
