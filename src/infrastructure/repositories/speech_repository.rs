use crate::domain::speech::{SpeechError, SynthesisTask};
use async_trait::async_trait;

/// Where an asynchronous job writes its raw output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDestination {
    pub bucket: String,
    pub key_prefix: String,
}

/// Repository for speech synthesis.
/// Abstracts the underlying provider (AWS Polly today).
///
/// Synchronous calls are limited in size by the provider, callers decide
/// between `synthesize` and `submit_job` before calling.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Synthesize `text` and return the raw audio bytes
    ///
    /// # Errors
    /// Returns `SpeechError::Synthesis` if the provider rejects or fails the call
    async fn synthesize(&self, text: &str, task: &SynthesisTask) -> Result<Vec<u8>, SpeechError>;

    /// Start a job that writes its output to object storage under
    /// `destination.key_prefix`. Returns the provider's job id.
    async fn submit_job(
        &self,
        text: &str,
        task: &SynthesisTask,
        destination: &JobDestination,
    ) -> Result<String, SpeechError>;
}
