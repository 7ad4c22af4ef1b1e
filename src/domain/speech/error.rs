use crate::error::AppError;

/// Failures of the speech-reply pipeline.
///
/// The `Display` text of every variant is what the end user sees when the
/// failure is reported back into the chat, so keep it readable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("storage failed: {0}")]
    Storage(String),
    #[error("audio encoding failed: {0}")]
    Codec(String),
    #[error("nothing to say: synthesized audio is silent")]
    Silence,
    #[error("cannot recover chat id from object key '{0}'")]
    KeyFormat(String),
}

impl SpeechError {
    pub fn illegal_frame_size(duration_ms: f64) -> Self {
        SpeechError::Codec(format!("illegal frame size ({} ms)", duration_ms))
    }
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Validation(_) | SpeechError::KeyFormat(_) => {
                AppError::BadRequest(err.to_string())
            }
            SpeechError::Synthesis(_) | SpeechError::Storage(_) => {
                AppError::ExternalService(err.to_string())
            }
            SpeechError::Codec(_) | SpeechError::Silence => AppError::Internal(err.to_string()),
        }
    }
}
