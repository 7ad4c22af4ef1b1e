use crate::domain::speech::{SpeechError, StoredAsset};
use async_trait::async_trait;

/// Repository for audio objects.
///
/// An empty body is a valid object; deciding whether empty audio is worth
/// delivering is up to the caller.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Upload `body` and return a URI the chat platform can fetch without credentials
    async fn put(&self, asset: &StoredAsset, body: Vec<u8>) -> Result<String, SpeechError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SpeechError>;
}
