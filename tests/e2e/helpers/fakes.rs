use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use voice_reply_bot::domain::reply::{ChatReply, ReplySender};
use voice_reply_bot::domain::speech::{SpeechError, StoredAsset, SynthesisTask};
use voice_reply_bot::infrastructure::repositories::{
    JobDestination, SpeechRepository, StorageRepository,
};

#[derive(Debug, Clone)]
pub struct SynthesizeCall {
    pub text: String,
    pub task: SynthesisTask,
}

#[derive(Debug, Clone)]
pub struct JobCall {
    pub text: String,
    pub task: SynthesisTask,
    pub destination: JobDestination,
}

/// Speech service returning scripted results and recording every call
pub struct FakeSpeechRepository {
    synthesize_result: Mutex<Result<Vec<u8>, SpeechError>>,
    job_result: Mutex<Result<String, SpeechError>>,
    pub synthesize_calls: Mutex<Vec<SynthesizeCall>>,
    pub job_calls: Mutex<Vec<JobCall>>,
}

impl FakeSpeechRepository {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            synthesize_result: Mutex::new(Ok(audio)),
            job_result: Mutex::new(Ok("task-0001".to_string())),
            synthesize_calls: Mutex::new(Vec::new()),
            job_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_synthesize_result(&self, result: Result<Vec<u8>, SpeechError>) {
        *self.synthesize_result.lock() = result;
    }

    pub fn set_job_result(&self, result: Result<String, SpeechError>) {
        *self.job_result.lock() = result;
    }
}

#[async_trait]
impl SpeechRepository for FakeSpeechRepository {
    async fn synthesize(&self, text: &str, task: &SynthesisTask) -> Result<Vec<u8>, SpeechError> {
        self.synthesize_calls.lock().push(SynthesizeCall {
            text: text.to_string(),
            task: task.clone(),
        });
        self.synthesize_result.lock().clone()
    }

    async fn submit_job(
        &self,
        text: &str,
        task: &SynthesisTask,
        destination: &JobDestination,
    ) -> Result<String, SpeechError> {
        self.job_calls.lock().push(JobCall {
            text: text.to_string(),
            task: task.clone(),
            destination: destination.clone(),
        });
        self.job_result.lock().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object storage kept in memory
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    put_error: Mutex<Option<SpeechError>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the synthesis service writing a job's output
    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: "audio/pcm".to_string(),
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().keys().map(|(_, k)| k.clone()).collect();
        keys.sort();
        keys
    }

    pub fn fail_puts_with(&self, err: SpeechError) {
        *self.put_error.lock() = Some(err);
    }

    pub fn uri(bucket: &str, key: &str) -> String {
        format!("https://{}.storage.test/{}", bucket, key)
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorage {
    async fn put(&self, asset: &StoredAsset, body: Vec<u8>) -> Result<String, SpeechError> {
        if let Some(err) = self.put_error.lock().clone() {
            return Err(err);
        }

        self.objects.lock().insert(
            (asset.bucket.clone(), asset.key.clone()),
            StoredObject {
                body,
                content_type: asset.content_type.clone(),
            },
        );

        Ok(Self::uri(&asset.bucket, &asset.key))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SpeechError> {
        self.object(bucket, key)
            .map(|object| object.body)
            .ok_or_else(|| SpeechError::Storage(format!("no such key '{}'", key)))
    }
}

/// Chat platform client that only remembers what it was asked to send
#[derive(Default)]
pub struct RecordingReplySender {
    pub sent: Mutex<Vec<ChatReply>>,
    fail: Mutex<bool>,
}

impl RecordingReplySender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deliveries(&self) {
        *self.fail.lock() = true;
    }

    pub fn sent(&self) -> Vec<ChatReply> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingReplySender {
    async fn send(&self, reply: &ChatReply) -> Result<(), String> {
        self.sent.lock().push(reply.clone());
        if *self.fail.lock() {
            return Err("chat platform unavailable".to_string());
        }
        Ok(())
    }
}
