pub mod polly_speech_repository;
pub mod s3_storage_repository;
pub mod speech_repository;
pub mod storage_repository;

pub use polly_speech_repository::PollySpeechRepository;
pub use s3_storage_repository::S3StorageRepository;
pub use speech_repository::{JobDestination, SpeechRepository};
pub use storage_repository::StorageRepository;
