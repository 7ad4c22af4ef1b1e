pub mod opus_transcoder;

pub use opus_transcoder::{OpusTranscoder, OGG_OPUS_CONTENT_TYPE, OGG_OPUS_EXTENSION};
