pub mod codec;
pub mod silence;

pub use codec::{plan_frames, AudioTranscoder, CodecConfig, FrameDuration, PCM_CHANNELS};
pub use silence::is_silence;
