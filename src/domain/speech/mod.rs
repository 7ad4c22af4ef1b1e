pub mod correlation;
pub mod dispatcher;
pub mod error;
pub mod finisher;
pub mod model;
pub mod settings;
pub mod text;
pub mod voice;

pub use dispatcher::{DispatchOutcome, DispatcherApi, DispatcherService};
pub use error::SpeechError;
pub use finisher::{FinishOutcome, FinisherApi, FinisherService, ObjectCreated};
pub use model::{
    ChatId, OutputFormat, SampleRate, StoredAsset, SynthesisMode, SynthesisTask, Visibility,
    Voice, VoiceRequest,
};
pub use settings::PipelineSettings;
pub use voice::VoiceSelector;
