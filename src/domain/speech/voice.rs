use super::error::SpeechError;
use super::model::Voice;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Picks a voice uniformly at random from a fixed pool.
///
/// The random source is owned by the selector so tests can seed it and get a
/// reproducible sequence of voices.
pub struct VoiceSelector {
    voices: Vec<Voice>,
    rng: Mutex<StdRng>,
}

impl VoiceSelector {
    pub fn new(voices: Vec<Voice>) -> Result<Self, SpeechError> {
        Self::with_rng(voices, StdRng::from_os_rng())
    }

    pub fn seeded(voices: Vec<Voice>, seed: u64) -> Result<Self, SpeechError> {
        Self::with_rng(voices, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(voices: Vec<Voice>, rng: StdRng) -> Result<Self, SpeechError> {
        if voices.is_empty() {
            return Err(SpeechError::Validation("voice pool is empty".to_string()));
        }

        Ok(Self {
            voices,
            rng: Mutex::new(rng),
        })
    }

    pub fn pick(&self) -> Voice {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.random_range(0..self.voices.len());
        self.voices[index]
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }
}
