use crate::domain::speech::SpeechError;
use std::str::FromStr;

/// Raw synthesis output is always mono
pub const PCM_CHANNELS: u8 = 1;

/// Opus only encodes frames of these durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrameDuration {
    Ms2_5,
    Ms5,
    Ms10,
    Ms20,
    Ms40,
    Ms60,
}

impl FrameDuration {
    pub const ALL: [FrameDuration; 6] = [
        FrameDuration::Ms2_5,
        FrameDuration::Ms5,
        FrameDuration::Ms10,
        FrameDuration::Ms20,
        FrameDuration::Ms40,
        FrameDuration::Ms60,
    ];

    /// Duration in tenths of a millisecond, keeps the arithmetic integral
    fn tenths_ms(&self) -> u64 {
        match self {
            FrameDuration::Ms2_5 => 25,
            FrameDuration::Ms5 => 50,
            FrameDuration::Ms10 => 100,
            FrameDuration::Ms20 => 200,
            FrameDuration::Ms40 => 400,
            FrameDuration::Ms60 => 600,
        }
    }

    pub fn as_millis_f64(&self) -> f64 {
        self.tenths_ms() as f64 / 10.0
    }

    /// Samples per channel in one frame, `None` if the rate cannot express it
    pub fn samples_at(&self, sample_rate: u32) -> Option<usize> {
        let scaled = sample_rate as u64 * self.tenths_ms();
        (scaled % 10_000 == 0).then(|| (scaled / 10_000) as usize)
    }

    /// Frame duration matching exactly `samples` per channel at `sample_rate`
    pub fn from_samples(samples: usize, sample_rate: u32) -> Option<Self> {
        FrameDuration::ALL
            .iter()
            .copied()
            .find(|duration| duration.samples_at(sample_rate) == Some(samples))
    }
}

impl FromStr for FrameDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.5" => Ok(FrameDuration::Ms2_5),
            "5" => Ok(FrameDuration::Ms5),
            "10" => Ok(FrameDuration::Ms10),
            "20" => Ok(FrameDuration::Ms20),
            "40" => Ok(FrameDuration::Ms40),
            "60" => Ok(FrameDuration::Ms60),
            other => Err(format!(
                "illegal frame size '{}', expected one of 2.5, 5, 10, 20, 40, 60",
                other
            )),
        }
    }
}

/// Encoder settings, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub bitrate: u32,
    pub frame_duration: FrameDuration,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            bitrate: 40_000,
            frame_duration: FrameDuration::Ms20,
        }
    }
}

/// Converts raw 16-bit little-endian PCM into the delivery codec
pub trait AudioTranscoder: Send + Sync {
    fn encode(&self, pcm: &[u8], sample_rate: u32, channels: u8) -> Result<Vec<u8>, SpeechError>;

    /// MIME type of the encoded output
    fn content_type(&self) -> &'static str;

    /// Object key extension of the encoded output
    fn extension(&self) -> &'static str;
}

fn duration_ms(samples: usize, sample_rate: u32) -> f64 {
    samples as f64 * 1000.0 / sample_rate as f64
}

/// Cut a PCM buffer into frames of `frame_duration`.
///
/// Returns the number of samples per channel of every frame. The trailing
/// frame may be shorter but must itself have a legal duration; nothing is
/// ever dropped or padded.
pub fn plan_frames(
    byte_len: usize,
    sample_rate: u32,
    channels: u8,
    frame_duration: FrameDuration,
) -> Result<Vec<usize>, SpeechError> {
    if sample_rate == 0 || channels == 0 {
        return Err(SpeechError::Codec(format!(
            "unsupported stream layout: {} Hz, {} channel(s)",
            sample_rate, channels
        )));
    }

    let bytes_per_sample_frame = 2 * channels as usize;
    if byte_len % bytes_per_sample_frame != 0 {
        return Err(SpeechError::Codec(format!(
            "illegal frame size ({} bytes is not a whole number of {}-channel 16-bit samples)",
            byte_len, channels
        )));
    }

    let total_samples = byte_len / bytes_per_sample_frame;
    if total_samples == 0 {
        return Err(SpeechError::illegal_frame_size(0.0));
    }

    let frame_samples = frame_duration.samples_at(sample_rate).ok_or_else(|| {
        SpeechError::illegal_frame_size(frame_duration.as_millis_f64())
    })?;

    let full_frames = total_samples / frame_samples;
    let tail = total_samples % frame_samples;

    if tail > 0 && FrameDuration::from_samples(tail, sample_rate).is_none() {
        return Err(SpeechError::illegal_frame_size(duration_ms(tail, sample_rate)));
    }

    let mut frames = vec![frame_samples; full_frames];
    if tail > 0 {
        frames.push(tail);
    }

    Ok(frames)
}
