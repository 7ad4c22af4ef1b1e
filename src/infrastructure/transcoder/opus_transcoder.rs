//! Opus encoder writing an Ogg container (RFC 7845), the format chat
//! platforms accept for voice messages.

use crate::domain::audio::{plan_frames, AudioTranscoder, CodecConfig};
use crate::domain::speech::SpeechError;
use ogg::writing::{PacketWriteEndInfo, PacketWriter};
use opus::{Application, Bitrate, Channels, Encoder};

pub const OGG_OPUS_CONTENT_TYPE: &str = "audio/ogg";
pub const OGG_OPUS_EXTENSION: &str = "ogg";

/// Opus packets never exceed this size
const MAX_PACKET_SIZE: usize = 4000;

/// Granule positions are always counted at 48 kHz
const GRANULE_RATE: u64 = 48_000;

const STREAM_SERIAL: u32 = 0;
const VENDOR: &str = "voice-reply-bot";

/// Opus sample rates libopus accepts
const OPUS_SAMPLE_RATES: [u32; 5] = [8000, 12000, 16000, 24000, 48000];

pub struct OpusTranscoder {
    config: CodecConfig,
}

impl OpusTranscoder {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn create_opus_head(channels: u8, sample_rate: u32, pre_skip: u16) -> Vec<u8> {
        let mut head = Vec::with_capacity(19);
        head.extend_from_slice(b"OpusHead");
        head.push(1); // version
        head.push(channels);
        head.extend_from_slice(&pre_skip.to_le_bytes());
        head.extend_from_slice(&sample_rate.to_le_bytes());
        head.extend_from_slice(&0i16.to_le_bytes()); // output gain
        head.push(0); // channel mapping family
        head
    }

    fn create_opus_tags() -> Vec<u8> {
        let mut tags = Vec::new();
        tags.extend_from_slice(b"OpusTags");
        tags.extend_from_slice(&(VENDOR.len() as u32).to_le_bytes());
        tags.extend_from_slice(VENDOR.as_bytes());
        tags.extend_from_slice(&0u32.to_le_bytes()); // no user comments
        tags
    }

    fn codec_error(context: &str, err: impl std::fmt::Display) -> SpeechError {
        SpeechError::Codec(format!("{}: {}", context, err))
    }
}

impl AudioTranscoder for OpusTranscoder {
    fn encode(&self, pcm: &[u8], sample_rate: u32, channels: u8) -> Result<Vec<u8>, SpeechError> {
        if !OPUS_SAMPLE_RATES.contains(&sample_rate) {
            return Err(SpeechError::Codec(format!(
                "unsupported sample rate {} Hz",
                sample_rate
            )));
        }

        let opus_channels = match channels {
            1 => Channels::Mono,
            2 => Channels::Stereo,
            other => {
                return Err(SpeechError::Codec(format!(
                    "unsupported channel count {}",
                    other
                )))
            }
        };

        // Every frame is validated before the encoder sees any of them
        let frames = plan_frames(pcm.len(), sample_rate, channels, self.config.frame_duration)?;

        let samples: Vec<i16> = pcm
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut encoder = Encoder::new(sample_rate, opus_channels, Application::Voip)
            .map_err(|e| Self::codec_error("failed to create Opus encoder", e))?;

        encoder
            .set_bitrate(Bitrate::Bits(self.config.bitrate as i32))
            .map_err(|e| Self::codec_error("failed to set bitrate", e))?;

        let pre_skip = encoder
            .get_lookahead()
            .map_err(|e| Self::codec_error("failed to read encoder lookahead", e))?;
        let granule_scale = GRANULE_RATE / sample_rate as u64;
        let pre_skip_48k = pre_skip as u64 * granule_scale;

        let mut ogg_data = Vec::new();
        {
            let mut packet_writer = PacketWriter::new(&mut ogg_data);

            let opus_head = Self::create_opus_head(channels, sample_rate, pre_skip_48k as u16);
            packet_writer
                .write_packet(opus_head, STREAM_SERIAL, PacketWriteEndInfo::EndPage, 0)
                .map_err(|e| Self::codec_error("failed to write Opus head", e))?;

            packet_writer
                .write_packet(
                    Self::create_opus_tags(),
                    STREAM_SERIAL,
                    PacketWriteEndInfo::EndPage,
                    0,
                )
                .map_err(|e| Self::codec_error("failed to write Opus tags", e))?;

            let channel_count = channels as usize;
            let mut output_buf = vec![0u8; MAX_PACKET_SIZE];
            let mut granule_pos = pre_skip_48k;
            let mut offset = 0;

            for (index, frame_samples) in frames.iter().enumerate() {
                let frame_len = frame_samples * channel_count;
                let frame = &samples[offset..offset + frame_len];
                offset += frame_len;

                let encoded_len = encoder
                    .encode(frame, &mut output_buf)
                    .map_err(|e| Self::codec_error("Opus encode failed", e))?;

                granule_pos += *frame_samples as u64 * granule_scale;

                let end_info = if index + 1 == frames.len() {
                    PacketWriteEndInfo::EndStream
                } else {
                    PacketWriteEndInfo::NormalPacket
                };

                packet_writer
                    .write_packet(
                        output_buf[..encoded_len].to_vec(),
                        STREAM_SERIAL,
                        end_info,
                        granule_pos,
                    )
                    .map_err(|e| Self::codec_error("failed to write Opus packet", e))?;
            }
        }

        tracing::debug!(
            pcm_size = pcm.len(),
            opus_size = ogg_data.len(),
            frames = frames.len(),
            sample_rate,
            bitrate = self.config.bitrate,
            "PCM encoded to Ogg/Opus"
        );

        Ok(ogg_data)
    }

    fn content_type(&self) -> &'static str {
        OGG_OPUS_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        OGG_OPUS_EXTENSION
    }
}
