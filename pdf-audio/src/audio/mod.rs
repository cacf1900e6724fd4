//! In-memory PCM audio: decoding service payloads, speed adjustment and WAV output.

pub mod speed;
pub mod writer;

pub use speed::adjust_speed;
pub use writer::{output_path_for, write_wav};

use std::io::{Cursor, ErrorKind};
use std::time::Duration;
use thiserror::Error;

/// Sample rate used for an accumulator that never received a segment.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Audio that cannot be decoded or combined.
#[derive(Debug, Error)]
#[error("Unrecognized audio format: {0}")]
pub struct AudioFormatError(pub String);

/// Decoded 16-bit linear PCM, interleaved by channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// An empty mono buffer at the default rate.
    pub fn empty() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, 1, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Playback length at the declared sample rate.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = self.frames() as u128 * 1_000_000_000 / self.sample_rate as u128;
        Duration::from_nanos(nanos as u64)
    }

    /// Check the buffer describes something playable.
    pub fn validate(&self) -> Result<(), AudioFormatError> {
        if self.sample_rate == 0 {
            return Err(AudioFormatError("sample rate is zero".to_string()));
        }
        if self.channels == 0 {
            return Err(AudioFormatError("channel count is zero".to_string()));
        }
        if self.samples.len() % self.channels as usize != 0 {
            return Err(AudioFormatError(format!(
                "{} samples do not divide into {} channels",
                self.samples.len(),
                self.channels
            )));
        }
        Ok(())
    }

    /// Decode a WAV payload holding 16-bit integer PCM.
    ///
    /// Streamed WAV headers may declare a data length larger than what was
    /// sent; decoding stops at the end of the payload in that case.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioFormatError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| AudioFormatError(format!("not a WAV payload ({})", e)))?;

        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(AudioFormatError(format!(
                "expected 16-bit linear PCM, got {}-bit {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let declared = reader.len() as usize;
        let mut samples = Vec::with_capacity(declared.min(bytes.len() / 2));
        for sample in reader.samples::<i16>() {
            match sample {
                Ok(s) => samples.push(s),
                Err(hound::Error::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(AudioFormatError(format!("corrupt sample data ({})", e))),
            }
        }

        // Drop a trailing partial frame
        let channels = spec.channels.max(1) as usize;
        samples.truncate(samples.len() - samples.len() % channels);

        let buffer = Self::new(spec.sample_rate, spec.channels, samples);
        buffer.validate()?;
        Ok(buffer)
    }

    /// Append another buffer's samples. An empty accumulator takes on the
    /// format of the first non-empty segment.
    pub fn append(&mut self, other: &AudioBuffer) -> Result<(), AudioFormatError> {
        other.validate()?;

        if self.is_empty() {
            self.sample_rate = other.sample_rate;
            self.channels = other.channels;
        } else if self.sample_rate != other.sample_rate || self.channels != other.channels {
            return Err(AudioFormatError(format!(
                "cannot join {} Hz/{} ch audio onto {} Hz/{} ch audio",
                other.sample_rate, other.channels, self.sample_rate, self.channels
            )));
        }

        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode samples as a 16-bit PCM WAV payload.
    pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_decode_wav() {
        let bytes = wav_bytes(24000, 1, &[1, -2, 3, -4]);
        let buffer = AudioBuffer::from_wav_bytes(&bytes).unwrap();
        assert_eq!(buffer.sample_rate, 24000);
        assert_eq!(buffer.channels, 1);
        assert_eq!(buffer.samples, vec![1, -2, 3, -4]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = AudioBuffer::from_wav_bytes(b"{\"err_msg\":\"nope\"}");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_float_samples() {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        let err = AudioBuffer::from_wav_bytes(&cursor.into_inner()).unwrap_err();
        assert!(err.to_string().contains("16-bit"));
    }

    #[test]
    fn test_decode_truncated_payload() {
        let mut bytes = wav_bytes(16000, 1, &[10, 20, 30, 40]);
        // Cut the last sample and a half off the data chunk
        bytes.truncate(bytes.len() - 3);
        let buffer = AudioBuffer::from_wav_bytes(&bytes).unwrap();
        assert_eq!(buffer.samples, vec![10, 20]);
    }

    #[test]
    fn test_append_adopts_first_format() {
        let mut combined = AudioBuffer::empty();
        combined
            .append(&AudioBuffer::new(16000, 2, vec![1, 2, 3, 4]))
            .unwrap();
        assert_eq!(combined.sample_rate, 16000);
        assert_eq!(combined.channels, 2);
        assert_eq!(combined.frames(), 2);

        combined.append(&AudioBuffer::new(16000, 2, vec![5, 6])).unwrap();
        assert_eq!(combined.samples, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_append_rejects_mismatch() {
        let mut combined = AudioBuffer::new(24000, 1, vec![0; 10]);
        let result = combined.append(&AudioBuffer::new(16000, 1, vec![0; 10]));
        assert!(result.is_err());
        assert_eq!(combined.samples.len(), 10);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(24000, 1, vec![0; 12000]);
        assert_eq!(buffer.duration(), Duration::from_millis(500));
        assert_eq!(AudioBuffer::empty().duration(), Duration::ZERO);
    }

    #[test]
    fn test_validate() {
        assert!(AudioBuffer::new(0, 1, vec![]).validate().is_err());
        assert!(AudioBuffer::new(24000, 0, vec![]).validate().is_err());
        assert!(AudioBuffer::new(24000, 2, vec![1, 2, 3]).validate().is_err());
        assert!(AudioBuffer::new(24000, 2, vec![1, 2]).validate().is_ok());
    }
}
