//! Playback speed change by sample-rate reinterpretation.

use super::{AudioBuffer, AudioFormatError};

/// Largest slowdown accepted, as a ratio of output to input length.
const MAX_STRETCH: u32 = 16;

/// Change the tempo of `buffer` by `factor` (below 1.0 slows it down).
///
/// The samples are treated as if they had been recorded at
/// `round(rate * factor)` Hz and are then converted back to the original
/// rate, so the result keeps the original declared rate but holds
/// `1 / factor` times as many frames. Pitch moves with tempo.
pub fn adjust_speed(buffer: &AudioBuffer, factor: f64) -> Result<AudioBuffer, AudioFormatError> {
    buffer.validate()?;

    if !factor.is_finite() || factor <= 0.0 {
        return Err(AudioFormatError(format!(
            "speed factor must be a positive number, got {}",
            factor
        )));
    }

    let original = buffer.sample_rate;
    let declared = (original as f64 * factor).round();
    if declared < 1.0 || declared > u32::MAX as f64 {
        return Err(AudioFormatError(format!(
            "speed factor {} gives an unusable sample rate for {} Hz audio",
            factor, original
        )));
    }
    let declared = declared as u32;
    if original / declared > MAX_STRETCH {
        return Err(AudioFormatError(format!(
            "speed factor {} would stretch audio more than {}x",
            factor, MAX_STRETCH
        )));
    }

    if declared == original {
        return Ok(buffer.clone());
    }

    let samples = convert_rate(&buffer.samples, buffer.channels as usize, declared, original);
    Ok(AudioBuffer::new(original, buffer.channels, samples))
}

/// Linear-interpolation rate conversion over interleaved frames.
fn convert_rate(samples: &[i16], channels: usize, from_rate: u32, to_rate: u32) -> Vec<i16> {
    let frames = samples.len() / channels;
    if frames == 0 {
        return Vec::new();
    }

    let from = from_rate as u64;
    let to = to_rate as u64;
    let out_frames = (frames as u64 * to).div_ceil(from) as usize;
    let mut out = Vec::with_capacity(out_frames * channels);

    for i in 0..out_frames as u64 {
        // Source position i * from / to, split into whole frame and remainder
        let scaled = i * from;
        let idx = ((scaled / to) as usize).min(frames - 1);
        let frac = (scaled % to) as f64 / to as f64;

        for ch in 0..channels {
            let left = samples[idx * channels + ch] as f64;
            let value = if idx + 1 < frames {
                let right = samples[(idx + 1) * channels + ch] as f64;
                left + (right - left) * frac
            } else {
                left
            };
            out.push(value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_factor_is_identity() {
        let buffer = AudioBuffer::new(24000, 1, vec![5, -5, 300, -300]);
        let adjusted = adjust_speed(&buffer, 1.0).unwrap();
        assert_eq!(adjusted, buffer);
    }

    #[test]
    fn test_half_speed_doubles_frames() {
        let buffer = AudioBuffer::new(24000, 1, vec![0, 100, 200]);
        let adjusted = adjust_speed(&buffer, 0.5).unwrap();
        assert_eq!(adjusted.sample_rate, 24000);
        assert_eq!(adjusted.samples, vec![0, 50, 100, 150, 200, 200]);
    }

    #[test]
    fn test_default_slowdown_lengthens_audio() {
        let buffer = AudioBuffer::new(24000, 1, vec![1000; 2160]);
        let adjusted = adjust_speed(&buffer, 0.9).unwrap();
        assert_eq!(adjusted.sample_rate, 24000);
        assert_eq!(adjusted.frames(), 2400);
        assert!(adjusted.samples.iter().all(|&s| s == 1000));
    }

    #[test]
    fn test_speed_up_shortens_audio() {
        let buffer = AudioBuffer::new(16000, 1, (0..100).collect());
        let adjusted = adjust_speed(&buffer, 2.0).unwrap();
        assert_eq!(adjusted.frames(), 50);
        assert_eq!(adjusted.samples[..3], [0, 2, 4]);
    }

    #[test]
    fn test_stereo_channels_stay_separate() {
        let buffer = AudioBuffer::new(8000, 2, vec![0, 1000, 100, 1000]);
        let adjusted = adjust_speed(&buffer, 0.5).unwrap();
        assert_eq!(adjusted.channels, 2);
        assert_eq!(adjusted.samples, vec![0, 1000, 50, 1000, 100, 1000, 100, 1000]);
    }

    #[test]
    fn test_deterministic() {
        let buffer = AudioBuffer::new(24000, 1, (0..997).map(|i| (i * 37 % 2000) as i16).collect());
        let a = adjust_speed(&buffer, 0.9).unwrap();
        let b = adjust_speed(&buffer, 0.9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_input_untouched() {
        let buffer = AudioBuffer::new(24000, 1, vec![1, 2, 3, 4]);
        let copy = buffer.clone();
        let _ = adjust_speed(&buffer, 0.75).unwrap();
        assert_eq!(buffer, copy);
    }

    #[test]
    fn test_empty_buffer() {
        let adjusted = adjust_speed(&AudioBuffer::empty(), 0.9).unwrap();
        assert!(adjusted.is_empty());
        assert_eq!(adjusted.sample_rate, 24000);
    }

    #[test]
    fn test_invalid_factor() {
        let buffer = AudioBuffer::new(24000, 1, vec![0; 4]);
        assert!(adjust_speed(&buffer, 0.0).is_err());
        assert!(adjust_speed(&buffer, -0.9).is_err());
        assert!(adjust_speed(&buffer, f64::NAN).is_err());
        assert!(adjust_speed(&AudioBuffer::new(10, 1, vec![0; 4]), 0.01).is_err());
    }

    #[test]
    fn test_extreme_slowdown_rejected() {
        let buffer = AudioBuffer::new(24000, 1, vec![0; 48000]);
        let err = adjust_speed(&buffer, 0.00005).unwrap_err();
        assert!(err.to_string().contains("stretch"));
        assert!(adjust_speed(&buffer, 0.0625).is_ok());
    }

    #[test]
    fn test_malformed_buffer() {
        let buffer = AudioBuffer::new(24000, 2, vec![0; 3]);
        assert!(adjust_speed(&buffer, 0.9).is_err());
    }
}
