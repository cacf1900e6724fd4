//! WAV file output.

use super::AudioBuffer;
use crate::error::PipelineError;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension of the generated audio file.
pub const OUTPUT_EXTENSION: &str = "wav";

/// Name used when the input path has no usable base name.
const FALLBACK_STEM: &str = "output";

/// Mode for a newly created output file.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Output file for a document: `<base-name>.wav` in the working directory.
pub fn output_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty() && !s.starts_with('.'))
        .unwrap_or(FALLBACK_STEM.into());
    PathBuf::from(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

/// Write `buffer` as 16-bit PCM WAV to `output_path`, replacing any existing file.
///
/// The audio is written to a temporary file next to the target and renamed
/// into place, so an earlier file at the same path survives a failed write.
pub fn write_wav(buffer: &AudioBuffer, output_path: &Path) -> Result<PathBuf, PipelineError> {
    buffer
        .validate()
        .map_err(|source| PipelineError::AudioFormat {
            chunk_index: None,
            attempts: None,
            source,
        })?;

    let io_err = |source: std::io::Error| PipelineError::Io {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;

    let spec = hound::WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    {
        let mut writer = hound::WavWriter::new(BufWriter::new(temp.as_file_mut()), spec)
            .map_err(|e| io_err(hound_to_io(e)))?;
        for &sample in &buffer.samples {
            writer
                .write_sample(sample)
                .map_err(|e| io_err(hound_to_io(e)))?;
        }
        writer.finalize().map_err(|e| io_err(hound_to_io(e)))?;
    }

    set_output_permissions(&temp, output_path).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(output_path).map_err(|e| io_err(e.error))?;

    log::debug!(
        "Wrote {} frames at {} Hz to {}",
        buffer.frames(),
        buffer.sample_rate,
        output_path.display()
    );

    Ok(output_path.to_path_buf())
}

/// Temp files are created owner-only; give the output the mode of the file it
/// replaces, or a world-readable default.
#[cfg(unix)]
fn set_output_permissions(temp: &NamedTempFile, output_path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(output_path) {
        Ok(existing) => existing.permissions(),
        Err(_) => std::fs::Permissions::from_mode(NEW_FILE_MODE),
    };
    temp.as_file().set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_output_permissions(_temp: &NamedTempFile, _output_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn hound_to_io(e: hound::Error) -> std::io::Error {
    match e {
        hound::Error::IoError(io) => io,
        other => std::io::Error::other(other.to_string()),
    }
}
