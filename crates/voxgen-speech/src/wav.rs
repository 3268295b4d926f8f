//! WAV container writing and read-back.
//!
//! Generation output is fixed at mono 24 kHz 16-bit PCM, but the reader
//! handles arbitrary valid WAV files (the asset extractor reuses it for
//! files voxgen did not write).

use std::path::Path;

use serde::Serialize;

/// Container parameters for [`write_wav`]; defaults match generation output.
#[derive(Debug, Clone, Copy)]
pub struct WavParams {
    pub channels: u16,
    pub sample_rate_hz: u32,
    pub sample_width_bytes: u16,
}

impl Default for WavParams {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate_hz: 24_000,
            sample_width_bytes: 2,
        }
    }
}

/// Metadata read back from a WAV file.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WavInfo {
    /// Inter-channel frames (samples per channel)
    pub frames: u32,
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavInfo {
    /// Duration is always derived from frames and the rate recorded in the
    /// file, guarding against a caller-supplied inconsistent rate.
    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.frames) / f64::from(self.sample_rate_hz)
    }
}

/// Writes raw little-endian PCM bytes as a WAV file, creating parent
/// directories as needed. Only 8-bit and 16-bit sample widths are valid.
pub fn write_wav(path: &Path, pcm: &[u8], params: &WavParams) -> Result<(), hound::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = hound::WavSpec {
        channels: params.channels,
        sample_rate: params.sample_rate_hz,
        bits_per_sample: params.sample_width_bytes * 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;

    match params.sample_width_bytes {
        2 => {
            for chunk in pcm.chunks_exact(2) {
                writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
            }
        }
        1 => {
            for &byte in pcm {
                writer.write_sample(byte as i8)?;
            }
        }
        width => {
            return Err(hound::Error::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported sample width: {width} bytes"),
            )));
        }
    }

    writer.finalize()
}

/// Reopens a WAV file and extracts frame count, rate, and channel layout.
pub fn read_wav_info(path: &Path) -> Result<WavInfo, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    Ok(WavInfo {
        frames: reader.duration(),
        sample_rate_hz: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Rounds seconds to millisecond precision for reporting.
pub(crate) fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
