//! WAV capture of the output stream

use crate::output::{DeltaSink, StereoBlip};
use crate::{Result, SoundError};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Streams interleaved 16-bit stereo samples into a WAV file
///
/// # Examples
///
/// ```no_run
/// use genesis_sound::WavRecorder;
///
/// # fn main() -> genesis_sound::Result<()> {
/// let mut recorder = WavRecorder::create("capture.wav", 44_100)?;
/// recorder.record(&[0, 0, 1200, -1200])?;
/// recorder.finalize()?;
/// # Ok(())
/// # }
/// ```
pub struct WavRecorder {
    writer: WavWriter<BufWriter<File>>,
    frames: u64,
    scratch: Vec<i16>,
}

impl WavRecorder {
    /// Create (or truncate) `path` for 16-bit stereo PCM at `sample_rate`
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path.as_ref(), spec).map_err(|e| {
            SoundError::AudioFileError(format!(
                "Failed to create WAV file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(WavRecorder {
            writer,
            frames: 0,
            scratch: Vec::new(),
        })
    }

    /// Append interleaved left/right pairs
    pub fn record(&mut self, samples: &[i16]) -> Result<()> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .map_err(|e| SoundError::AudioFileError(format!("Failed to write sample: {}", e)))?;
        }
        self.frames += (samples.len() / 2) as u64;
        Ok(())
    }

    /// Drain everything `output` has available into the file
    ///
    /// Returns the number of stereo pairs captured.
    pub fn capture(&mut self, output: &mut StereoBlip) -> Result<usize> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(output.samples_avail() * 2, 0);
        let pairs = output.read_samples(&mut scratch);
        let result = self.record(&scratch[..pairs * 2]);
        self.scratch = scratch;
        result.map(|()| pairs)
    }

    /// Stereo pairs written so far
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Flush and close the file, fixing up the header
    pub fn finalize(self) -> Result<()> {
        self.writer
            .finalize()
            .map_err(|e| SoundError::AudioFileError(format!("Failed to finalize WAV file: {}", e)))
    }
}

impl std::fmt::Debug for WavRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavRecorder")
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
