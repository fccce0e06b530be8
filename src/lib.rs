//! Sound core for Sega 8/16-bit emulation
//!
//! Keeps an FM sound chip (YM2612, YM3438 or YM2413) running in lock-step with the
//! emulated machine's master clock, mixes its raw output together with the PSG
//! tone/noise generator into a band-limited stereo stream, and persists the exact
//! chip state for save-states.
//!
//! # Features
//! - Cycle-accurate FM synchronization: register accesses flush exactly the samples
//!   owed up to the access cycle, never more
//! - Fractional cycle carry across frames, so long-run timing never drifts
//! - Band-limited or linear-interpolated delta injection into the output buffer
//! - Byte-exact save/load of the active FM backend and the tone generator
//! - Optional WAV capture of the drained output stream
//!
//! The chip synthesis models themselves are supplied by the host through the
//! traits in [`backend`]; this crate owns the timing, buffering, mixing and
//! persistence around them.
//!
//! # Crate feature flags
//! - `export-wav` (default): WAV capture of drained samples (`export`)
//!
//! # Quick start
//! ```no_run
//! # use genesis_sound::backend::ChipFactory;
//! # fn chips() -> Box<dyn ChipFactory> { unimplemented!() }
//! use genesis_sound::{timing, Sound, SoundConfig, StereoBlip, SystemHw};
//!
//! let mut factory = chips();
//! let output = StereoBlip::new(timing::MASTER_CLOCK_NTSC as f64, 44_100.0);
//! let mut sound = Sound::init(SystemHw::MD, SoundConfig::default(), factory.as_mut(), output)?;
//!
//! // CPU writes key-on at master cycle 1200 of the current frame
//! sound.fm_write(1200, 0, 0x28);
//! sound.fm_write(1200, 1, 0xF0);
//!
//! let frame = timing::MCYCLES_PER_LINE * timing::LINES_PER_FRAME_NTSC;
//! let available = sound.update(frame);
//! let mut pcm = vec![0i16; available * 2];
//! sound.output_mut().read_samples(&mut pcm);
//! # Ok::<(), genesis_sound::SoundError>(())
//! ```

#![warn(missing_docs)]

pub mod backend; // Chip capability traits
pub mod config;
#[cfg(feature = "export-wav")]
pub mod export; // WAV capture
pub mod fm; // FM backends, raw buffer and cycle-accurate driver
pub mod mixer;
pub mod output; // Delta synthesis sink
pub mod sound; // Owned session
pub mod state; // Save-state layout
pub mod system;
pub mod timing;

/// Error types for sound core operations
///
/// Frame processing itself is total; errors only surface while building a session,
/// restoring a save-state or writing captured audio.
#[derive(thiserror::Error, Debug)]
pub enum SoundError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// System hardware id that has no sound chip mapping
    #[error("Unsupported system hardware id 0x{0:02X}")]
    UnsupportedSystem(u8),

    /// The chip factory could not provide the selected FM backend
    #[error("FM backend {0} is not available")]
    BackendUnavailable(FmKind),

    /// Save-state blob is shorter than the active layout requires
    #[error("Save-state too short: expected {expected} bytes, got {actual}")]
    StateSize {
        /// Bytes required by the active backend layout
        expected: usize,
        /// Bytes provided
        actual: usize,
    },

    /// Save-state was produced by a different FM backend
    #[error("Save-state backend mismatch: saved discriminator {saved}, active backend {active}")]
    BackendMismatch {
        /// Discriminator byte found in the blob
        saved: u8,
        /// Backend bound to the live session
        active: FmKind,
    },

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sound core operations
pub type Result<T> = std::result::Result<T, SoundError>;

// Public API exports
pub use backend::{ChipFactory, FmChip, Opn2Core, PsgMode, ToneGenerator};
pub use config::{MixQuality, SoundConfig};
#[cfg(feature = "export-wav")]
pub use export::WavRecorder;
pub use fm::{FmBackend, FmDriver, FmKind};
pub use mixer::FrameMixer;
pub use output::{DeltaSink, StereoBlip};
pub use sound::Sound;
pub use system::{SoundFamily, SystemHw};
