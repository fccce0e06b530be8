//! FM Sound Domain
//!
//! Backend selection and the cycle-accurate driver that keeps the selected FM chip
//! in step with the master clock.
//!
//! Implementation:
//! - `buffer` - Fixed-capacity raw stereo sample buffer
//! - `driver` - Cycle-accurate sample generation on register access
//! - `ym3438` - High-precision backend built on a per-cycle OPN2 model

pub mod buffer;
pub mod driver;
pub mod ym3438;

pub use buffer::SampleBuffer;
pub use driver::FmDriver;
pub use ym3438::Ym3438;

use crate::backend::{ChipFactory, FmChip};
use crate::config::SoundConfig;
use crate::system::SoundFamily;
use crate::timing::{YM2413_CLOCK_RATIO, YM2612_CLOCK_RATIO, YM3438_CLOCK_RATIO};
use crate::{Result, SoundError};
use num_derive::{FromPrimitive, ToPrimitive};
use std::fmt;

/// Status value returned for chips without a readable status port
pub const FM_STATUS_NONE: u32 = 0xFF;

/// FM backend kind
///
/// The numeric value is the save-state discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u8)]
pub enum FmKind {
    /// Discrete YM2612 model
    Ym2612 = 0,
    /// Per-cycle YM3438 model
    Ym3438 = 1,
    /// YM2413 (OPLL)
    Ym2413 = 2,
}

impl FmKind {
    /// Master clock cycles per backend output sample
    pub const fn clock_ratio(self) -> u32 {
        match self {
            FmKind::Ym2612 => YM2612_CLOCK_RATIO,
            FmKind::Ym3438 => YM3438_CLOCK_RATIO,
            FmKind::Ym2413 => YM2413_CLOCK_RATIO,
        }
    }
}

impl fmt::Display for FmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmKind::Ym2612 => write!(f, "YM2612"),
            FmKind::Ym3438 => write!(f, "YM3438"),
            FmKind::Ym2413 => write!(f, "YM2413"),
        }
    }
}

/// The FM chip bound to a session
///
/// Bound once at initialization; there is no switching between variants afterwards.
pub enum FmBackend {
    /// Discrete YM2612 model
    Ym2612(Box<dyn FmChip>),
    /// Per-cycle YM3438 model
    Ym3438(Ym3438),
    /// YM2413 model
    Ym2413(Box<dyn FmChip>),
}

impl FmBackend {
    /// Bind the backend for a sound family
    ///
    /// Mega Drive systems get the YM3438 backend when `high_precision_fm` is set and the
    /// YM2612 model otherwise; every other family gets the YM2413.
    pub fn select(
        family: SoundFamily,
        config: &SoundConfig,
        factory: &mut dyn ChipFactory,
    ) -> Result<Self> {
        let backend = match family {
            SoundFamily::MegaDrive if config.high_precision_fm => {
                let core = factory
                    .ym3438_core()
                    .ok_or(SoundError::BackendUnavailable(FmKind::Ym3438))?;
                FmBackend::Ym3438(Ym3438::new(core))
            }
            SoundFamily::MegaDrive => {
                let mut chip = factory
                    .ym2612()
                    .ok_or(SoundError::BackendUnavailable(FmKind::Ym2612))?;
                chip.set_dac_bits(config.dac_bits);
                FmBackend::Ym2612(chip)
            }
            SoundFamily::MasterSystem | SoundFamily::Sg1000 => {
                let chip = factory
                    .ym2413()
                    .ok_or(SoundError::BackendUnavailable(FmKind::Ym2413))?;
                FmBackend::Ym2413(chip)
            }
        };
        log::info!(
            "FM backend {} selected for {:?} ({} master cycles per sample)",
            backend.kind(),
            family,
            backend.clock_ratio()
        );
        Ok(backend)
    }

    /// Which variant is bound
    pub fn kind(&self) -> FmKind {
        match self {
            FmBackend::Ym2612(_) => FmKind::Ym2612,
            FmBackend::Ym3438(_) => FmKind::Ym3438,
            FmBackend::Ym2413(_) => FmKind::Ym2413,
        }
    }

    /// Master clock cycles per output sample
    pub fn clock_ratio(&self) -> u32 {
        self.kind().clock_ratio()
    }

    /// Reset the chip
    pub fn reset(&mut self) {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.reset(),
            FmBackend::Ym3438(chip) => chip.reset(),
        }
    }

    /// Render `buffer.len() / 2` interleaved stereo samples
    pub fn update(&mut self, buffer: &mut [i32]) {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.update(buffer),
            FmBackend::Ym3438(chip) => chip.update(buffer),
        }
    }

    /// Write a chip register
    pub fn write(&mut self, address: u32, value: u32) {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.write(address, value),
            FmBackend::Ym3438(chip) => chip.write(address, value),
        }
    }

    /// Read the chip status
    ///
    /// The YM2413 has no readable status and always yields [`FM_STATUS_NONE`].
    pub fn read(&mut self, address: u32) -> u32 {
        match self {
            FmBackend::Ym2612(chip) => chip.read(address),
            FmBackend::Ym3438(chip) => chip.read(address),
            FmBackend::Ym2413(_) => FM_STATUS_NONE,
        }
    }

    /// Reapply derived chip configuration (DAC bit depth)
    pub fn apply_config(&mut self, config: &SoundConfig) {
        if let FmBackend::Ym2612(chip) = self {
            chip.set_dac_bits(config.dac_bits);
        }
    }

    /// Size in bytes of the persisted backend block
    pub fn context_size(&self) -> usize {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.context_size(),
            FmBackend::Ym3438(chip) => chip.context_size(),
        }
    }

    /// Append the backend block to `out`
    pub fn save_context(&self, out: &mut Vec<u8>) {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.save_context(out),
            FmBackend::Ym3438(chip) => chip.save_context(out),
        }
    }

    /// Restore the backend block from exactly [`context_size`](Self::context_size) bytes
    pub fn load_context(&mut self, state: &[u8]) {
        match self {
            FmBackend::Ym2612(chip) | FmBackend::Ym2413(chip) => chip.load_context(state),
            FmBackend::Ym3438(chip) => chip.load_context(state),
        }
    }
}

impl fmt::Debug for FmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmBackend")
            .field("kind", &self.kind())
            .field("context_size", &self.context_size())
            .finish_non_exhaustive()
    }
}
