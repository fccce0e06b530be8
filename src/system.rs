//! Machine hardware identification
//!
//! Maps the host machine's system hardware id to the sound chip family it carries.

use crate::backend::PsgMode;
use crate::{Result, SoundError};
use bitflags::bitflags;

bitflags! {
    /// System hardware id as reported by the host machine
    ///
    /// Values are bit patterns, not independent flags: the Mega Drive family is
    /// identified by masking with [`SystemHw::PBC`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SystemHw: u8 {
        /// SG-1000
        const SG = 0x10;
        /// SG-1000 II
        const SGII = 0x11;
        /// SG-1000 II with RAM extension
        const SGII_RAM_EXT = 0x12;
        /// Mark III
        const MARKIII = 0x13;
        /// Master System
        const SMS = 0x20;
        /// Master System II
        const SMS2 = 0x21;
        /// Game Gear
        const GG = 0x40;
        /// Game Gear in Master System mode
        const GGMS = 0x41;
        /// Mega Drive / Genesis
        const MD = 0x80;
        /// Power Base Converter (Master System mode on Mega Drive)
        const PBC = 0x81;
        /// Pico
        const PICO = 0x82;
        /// Mega-CD
        const MCD = 0x84;
    }
}

impl SystemHw {
    const KNOWN: [SystemHw; 12] = [
        SystemHw::SG,
        SystemHw::SGII,
        SystemHw::SGII_RAM_EXT,
        SystemHw::MARKIII,
        SystemHw::SMS,
        SystemHw::SMS2,
        SystemHw::GG,
        SystemHw::GGMS,
        SystemHw::MD,
        SystemHw::PBC,
        SystemHw::PICO,
        SystemHw::MCD,
    ];

    /// Convert a raw hardware id, rejecting ids without a sound chip mapping
    pub fn from_id(id: u8) -> Result<Self> {
        Self::KNOWN
            .iter()
            .copied()
            .find(|hw| hw.bits() == id)
            .ok_or(SoundError::UnsupportedSystem(id))
    }
}

/// Sound chip family, one per mutually exclusive FM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundFamily {
    /// YM2612/YM3438 with integrated PSG
    MegaDrive,
    /// YM2413 with integrated PSG
    MasterSystem,
    /// YM2413 with discrete PSG
    Sg1000,
}

impl SoundFamily {
    /// Derive the sound family from a system hardware id
    pub fn from_system(hw: SystemHw) -> Result<Self> {
        let hw = SystemHw::from_id(hw.bits())?;
        if hw & SystemHw::PBC == SystemHw::MD {
            Ok(SoundFamily::MegaDrive)
        } else if hw == SystemHw::SG {
            Ok(SoundFamily::Sg1000)
        } else {
            Ok(SoundFamily::MasterSystem)
        }
    }

    /// PSG wiring for this family
    pub fn psg_mode(&self) -> PsgMode {
        match self {
            SoundFamily::Sg1000 => PsgMode::Discrete,
            SoundFamily::MegaDrive | SoundFamily::MasterSystem => PsgMode::Integrated,
        }
    }

    /// Whether more than one FM backend can serve this family
    pub fn has_backend_choice(&self) -> bool {
        matches!(self, SoundFamily::MegaDrive)
    }
}
