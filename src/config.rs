//! Session configuration
//!
//! Read-only for the lifetime of a [`Sound`](crate::Sound) session. Changing any
//! value means building a new session.

use crate::{Result, SoundError};
use serde::{Deserialize, Serialize};

/// Highest accepted pre-amplification, in percent
pub const MAX_PREAMP: u32 = 200;

/// Accepted YM2612 DAC bit depths
pub const DAC_BITS_RANGE: std::ops::RangeInclusive<u8> = 7..=14;

/// How FM deltas are injected into the output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MixQuality {
    /// Band-limited step synthesis
    #[default]
    BandLimited,
    /// Cheaper linear interpolation
    Linear,
}

/// Sound core configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// FM output pre-amplification (percent)
    pub fm_preamp: u32,
    /// PSG output pre-amplification (percent)
    pub psg_preamp: u32,
    /// FM delta injection mode
    pub mix_quality: MixQuality,
    /// Use the per-cycle YM3438 backend instead of the discrete YM2612 model (Mega Drive only)
    pub high_precision_fm: bool,
    /// YM2612 DAC output bit depth
    pub dac_bits: u8,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            fm_preamp: 100,
            psg_preamp: 150,
            mix_quality: MixQuality::BandLimited,
            high_precision_fm: false,
            dac_bits: 14,
        }
    }
}

impl SoundConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SoundConfig = serde_json::from_str(json)
            .map_err(|e| SoundError::ConfigError(format!("malformed sound config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.fm_preamp > MAX_PREAMP {
            return Err(SoundError::ConfigError(format!(
                "fm_preamp {}% exceeds {}%",
                self.fm_preamp, MAX_PREAMP
            )));
        }
        if self.psg_preamp > MAX_PREAMP {
            return Err(SoundError::ConfigError(format!(
                "psg_preamp {}% exceeds {}%",
                self.psg_preamp, MAX_PREAMP
            )));
        }
        if !DAC_BITS_RANGE.contains(&self.dac_bits) {
            return Err(SoundError::ConfigError(format!(
                "dac_bits {} outside {}..={}",
                self.dac_bits,
                DAC_BITS_RANGE.start(),
                DAC_BITS_RANGE.end()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SoundConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            SoundConfig::from_json(r#"{ "fm_preamp": 120, "mix_quality": "linear" }"#).unwrap();
        assert_eq!(config.fm_preamp, 120);
        assert_eq!(config.mix_quality, MixQuality::Linear);
        assert_eq!(config.psg_preamp, 150);
        assert_eq!(config.dac_bits, 14);
        assert!(!config.high_precision_fm);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let config = SoundConfig {
            dac_bits: 16,
            ..SoundConfig::default()
        };
        assert!(matches!(config.validate(), Err(SoundError::ConfigError(_))));

        assert!(SoundConfig::from_json(r#"{ "psg_preamp": 500 }"#).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SoundConfig::from_json("{ fm_preamp: ").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }
}
