//! Master clock timing constants
//!
//! All cycle values handled by the sound core are master-clock cycles counted from
//! the start of the current frame.

/// Master clock cycles per scanline
pub const MCYCLES_PER_LINE: u32 = 3420;

/// Scanlines per NTSC frame
pub const LINES_PER_FRAME_NTSC: u32 = 262;

/// Scanlines per PAL frame
pub const LINES_PER_FRAME_PAL: u32 = 313;

/// Longest frame the core accepts; sizes the raw FM sample buffer
pub const MAX_FRAME_CYCLES: u32 = MCYCLES_PER_LINE * LINES_PER_FRAME_PAL;

/// NTSC master clock (Hz)
pub const MASTER_CLOCK_NTSC: u32 = 53_693_175;

/// PAL master clock (Hz)
pub const MASTER_CLOCK_PAL: u32 = 53_203_424;

/// YM2612 runs at VCLK / 144 = MCLK / 7 / 144
pub const YM2612_CLOCK_RATIO: u32 = 144 * 7;

/// YM3438 per-cycle core runs at VCLK / 6 = MCLK / 7 / 6
pub const YM3438_CLOCK_RATIO: u32 = 6 * 7;

/// YM2413 runs at ZCLK / 72 = MCLK / 15 / 72
pub const YM2413_CLOCK_RATIO: u32 = 72 * 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ratios() {
        assert_eq!(YM2612_CLOCK_RATIO, 1008);
        assert_eq!(YM3438_CLOCK_RATIO, 42);
        assert_eq!(YM2413_CLOCK_RATIO, 1080);
    }

    #[test]
    fn test_ym2612_native_rate() {
        // ~53.27 kHz at NTSC
        let rate = MASTER_CLOCK_NTSC / YM2612_CLOCK_RATIO;
        assert_eq!(rate, 53_267);
    }
}
