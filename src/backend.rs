//! Capability traits for the sound chip models
//!
//! The synthesis models are supplied by the host. This module defines the narrow
//! interfaces the sound core drives them through:
//! - [`FmChip`] for a complete FM chip producing samples at its native rate
//! - [`Opn2Core`] for the per-internal-cycle OPN2 model behind the high-precision backend
//! - [`ToneGenerator`] for the SN76489-style tone/noise generator
//! - [`ChipFactory`] to hand those models to a session at initialization

use crate::output::DeltaSink;

/// Common interface for FM chip backends
///
/// # Example
///
/// ```
/// use genesis_sound::FmChip;
///
/// fn key_on<C: FmChip>(chip: &mut C) -> [i32; 2] {
///     chip.write(0, 0x28); // Key on/off register
///     chip.write(1, 0xF0); // All operators, channel 1
///
///     let mut pair = [0i32; 2];
///     chip.update(&mut pair);
///     pair
/// }
/// ```
pub trait FmChip: Send {
    /// Reset the chip to its power-on register state
    fn reset(&mut self);

    /// Render samples at the chip's native rate
    ///
    /// `buffer` holds interleaved left/right pairs; its length is twice the number
    /// of samples requested.
    fn update(&mut self, buffer: &mut [i32]);

    /// Write a register through the chip's address/data ports
    fn write(&mut self, address: u32, value: u32);

    /// Read the chip status port
    fn read(&mut self, address: u32) -> u32;

    /// Reconfigure the DAC output bit depth
    ///
    /// Only the discrete YM2612 model quantizes its output; other chips ignore this.
    fn set_dac_bits(&mut self, _bits: u8) {
        // Default: no-op for chips without a configurable DAC
    }

    /// Size in bytes of the persisted chip context (fixed per implementation)
    fn context_size(&self) -> usize;

    /// Append the full internal chip state to `out`
    fn save_context(&self, out: &mut Vec<u8>);

    /// Restore the internal chip state from exactly [`context_size`](Self::context_size) bytes
    fn load_context(&mut self, state: &[u8]);
}

/// Per-internal-cycle OPN2 oscillator model
///
/// One call to [`clock`](Self::clock) advances the model by a single internal clock
/// (master clock / 7 / 6) and returns the raw output of the channel slot being
/// processed on that clock.
pub trait Opn2Core: Send {
    /// Reset the model to its power-on state
    fn reset(&mut self);

    /// Advance one internal clock and return the raw left/right output
    fn clock(&mut self) -> [i32; 2];

    /// Write a value to one of the four bus ports
    fn write(&mut self, port: u32, value: u32);

    /// Read the status port
    fn read(&mut self, port: u32) -> u32;

    /// Size in bytes of the persisted model state
    fn context_size(&self) -> usize;

    /// Append the full model state to `out`
    fn save_context(&self, out: &mut Vec<u8>);

    /// Restore the model state from exactly [`context_size`](Self::context_size) bytes
    fn load_context(&mut self, state: &[u8]);
}

/// How the tone/noise generator is wired into the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PsgMode {
    /// Stand-alone SN76489 (SG-1000)
    Discrete,
    /// PSG integrated into the VDP (Master System, Game Gear, Mega Drive)
    Integrated,
}

/// Tone/noise generator interface
///
/// The generator renders its own deltas straight into the shared output sink at the
/// end of every frame.
pub trait ToneGenerator: Send {
    /// Reset the generator
    fn reset(&mut self);

    /// Apply pre-amplification (percent) and stereo panning mask starting at `cycles`
    fn config(&mut self, cycles: u32, preamp: u32, panning: u8);

    /// Write the data port at master clock position `cycles`
    fn write(&mut self, cycles: u32, data: u32);

    /// Run until `cycles` and flush the frame's deltas into `output`
    fn end_frame(&mut self, cycles: u32, output: &mut dyn DeltaSink);

    /// Size in bytes of the persisted generator state
    fn context_size(&self) -> usize;

    /// Append the full generator state to `out`
    fn save_context(&self, out: &mut Vec<u8>);

    /// Restore the generator state from exactly [`context_size`](Self::context_size) bytes
    fn load_context(&mut self, state: &[u8]);
}

/// Supplies chip models to a session at initialization
///
/// Returning `None` for an FM model means that backend is unavailable in this build;
/// selecting it fails [`Sound::init`](crate::Sound::init).
pub trait ChipFactory {
    /// Discrete YM2612 model (sample-rate output)
    fn ym2612(&mut self) -> Option<Box<dyn FmChip>>;

    /// Per-cycle OPN2 model used by the high-precision YM3438 backend
    fn ym3438_core(&mut self) -> Option<Box<dyn Opn2Core>>;

    /// YM2413 model (Master System FM unit)
    fn ym2413(&mut self) -> Option<Box<dyn FmChip>>;

    /// Tone/noise generator wired in the given mode
    fn tone_generator(&mut self, mode: PsgMode) -> Box<dyn ToneGenerator>;
}
