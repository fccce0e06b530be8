//! High-precision YM3438 backend
//!
//! The OPN2 core is clocked once per requested sample (master clock / 42). Each clock
//! only produces the output of the channel slot it is processing, so the 24 slot
//! outputs of a full internal cycle are accumulated and summed into one held stereo
//! pair that is repeated until the next full cycle completes.

use crate::backend::Opn2Core;

/// Internal clocks per full channel/operator cycle
pub const YM3438_SLOTS: usize = 24;

/// Output gain applied to the summed slots
const OUTPUT_GAIN: i32 = 11;

/// Bytes persisted after the core context: accumulator, held pair and slot cursor
const ACCUMULATOR_BYTES: usize = (YM3438_SLOTS * 2 + 2) * 4 + 4;

/// YM3438 backend wrapping a per-cycle OPN2 model
pub struct Ym3438 {
    core: Box<dyn Opn2Core>,
    accm: [[i32; 2]; YM3438_SLOTS],
    sample: [i32; 2],
    cycles: u32,
}

impl Ym3438 {
    /// Wrap a core with a cleared accumulator
    pub fn new(core: Box<dyn Opn2Core>) -> Self {
        Ym3438 {
            core,
            accm: [[0; 2]; YM3438_SLOTS],
            sample: [0; 2],
            cycles: 0,
        }
    }

    /// Reset the core; accumulated slot outputs keep their values
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Render `buffer.len() / 2` samples, one core clock each
    pub fn update(&mut self, buffer: &mut [i32]) {
        for frame in buffer.chunks_exact_mut(2) {
            self.accm[self.cycles as usize] = self.core.clock();
            self.cycles = (self.cycles + 1) % YM3438_SLOTS as u32;

            if self.cycles == 0 {
                self.sample = self.accm.iter().fold([0, 0], |acc, slot| {
                    [acc[0].saturating_add(slot[0]), acc[1].saturating_add(slot[1])]
                });
            }

            frame[0] = self.sample[0].saturating_mul(OUTPUT_GAIN);
            frame[1] = self.sample[1].saturating_mul(OUTPUT_GAIN);
        }
    }

    /// Write one of the four bus ports
    pub fn write(&mut self, address: u32, value: u32) {
        self.core.write(address, value);
    }

    /// Read the status port
    pub fn read(&mut self, address: u32) -> u32 {
        self.core.read(address)
    }

    /// Current position within the 24-clock cycle
    pub fn slot(&self) -> u32 {
        self.cycles
    }

    /// Size of the persisted block
    pub fn context_size(&self) -> usize {
        self.core.context_size() + ACCUMULATOR_BYTES
    }

    /// Append core context, accumulator, held pair and cursor
    pub fn save_context(&self, out: &mut Vec<u8>) {
        self.core.save_context(out);
        for value in self.accm.iter().flatten().chain(self.sample.iter()) {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&self.cycles.to_le_bytes());
    }

    /// Restore a block written by [`save_context`](Self::save_context)
    ///
    /// `state` must hold exactly [`context_size`](Self::context_size) bytes.
    pub fn load_context(&mut self, state: &[u8]) {
        let (core, rest) = state.split_at(self.core.context_size());
        self.core.load_context(core);

        let mut words = rest.chunks_exact(4).map(|w| [w[0], w[1], w[2], w[3]]);
        for value in self.accm.iter_mut().flatten().chain(self.sample.iter_mut()) {
            if let Some(bytes) = words.next() {
                *value = i32::from_le_bytes(bytes);
            }
        }
        if let Some(bytes) = words.next() {
            self.cycles = u32::from_le_bytes(bytes) % YM3438_SLOTS as u32;
        }
    }
}
