//! Scripted chip models shared by the integration tests and benches
#![allow(dead_code)]

use genesis_sound::fm::FmKind;
use genesis_sound::timing::MASTER_CLOCK_NTSC;
use genesis_sound::{ChipFactory, DeltaSink, FmChip, Opn2Core, PsgMode, ToneGenerator};

/// Status bit reported while a square chip is sounding
pub const STATUS_BUSY: u32 = 0x80;

fn word(state: &[u8], index: usize) -> u32 {
    let at = index * 4;
    u32::from_le_bytes([state[at], state[at + 1], state[at + 2], state[at + 3]])
}

/// Square wave FM chip
///
/// Register 0 sets the left level, 1 the right level, 2 the half period in samples
/// (0 holds the level constant). Reading port 1 returns the configured DAC depth.
#[derive(Debug, Default, Clone)]
pub struct SquareChip {
    level: [i32; 2],
    period: u32,
    phase: u32,
    dac_bits: u8,
}

impl FmChip for SquareChip {
    fn reset(&mut self) {
        self.level = [0, 0];
        self.period = 0;
        self.phase = 0;
    }

    fn update(&mut self, buffer: &mut [i32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let negative = self.period > 0 && (self.phase / self.period) % 2 == 1;
            let sign = if negative { -1 } else { 1 };
            frame[0] = self.level[0] * sign;
            frame[1] = self.level[1] * sign;
            self.phase = self.phase.wrapping_add(1);
        }
    }

    fn write(&mut self, address: u32, value: u32) {
        match address {
            0 => self.level[0] = value as i32,
            1 => self.level[1] = value as i32,
            2 => self.period = value,
            _ => {}
        }
    }

    fn read(&mut self, address: u32) -> u32 {
        match address {
            1 => u32::from(self.dac_bits),
            _ if self.level != [0, 0] => STATUS_BUSY,
            _ => 0,
        }
    }

    fn set_dac_bits(&mut self, bits: u8) {
        self.dac_bits = bits;
    }

    fn context_size(&self) -> usize {
        16
    }

    fn save_context(&self, out: &mut Vec<u8>) {
        for value in [self.level[0] as u32, self.level[1] as u32, self.period, self.phase] {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn load_context(&mut self, state: &[u8]) {
        self.level = [word(state, 0) as i32, word(state, 1) as i32];
        self.period = word(state, 2);
        self.phase = word(state, 3);
        // Restoring the raw context clobbers derived configuration
        self.dac_bits = 0;
    }
}

/// OPN2 core that only produces output on slot 0 of each 24-clock cycle
#[derive(Debug, Default, Clone)]
pub struct SlotCore {
    level: i32,
    clocks: u32,
}

impl Opn2Core for SlotCore {
    fn reset(&mut self) {
        self.level = 0;
        self.clocks = 0;
    }

    fn clock(&mut self) -> [i32; 2] {
        let slot = self.clocks % 24;
        self.clocks = self.clocks.wrapping_add(1);
        if slot == 0 {
            [self.level, -self.level]
        } else {
            [0, 0]
        }
    }

    fn write(&mut self, _port: u32, value: u32) {
        self.level = value as i32;
    }

    fn read(&mut self, _port: u32) -> u32 {
        0
    }

    fn context_size(&self) -> usize {
        8
    }

    fn save_context(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.level as u32).to_le_bytes());
        out.extend_from_slice(&self.clocks.to_le_bytes());
    }

    fn load_context(&mut self, state: &[u8]) {
        self.level = word(state, 0) as i32;
        self.clocks = word(state, 1);
    }
}

/// Tone generator emitting one step per data write, at the write's cycle
#[derive(Debug, Clone)]
pub struct StepPsg {
    pub mode: PsgMode,
    preamp: u32,
    level: i32,
    pending: Vec<(u32, u32)>,
}

impl StepPsg {
    pub fn new(mode: PsgMode) -> Self {
        StepPsg {
            mode,
            preamp: 100,
            level: 0,
            pending: Vec::new(),
        }
    }
}

impl ToneGenerator for StepPsg {
    fn reset(&mut self) {
        self.level = 0;
        self.pending.clear();
    }

    fn config(&mut self, _cycles: u32, preamp: u32, _panning: u8) {
        self.preamp = preamp;
    }

    fn write(&mut self, cycles: u32, data: u32) {
        self.pending.push((cycles, data));
    }

    fn end_frame(&mut self, _cycles: u32, output: &mut dyn DeltaSink) {
        for (time, data) in self.pending.drain(..) {
            let level = data as i32 * self.preamp as i32 / 100;
            let delta = level - self.level;
            output.add_delta(time, delta, delta);
            self.level = level;
        }
    }

    fn context_size(&self) -> usize {
        8
    }

    fn save_context(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.level as u32).to_le_bytes());
        out.extend_from_slice(&self.preamp.to_le_bytes());
    }

    fn load_context(&mut self, state: &[u8]) {
        self.level = word(state, 0) as i32;
        self.preamp = word(state, 1);
    }
}

/// Factory handing out the scripted models
#[derive(Debug, Clone)]
pub struct ScriptedChips {
    pub ym2612: bool,
    pub ym3438: bool,
    pub ym2413: bool,
    pub psg_modes: Vec<PsgMode>,
}

impl ScriptedChips {
    pub fn all() -> Self {
        ScriptedChips {
            ym2612: true,
            ym3438: true,
            ym2413: true,
            psg_modes: Vec::new(),
        }
    }

    pub fn without(kind: FmKind) -> Self {
        let mut chips = Self::all();
        match kind {
            FmKind::Ym2612 => chips.ym2612 = false,
            FmKind::Ym3438 => chips.ym3438 = false,
            FmKind::Ym2413 => chips.ym2413 = false,
        }
        chips
    }
}

impl ChipFactory for ScriptedChips {
    fn ym2612(&mut self) -> Option<Box<dyn FmChip>> {
        self.ym2612
            .then(|| Box::new(SquareChip::default()) as Box<dyn FmChip>)
    }

    fn ym3438_core(&mut self) -> Option<Box<dyn Opn2Core>> {
        self.ym3438
            .then(|| Box::new(SlotCore::default()) as Box<dyn Opn2Core>)
    }

    fn ym2413(&mut self) -> Option<Box<dyn FmChip>> {
        self.ym2413
            .then(|| Box::new(SquareChip::default()) as Box<dyn FmChip>)
    }

    fn tone_generator(&mut self, mode: PsgMode) -> Box<dyn ToneGenerator> {
        self.psg_modes.push(mode);
        Box::new(StepPsg::new(mode))
    }
}

/// One recorded delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub time: u32,
    pub left: i32,
    pub right: i32,
    pub fast: bool,
}

/// Sink recording every delta, producing 44.1 kHz worth of sample counts
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    pub deltas: Vec<Delta>,
    pub frames: Vec<u32>,
    clocks: u64,
}

impl RecordingSink {
    /// Deltas whose left or right step is non-zero
    pub fn audible(&self) -> Vec<Delta> {
        self.deltas
            .iter()
            .copied()
            .filter(|d| d.left != 0 || d.right != 0)
            .collect()
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
        self.frames.clear();
    }
}

impl DeltaSink for RecordingSink {
    fn add_delta(&mut self, time: u32, left: i32, right: i32) {
        self.deltas.push(Delta {
            time,
            left,
            right,
            fast: false,
        });
    }

    fn add_delta_fast(&mut self, time: u32, left: i32, right: i32) {
        self.deltas.push(Delta {
            time,
            left,
            right,
            fast: true,
        });
    }

    fn end_frame(&mut self, time: u32) {
        self.frames.push(time);
        self.clocks += u64::from(time);
    }

    fn samples_avail(&self) -> usize {
        (self.clocks * 44_100 / u64::from(MASTER_CLOCK_NTSC)) as usize
    }
}
