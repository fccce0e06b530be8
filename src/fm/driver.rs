//! Cycle-accurate FM driver
//!
//! The backend is only ever run on demand: every register access first renders the
//! samples owed up to the access cycle, so a write takes effect on the exact sample
//! boundary it falls into. Nothing is rendered ahead of the requesting cycle.

use super::buffer::SampleBuffer;
use super::{FmBackend, FmKind};

/// Drives one FM backend in step with the master clock
#[derive(Debug)]
pub struct FmDriver {
    backend: FmBackend,
    clock_ratio: u32,
    buffer: SampleBuffer,
    /// Cycle at which this frame's first sample starts (carry from the previous frame)
    cycles_start: u32,
    /// Cycle up to which samples have been rendered; always `cycles_start + n * clock_ratio`
    cycles_count: u32,
    /// Latest cycle stamp seen this frame
    last_sync: u32,
}

impl FmDriver {
    /// Take ownership of a bound backend
    pub fn new(backend: FmBackend) -> Self {
        let clock_ratio = backend.clock_ratio();
        FmDriver {
            buffer: SampleBuffer::for_clock_ratio(clock_ratio),
            backend,
            clock_ratio,
            cycles_start: 0,
            cycles_count: 0,
            last_sync: 0,
        }
    }

    /// Bound backend kind
    pub fn kind(&self) -> FmKind {
        self.backend.kind()
    }

    /// Master clock cycles per rendered sample
    pub fn clock_ratio(&self) -> u32 {
        self.clock_ratio
    }

    /// Bound backend
    pub fn backend(&self) -> &FmBackend {
        &self.backend
    }

    /// Bound backend (mutable)
    pub fn backend_mut(&mut self) -> &mut FmBackend {
        &mut self.backend
    }

    /// Samples rendered so far this frame
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Cycle offset of the first sample in the current frame
    pub fn frame_start(&self) -> u32 {
        self.cycles_start
    }

    /// Cycle up to which samples have been rendered
    pub fn coverage(&self) -> u32 {
        self.cycles_count
    }

    /// Render every sample owed up to `cycles`
    ///
    /// Renders the smallest whole number of samples covering `cycles`, which may
    /// reach past it by less than one clock ratio. A stamp already covered is a no-op.
    pub fn update(&mut self, cycles: u32) {
        debug_assert!(
            cycles >= self.last_sync,
            "FM access at cycle {} after cycle {}",
            cycles,
            self.last_sync
        );
        self.last_sync = self.last_sync.max(cycles);

        if cycles > self.cycles_count {
            let samples = (cycles - self.cycles_count).div_ceil(self.clock_ratio);
            self.backend.update(self.buffer.reserve(samples as usize));
            self.cycles_count += samples * self.clock_ratio;
        }
    }

    /// Synchronize, then reset the chip
    pub fn reset(&mut self, cycles: u32) {
        self.update(cycles);
        self.backend.reset();
    }

    /// Synchronize, then write a register
    pub fn write(&mut self, cycles: u32, address: u32, value: u32) {
        self.update(cycles);
        self.backend.write(address, value);
    }

    /// Synchronize, then read the chip status
    pub fn read(&mut self, cycles: u32, address: u32) -> u32 {
        self.update(cycles);
        self.backend.read(address)
    }

    /// Drop rendered samples and rewind all counters to zero
    pub fn clear(&mut self) {
        self.restore_phase(0);
    }

    /// Start the next frame with `carry` cycles already covered
    pub fn end_frame(&mut self, carry: u32) {
        self.restore_phase(carry);
    }

    /// Set frame start and coverage to `carry`; nothing is owed afterwards
    pub fn restore_phase(&mut self, carry: u32) {
        self.cycles_start = carry;
        self.cycles_count = carry;
        self.last_sync = 0;
        self.buffer.clear();
    }
}
