//! Delta synthesis output
//!
//! Sound sources never write samples directly. They report amplitude changes
//! (deltas) at master clock positions within the current frame, and the sink
//! reconstructs an evenly spaced output stream from them.

use blip_buf::BlipBuf;

/// Receiver of per-channel amplitude deltas
///
/// Deltas are steps between levels of at most [`MAX_LEVEL`](crate::mixer::MAX_LEVEL)
/// magnitude, so every step fits an `i32`. How a sink maps that range onto its
/// output is up to the sink.
pub trait DeltaSink {
    /// Add a band-limited step at master clock `time`
    fn add_delta(&mut self, time: u32, left: i32, right: i32);

    /// Add a linearly interpolated step at master clock `time`
    fn add_delta_fast(&mut self, time: u32, left: i32, right: i32);

    /// Close the frame after `time` master clocks
    fn end_frame(&mut self, time: u32);

    /// Output samples (per channel) ready to be drained
    fn samples_avail(&self) -> usize;
}

/// Loudest level [`StereoBlip`] passes on; louder input is held at this level
pub const MAX_AMPLITUDE: i64 = i16::MAX as i64;

/// Stereo band-limited buffer clocked at the master clock
///
/// The integrators inside `BlipBuf` only have headroom for levels a little beyond
/// 16 bits, so the buffer tracks the level each channel's deltas add up to and
/// saturates it at [`MAX_AMPLITUDE`]. Only the clipped change reaches the integrator.
pub struct StereoBlip {
    left: BlipBuf,
    right: BlipBuf,
    /// Unclipped level per channel
    level: [i64; 2],
    scratch: Vec<i16>,
}

#[inline]
fn clip(level: i64) -> i64 {
    level.clamp(-MAX_AMPLITUDE, MAX_AMPLITUDE)
}

/// Move `level` by `delta`, returning the change of the clipped level
#[inline]
fn step(level: &mut i64, delta: i32) -> i32 {
    let from = clip(*level);
    *level += i64::from(delta);
    (clip(*level) - from) as i32
}

impl StereoBlip {
    /// Create a buffer converting `clock_rate` master clocks/s to `sample_rate` samples/s
    ///
    /// The buffer holds one second of output; drain it at least that often.
    pub fn new(clock_rate: f64, sample_rate: f64) -> Self {
        let size = sample_rate.ceil() as u32;
        let mut left = BlipBuf::new(size);
        let mut right = BlipBuf::new(size);
        left.set_rates(clock_rate, sample_rate);
        right.set_rates(clock_rate, sample_rate);
        StereoBlip {
            left,
            right,
            level: [0, 0],
            scratch: Vec::with_capacity(size as usize),
        }
    }

    /// Drop all buffered output and pending deltas
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.level = [0, 0];
    }

    /// Drain up to `out.len() / 2` interleaved left/right pairs
    ///
    /// Returns the number of pairs written.
    pub fn read_samples(&mut self, out: &mut [i16]) -> usize {
        let pairs = (out.len() / 2).min(self.samples_avail());
        self.scratch.resize(pairs, 0);

        let count = self.left.read_samples(&mut self.scratch[..pairs], false) as usize;
        for (frame, &l) in out.chunks_exact_mut(2).zip(&self.scratch[..count]) {
            frame[0] = l;
        }

        let count = self.right.read_samples(&mut self.scratch[..pairs], false) as usize;
        for (frame, &r) in out.chunks_exact_mut(2).zip(&self.scratch[..count]) {
            frame[1] = r;
        }

        count
    }
}

impl DeltaSink for StereoBlip {
    #[inline]
    fn add_delta(&mut self, time: u32, left: i32, right: i32) {
        let left = step(&mut self.level[0], left);
        if left != 0 {
            self.left.add_delta(time, left);
        }
        let right = step(&mut self.level[1], right);
        if right != 0 {
            self.right.add_delta(time, right);
        }
    }

    #[inline]
    fn add_delta_fast(&mut self, time: u32, left: i32, right: i32) {
        let left = step(&mut self.level[0], left);
        if left != 0 {
            self.left.add_delta_fast(time, left);
        }
        let right = step(&mut self.level[1], right);
        if right != 0 {
            self.right.add_delta_fast(time, right);
        }
    }

    fn end_frame(&mut self, time: u32) {
        self.left.end_frame(time);
        self.right.end_frame(time);
    }

    fn samples_avail(&self) -> usize {
        self.left.samples_avail() as usize
    }
}

impl std::fmt::Debug for StereoBlip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StereoBlip")
            .field("level", &self.level)
            .field("samples_avail", &self.samples_avail())
            .finish_non_exhaustive()
    }
}
