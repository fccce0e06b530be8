//! Frame mixer
//!
//! Turns the raw FM samples of one frame into amplitude deltas placed at their exact
//! master clock position in the output sink.

use crate::config::MixQuality;
use crate::output::DeltaSink;

/// Largest pre-amplified level magnitude
///
/// Just under half the `i32` range, so the step between any two levels is itself an `i32`.
pub const MAX_LEVEL: i32 = (1 << 30) - 1;

/// Scale a raw sample by a percentage, truncating toward zero and saturating at
/// [`MAX_LEVEL`]
#[inline]
fn preamp(sample: i32, percent: u32) -> i32 {
    let level = i64::from(sample) * i64::from(percent) / 100;
    level.clamp(-i64::from(MAX_LEVEL), i64::from(MAX_LEVEL)) as i32
}

/// FM side of the frame flush
///
/// Holds the last emitted pair so each frame's first delta is taken against the
/// previous frame's final amplitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMixer {
    fm_preamp: u32,
    quality: MixQuality,
    last: [i32; 2],
}

impl FrameMixer {
    /// Create a mixer with a silent baseline
    pub fn new(fm_preamp: u32, quality: MixQuality) -> Self {
        FrameMixer {
            fm_preamp,
            quality,
            last: [0, 0],
        }
    }

    /// Last emitted (pre-amplified) pair
    pub fn last(&self) -> [i32; 2] {
        self.last
    }

    /// Delta injection mode
    pub fn quality(&self) -> MixQuality {
        self.quality
    }

    /// Return to a silent baseline
    pub fn reset(&mut self) {
        self.last = [0, 0];
    }

    /// Emit one delta per raw sample, starting at cycle `start` and stepping by `clock_ratio`
    ///
    /// The walk always emits at least one sample and stops once the time cursor
    /// reaches `cycles`. Returns the final cursor, which lies in
    /// `cycles..cycles + clock_ratio` when `start < cycles`.
    pub fn mix(
        &mut self,
        samples: &[i32],
        start: u32,
        clock_ratio: u32,
        cycles: u32,
        sink: &mut dyn DeltaSink,
    ) -> u32 {
        let mut time = start;
        let mut frames = samples.chunks_exact(2);
        let [mut prev_l, mut prev_r] = self.last;

        loop {
            let (l, r) = match frames.next() {
                Some(frame) => (
                    preamp(frame[0], self.fm_preamp),
                    preamp(frame[1], self.fm_preamp),
                ),
                None => {
                    debug_assert!(false, "FM buffer exhausted at cycle {}", time);
                    (prev_l, prev_r)
                }
            };

            match self.quality {
                MixQuality::BandLimited => sink.add_delta(time, l - prev_l, r - prev_r),
                MixQuality::Linear => sink.add_delta_fast(time, l - prev_l, r - prev_r),
            }
            prev_l = l;
            prev_r = r;

            time += clock_ratio;
            if time >= cycles {
                break;
            }
        }

        self.last = [prev_l, prev_r];
        time
    }
}
