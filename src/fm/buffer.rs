//! Raw FM sample buffer
//!
//! Interleaved left/right pairs at the backend's native rate, filled by the driver
//! during a frame and drained by the mixer at frame end.

use crate::timing::MAX_FRAME_CYCLES;

/// Fixed-capacity interleaved stereo buffer with an explicit write cursor
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    data: Vec<i32>,
    len: usize,
}

impl SampleBuffer {
    /// Buffer holding `capacity` stereo pairs
    pub fn with_capacity(capacity: usize) -> Self {
        SampleBuffer {
            data: vec![0; capacity * 2],
            len: 0,
        }
    }

    /// Buffer sized for the longest supported frame at `clock_ratio`
    ///
    /// One extra pair covers the sample owed past the end of a frame.
    pub fn for_clock_ratio(clock_ratio: u32) -> Self {
        Self::with_capacity(MAX_FRAME_CYCLES.div_ceil(clock_ratio) as usize + 1)
    }

    /// Claim the next `pairs` stereo slots for writing
    ///
    /// # Panics
    /// Panics if the frame would overflow the buffer.
    pub fn reserve(&mut self, pairs: usize) -> &mut [i32] {
        let start = self.len * 2;
        let end = start + pairs * 2;
        assert!(
            end <= self.data.len(),
            "FM sample buffer overflow: {} + {} pairs exceeds capacity {}",
            self.len,
            pairs,
            self.capacity()
        );
        self.len += pairs;
        &mut self.data[start..end]
    }

    /// Written pairs
    pub fn frames(&self) -> &[i32] {
        &self.data[..self.len * 2]
    }

    /// Number of written pairs
    pub fn len(&self) -> usize {
        self.len
    }

    /// No pairs written this frame
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pairs the buffer can hold
    pub fn capacity(&self) -> usize {
        self.data.len() / 2
    }

    /// Rewind the write cursor
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{YM2612_CLOCK_RATIO, YM3438_CLOCK_RATIO};

    #[test]
    fn test_capacity_per_ratio() {
        // 1070460 / 1008 = 1061.96
        assert_eq!(
            SampleBuffer::for_clock_ratio(YM2612_CLOCK_RATIO).capacity(),
            1063
        );
        // 1070460 / 42 = 25487.14
        assert_eq!(
            SampleBuffer::for_clock_ratio(YM3438_CLOCK_RATIO).capacity(),
            25489
        );
    }

    #[test]
    fn test_reserve_advances_cursor() {
        let mut buffer = SampleBuffer::with_capacity(4);
        buffer.reserve(1).copy_from_slice(&[1, 2]);
        buffer.reserve(2).copy_from_slice(&[3, 4, 5, 6]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.frames(), &[1, 2, 3, 4, 5, 6]);

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.frames().is_empty());
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn test_overflow_panics() {
        let mut buffer = SampleBuffer::with_capacity(2);
        buffer.reserve(2);
        buffer.reserve(1);
    }
}
