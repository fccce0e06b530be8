//! Audio capture
//!
//! Writes the drained output stream to disk so a frontend can dump what the machine
//! played.

pub mod wav;

pub use wav::WavRecorder;
