//! Sound session
//!
//! One [`Sound`] owns everything a running machine's audio needs: the bound FM
//! backend and its driver, the tone generator, the frame mixer and the output sink.
//! Every operation is stamped with the master clock cycle (relative to the current
//! frame) at which the machine performed it.

use crate::backend::{ChipFactory, ToneGenerator};
use crate::config::SoundConfig;
use crate::fm::{FmBackend, FmDriver, FmKind};
use crate::mixer::FrameMixer;
use crate::output::{DeltaSink, StereoBlip};
use crate::state::StateLayout;
use crate::system::{SoundFamily, SystemHw};
use crate::timing::MAX_FRAME_CYCLES;
use crate::Result;
use log::{debug, info, trace, warn};

/// PSG panning mask routing every channel to both speakers
const PSG_PAN_CENTER: u8 = 0xFF;

/// Sound core session
pub struct Sound<S: DeltaSink = StereoBlip> {
    system: SystemHw,
    family: SoundFamily,
    config: SoundConfig,
    fm: FmDriver,
    psg: Box<dyn ToneGenerator>,
    mixer: FrameMixer,
    output: S,
}

impl<S: DeltaSink> Sound<S> {
    /// Build a session for `system`
    ///
    /// Binds the FM backend (fixed for the lifetime of the session), builds the tone
    /// generator in the family's wiring mode and resets everything. Fails on an invalid
    /// configuration, an unknown system id or a backend the factory cannot provide.
    pub fn init(
        system: SystemHw,
        config: SoundConfig,
        factory: &mut dyn ChipFactory,
        output: S,
    ) -> Result<Self> {
        config.validate()?;
        let family = SoundFamily::from_system(system)?;
        let backend = FmBackend::select(family, &config, factory)?;
        let psg = factory.tone_generator(family.psg_mode());

        info!(
            "Sound core initialized: system 0x{:02X}, {:?} PSG, {:?} FM mixing",
            system.bits(),
            family.psg_mode(),
            config.mix_quality
        );

        let mut sound = Sound {
            system,
            family,
            config,
            fm: FmDriver::new(backend),
            psg,
            mixer: FrameMixer::new(config.fm_preamp, config.mix_quality),
            output,
        };
        sound.reset();
        Ok(sound)
    }

    /// Reset both chips and rewind all frame accounting
    ///
    /// The output sink keeps whatever it already holds.
    pub fn reset(&mut self) {
        self.fm.backend_mut().reset();
        self.psg.reset();
        self.psg.config(0, self.config.psg_preamp, PSG_PAN_CENTER);
        self.mixer.reset();
        self.fm.clear();
        debug!("Sound core reset ({})", self.fm.kind());
    }

    /// Close the frame at `cycles` and return the output samples now available
    ///
    /// Every frame mixes at least one FM sample. A frame no longer than the carry
    /// therefore raises the carry by `clock_ratio - cycles`; the next frame of
    /// normal length brings it back below one clock ratio.
    ///
    /// # Panics
    /// Panics if `cycles` is zero or exceeds [`MAX_FRAME_CYCLES`].
    pub fn update(&mut self, cycles: u32) -> usize {
        assert!(cycles > 0, "empty frame");
        assert!(
            cycles <= MAX_FRAME_CYCLES,
            "frame of {} cycles exceeds {}",
            cycles,
            MAX_FRAME_CYCLES
        );

        self.psg.end_frame(cycles, &mut self.output);

        // At least one sample is owed per frame, even one shorter than the clock ratio
        let start = self.fm.frame_start();
        self.fm.update(cycles.max(start + 1));

        let time = self.mixer.mix(
            self.fm.buffer().frames(),
            start,
            self.fm.clock_ratio(),
            cycles,
            &mut self.output,
        );
        let mixed = self.fm.buffer().len();
        self.fm.end_frame(time - cycles);

        self.output.end_frame(cycles);
        let available = self.output.samples_avail();
        trace!(
            "Frame of {} cycles: {} FM samples mixed, carry {}, {} output samples available",
            cycles,
            mixed,
            self.fm.frame_start(),
            available
        );
        available
    }

    /// Append the session state to `out`, returning the bytes written
    pub fn save(&self, out: &mut Vec<u8>) -> usize {
        self.layout()
            .write(out, self.fm.backend(), self.psg.as_ref(), self.fm.frame_start())
    }

    /// Restore a state written by [`save`](Self::save), returning the bytes consumed
    ///
    /// The blob is fully validated before anything is applied; a rejected blob leaves
    /// the session untouched.
    pub fn load(&mut self, state: &[u8]) -> Result<usize> {
        let saved = match self.layout().parse(state) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Save-state rejected: {}", e);
                return Err(e);
            }
        };

        let backend = self.fm.backend_mut();
        backend.load_context(saved.fm);
        backend.apply_config(&self.config);
        self.psg.load_context(saved.psg);
        self.fm.restore_phase(saved.carry);

        debug!(
            "Save-state loaded: {} bytes, {} backend, carry {}",
            saved.consumed,
            self.fm.kind(),
            saved.carry
        );
        Ok(saved.consumed)
    }

    /// Machine-initiated FM chip reset at `cycles`
    pub fn fm_reset(&mut self, cycles: u32) {
        self.fm.reset(cycles);
    }

    /// FM register write at `cycles`
    pub fn fm_write(&mut self, cycles: u32, address: u32, value: u32) {
        self.fm.write(cycles, address, value);
    }

    /// FM status read at `cycles`
    pub fn fm_read(&mut self, cycles: u32, address: u32) -> u32 {
        self.fm.read(cycles, address)
    }

    /// PSG data port write at `cycles`
    pub fn psg_write(&mut self, cycles: u32, data: u32) {
        self.psg.write(cycles, data);
    }

    fn layout(&self) -> StateLayout {
        StateLayout::new(
            self.family.has_backend_choice(),
            self.fm.backend(),
            self.psg.as_ref(),
        )
    }

    /// System hardware id the session was built for
    pub fn system(&self) -> SystemHw {
        self.system
    }

    /// Sound chip family
    pub fn family(&self) -> SoundFamily {
        self.family
    }

    /// Bound FM backend
    pub fn fm_kind(&self) -> FmKind {
        self.fm.kind()
    }

    /// Master clock cycles per FM sample
    pub fn clock_ratio(&self) -> u32 {
        self.fm.clock_ratio()
    }

    /// Carry into the current frame
    pub fn frame_start(&self) -> u32 {
        self.fm.frame_start()
    }

    /// FM driver state
    pub fn fm(&self) -> &FmDriver {
        &self.fm
    }

    /// Session configuration
    pub fn config(&self) -> &SoundConfig {
        &self.config
    }

    /// Output sink
    pub fn output(&self) -> &S {
        &self.output
    }

    /// Output sink (mutable, for draining)
    pub fn output_mut(&mut self) -> &mut S {
        &mut self.output
    }
}

impl<S: DeltaSink + std::fmt::Debug> std::fmt::Debug for Sound<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sound")
            .field("system", &self.system)
            .field("family", &self.family)
            .field("config", &self.config)
            .field("fm", &self.fm)
            .field("mixer", &self.mixer)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
