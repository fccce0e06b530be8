//! Save-state layout
//!
//! A blob is a plain concatenation, with every integer little-endian:
//!
//! | Field            | Size                  | Present                  |
//! |------------------|-----------------------|--------------------------|
//! | FM discriminator | 1                     | Mega Drive family only   |
//! | FM backend block | backend context size  | always                   |
//! | PSG block        | generator context size| always                   |
//! | Frame start carry| 4                     | always                   |
//!
//! The layout is only stable for a given backend; blobs are not portable across
//! backend choices.

use crate::backend::ToneGenerator;
use crate::fm::{FmBackend, FmKind};
use crate::{Result, SoundError};
use nom::bytes::complete::take;
use nom::combinator::cond;
use nom::number::complete::{le_u32, le_u8};
use nom::sequence::tuple;
use nom::IResult;
use num_traits::{FromPrimitive, ToPrimitive};

/// Sizes of every block for the live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    /// Backend written as the leading byte, if the family has a backend choice
    pub discriminator: Option<FmKind>,
    /// FM backend block size
    pub fm_size: usize,
    /// PSG block size
    pub psg_size: usize,
}

/// Borrowed view of a validated blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedState<'a> {
    /// FM backend block
    pub fm: &'a [u8],
    /// PSG block
    pub psg: &'a [u8],
    /// Frame start carry
    pub carry: u32,
    /// Bytes of the input that belong to the state
    pub consumed: usize,
}

impl StateLayout {
    /// Layout of the given backend and generator
    pub fn new(with_discriminator: bool, fm: &FmBackend, psg: &dyn ToneGenerator) -> Self {
        StateLayout {
            discriminator: with_discriminator.then(|| fm.kind()),
            fm_size: fm.context_size(),
            psg_size: psg.context_size(),
        }
    }

    /// Total blob size
    pub fn size(&self) -> usize {
        usize::from(self.discriminator.is_some()) + self.fm_size + self.psg_size + 4
    }

    /// Append a blob to `out`, returning the bytes written
    pub fn write(
        &self,
        out: &mut Vec<u8>,
        fm: &FmBackend,
        psg: &dyn ToneGenerator,
        carry: u32,
    ) -> usize {
        let start = out.len();
        if let Some(kind) = self.discriminator {
            out.push(kind.to_u8().unwrap_or_default());
        }
        fm.save_context(out);
        psg.save_context(out);
        out.extend_from_slice(&carry.to_le_bytes());

        let written = out.len() - start;
        debug_assert_eq!(written, self.size(), "context size changed while saving");
        written
    }

    /// Validate `input` against this layout without touching any live state
    ///
    /// The discriminator is checked first so a blob from another backend reports a
    /// mismatch rather than a size error. Trailing bytes are left to the caller.
    pub fn parse<'a>(&self, input: &'a [u8]) -> Result<SavedState<'a>> {
        let short = || SoundError::StateSize {
            expected: self.size(),
            actual: input.len(),
        };

        let (rest, saved) = discriminator(input, self.discriminator.is_some())
            .map_err(|_| short())?;
        if let (Some(active), Some(saved)) = (self.discriminator, saved) {
            if FmKind::from_u8(saved) != Some(active) {
                return Err(SoundError::BackendMismatch { saved, active });
            }
        }

        let (rest, (fm, psg, carry)) = self.blocks(rest).map_err(|_| short())?;
        Ok(SavedState {
            fm,
            psg,
            carry,
            consumed: input.len() - rest.len(),
        })
    }

    fn blocks<'a>(&self, input: &'a [u8]) -> IResult<&'a [u8], (&'a [u8], &'a [u8], u32)> {
        tuple((take(self.fm_size), take(self.psg_size), le_u32))(input)
    }
}

fn discriminator(input: &[u8], present: bool) -> IResult<&[u8], Option<u8>> {
    cond(present, le_u8)(input)
}
