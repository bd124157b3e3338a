//! Decode engine contract
//!
//! The engine owns JPEG bitstream parsing and block emission; this crate
//! only opens sources for it, picks the scale, and drives the lifecycle.
//! All engine I/O goes through the [`Source`] it is handed - the source's
//! read/seek/close capabilities are resolved once at open time rather
//! than per call.

use std::io::Read;

use crate::{
    error::Result,
    region::{PixelBlock, PixelOrder},
    scale::Scale,
    source::Source,
};

/// Intrinsic image dimensions, known once the header has been parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
}

/// The engine's verdict for one decode pass
///
/// A verdict is data, not an error: [`Renderer::draw`](crate::Renderer::draw)
/// propagates it verbatim and [`Renderer::quick_draw`](crate::Renderer::quick_draw)
/// deliberately discards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Every requested block was decoded and emitted
    Complete,
    /// The engine gave up mid-image (corrupt data or exhausted input)
    Aborted,
}

impl DecodeStatus {
    /// True if the decode ran to completion
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Interface to an external JPEG decode engine
///
/// Call order per image: [`open`](DecodeEngine::open) (parses the header,
/// after which intrinsic dimensions are known), the configuration setters,
/// [`decode`](DecodeEngine::decode), then [`close`](DecodeEngine::close).
/// An engine instance decodes at most one image at a time; the renderer
/// enforces this by requiring `&mut` access for the whole sequence.
pub trait DecodeEngine {
    /// Parse the image header from an opened source
    ///
    /// The engine reads (and may seek) through `source` to locate the
    /// frame header. Returns the intrinsic dimensions used for scale
    /// selection.
    fn open<C: Read>(&mut self, source: &mut Source<C>) -> Result<ImageInfo>;

    /// Cap the number of output units decoded per internal pass
    ///
    /// Bounds the engine's peak scratch-buffer memory.
    fn set_max_output_units(&mut self, units: u32);

    /// Select the byte order of emitted RGB565 pixels
    fn set_pixel_order(&mut self, order: PixelOrder);

    /// Decode the image at the given origin and scale
    ///
    /// Emits one [`PixelBlock`] per decoded unit to `on_block`. Short
    /// reads from the source are treated as exhausted input and end the
    /// pass with [`DecodeStatus::Aborted`].
    fn decode<C: Read>(
        &mut self,
        source: &mut Source<C>,
        x: u32,
        y: u32,
        scale: Scale,
        on_block: &mut dyn FnMut(&PixelBlock<'_>),
    ) -> DecodeStatus;

    /// Release any per-image engine state
    fn close(&mut self);
}
