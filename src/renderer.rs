//! Draw orchestration
//!
//! Owns the decode engine and runs the open, fit, configure, decode,
//! close sequence for one image per call.

use std::io::Read;

use crate::{
    engine::{DecodeEngine, DecodeStatus},
    error::Result,
    region::{DrawRegion, PixelBlock, PixelOrder},
    scale::fit_scale,
    source::{Source, SourceDescriptor, StreamOptions},
};

/// Per-draw configuration
///
/// # Example
///
/// ```
/// use jpeg_draw::{DrawOptions, PixelOrder};
///
/// let opts = DrawOptions::new().pixel_order(PixelOrder::Rgb565BigEndian);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    /// Byte order of emitted pixels
    pub pixel_order: PixelOrder,
    /// Retry policy for stream-backed sources
    pub stream: StreamOptions,
}

impl DrawOptions {
    /// Create options with the engine's default pixel order and the
    /// default stream retry budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order of emitted pixels
    pub fn pixel_order(mut self, order: PixelOrder) -> Self {
        self.pixel_order = order;
        self
    }

    /// Set the retry policy for stream-backed sources
    pub fn stream(mut self, stream: StreamOptions) -> Self {
        self.stream = stream;
        self
    }
}

/// Drives one decode engine through complete draw calls
///
/// The renderer owns its engine; multiple renderers are fully
/// independent. A draw needs `&mut self` for the whole open-through-close
/// sequence, so at most one decode is ever in flight per engine.
///
/// # Example
///
/// ```no_run
/// use jpeg_draw::{DrawOptions, DrawRegion, Renderer, SourceDescriptor};
/// use jpeg_draw::test_utils::SniffEngine;
///
/// # fn main() -> jpeg_draw::Result<()> {
/// let mut renderer = Renderer::new(SniffEngine::new());
/// let status = renderer.draw(
///     SourceDescriptor::file("photo.jpg"),
///     &DrawRegion::new(0, 0, 320, 160),
///     &DrawOptions::new(),
///     &mut |block| {
///         // composite block.pixels to the display, clipped to the region
///         let _ = block;
///     },
/// )?;
/// assert!(status.is_complete());
/// # Ok(())
/// # }
/// ```
pub struct Renderer<E> {
    engine: E,
}

impl<E: DecodeEngine> Renderer<E> {
    /// Create a renderer around a decode engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Get a reference to the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a mutable reference to the engine
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Unwrap the renderer, returning the engine
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Decode one image into the region, reporting the engine's verdict
    ///
    /// Opens the source, fits the image height to the region's budget,
    /// caps the engine's output units, applies the pixel order if
    /// big-endian output was requested, then decodes at the region
    /// origin. The engine's [`DecodeStatus`] is propagated verbatim.
    ///
    /// The source is closed on every path; `Err` means the source or
    /// header could not be opened and decoding was never attempted.
    pub fn draw<C: Read>(
        &mut self,
        desc: SourceDescriptor<C>,
        region: &DrawRegion,
        opts: &DrawOptions,
        on_block: &mut dyn FnMut(&PixelBlock<'_>),
    ) -> Result<DecodeStatus> {
        let mut source = Source::open(desc, &opts.stream)?;
        let result = self.run(&mut source, region, opts, on_block);
        self.engine.close();
        source.close();
        result
    }

    /// Decode one image into the region, discarding the engine's verdict
    ///
    /// Simplified synchronous path for callers that do not need the
    /// engine's success/failure reporting: the decode still runs for its
    /// side effect of emitting blocks, but the verdict is deliberately
    /// dropped and the call reports `Ok(())` whenever the source opened.
    /// A draw callback that must observe failures has to signal them
    /// out of band. Use [`draw`](Renderer::draw) to get the verdict.
    pub fn quick_draw<C: Read>(
        &mut self,
        desc: SourceDescriptor<C>,
        region: &DrawRegion,
        opts: &DrawOptions,
        on_block: &mut dyn FnMut(&PixelBlock<'_>),
    ) -> Result<()> {
        let status = self.draw(desc, region, opts, on_block)?;
        if !status.is_complete() {
            log::debug!("quick_draw: decode did not complete (verdict discarded)");
        }
        Ok(())
    }

    fn run<C: Read>(
        &mut self,
        source: &mut Source<C>,
        region: &DrawRegion,
        opts: &DrawOptions,
        on_block: &mut dyn FnMut(&PixelBlock<'_>),
    ) -> Result<DecodeStatus> {
        let info = self.engine.open(source)?;
        let plan = fit_scale(info.height, region.width, region.height);
        log::debug!(
            "image {}x{} into {}x{}: {} scale, {} unit cap",
            info.width,
            info.height,
            region.width,
            region.height,
            plan.scale,
            plan.max_output_units
        );

        self.engine.set_max_output_units(plan.max_output_units);
        // The engine's native order is little-endian; only override it
        if opts.pixel_order == PixelOrder::Rgb565BigEndian {
            self.engine.set_pixel_order(PixelOrder::Rgb565BigEndian);
        }

        let status = self
            .engine
            .decode(source, region.x, region.y, plan.scale, on_block);
        log::debug!("decode finished: {:?}", status);
        Ok(status)
    }
}
