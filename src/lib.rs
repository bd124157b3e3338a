//! Memory-bounded JPEG draw orchestration with pluggable stream and
//! file sources.
//!
//! This crate decodes a JPEG image from a live network stream or a local
//! file into a caller-supplied rectangular region, automatically picking
//! the downscale factor that fits the image into the region's height
//! budget without blowing the decode engine's per-call buffer cap. It
//! targets memory-constrained hosts where the full image does not fit in
//! RAM at native resolution and where the source may stall.
//!
//! # Design Principles
//!
//! - **Bounded waits**: stream reads poll with a fixed retry budget and
//!   never block indefinitely; a stalled source surfaces as a short read
//! - **Bounded memory**: the scale ladder caps the engine's output units
//!   in proportion to the downscale, holding peak scratch memory level
//! - **Source agnostic**: stream, file, and prefetched-memory backing
//!   stores present one read/seek/close interface, resolved at open time
//!
//! # Quick Start
//!
//! ```no_run
//! use jpeg_draw::{DrawOptions, DrawRegion, Renderer, SourceDescriptor};
//! use jpeg_draw::test_utils::SniffEngine;
//!
//! # fn main() -> jpeg_draw::Result<()> {
//! // The engine is any DecodeEngine implementation; the renderer owns it
//! let mut renderer = Renderer::new(SniffEngine::new());
//!
//! // Decode a file into a 320x160 region at the display origin
//! let status = renderer.draw(
//!     SourceDescriptor::file("photo.jpg"),
//!     &DrawRegion::new(0, 0, 320, 160),
//!     &DrawOptions::new(),
//!     &mut |block| {
//!         // composite block.pixels to the display, clipped to the region
//!         let _ = block;
//!     },
//! )?;
//! assert!(status.is_complete());
//! # Ok(())
//! # }
//! ```
//!
//! # Streams
//!
//! A stream source wraps any [`std::io::Read`] connection. Non-blocking
//! semantics apply: `Err(WouldBlock)` means no data is buffered yet and
//! counts against the retry budget, `Ok(0)` means the peer is done.
//! Seeks only move forward, by reading and discarding the delta.
//!
//! ```no_run
//! use jpeg_draw::{DrawOptions, DrawRegion, Renderer, SourceDescriptor};
//! use jpeg_draw::test_utils::SniffEngine;
//! use std::net::TcpStream;
//!
//! # fn main() -> jpeg_draw::Result<()> {
//! let mut conn = TcpStream::connect("camera.local:80")?;
//! conn.set_nonblocking(true)?;
//!
//! let mut renderer = Renderer::new(SniffEngine::new());
//! renderer.draw(
//!     // &mut keeps connection ownership with the caller
//!     SourceDescriptor::Stream { conn: &mut conn, len: 48_000 },
//!     &DrawRegion::new(0, 0, 320, 240),
//!     &DrawOptions::new(),
//!     &mut |_block| {},
//! )?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod region;
mod renderer;
mod scale;
mod source;

pub use engine::{DecodeEngine, DecodeStatus, ImageInfo};
pub use error::{Error, Result};
pub use region::{DrawRegion, PixelBlock, PixelOrder};
pub use renderer::{DrawOptions, Renderer};
pub use scale::{fit_scale, Scale, ScalePlan};
pub use source::{FileSource, Source, SourceDescriptor, StreamOptions, StreamSource};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
