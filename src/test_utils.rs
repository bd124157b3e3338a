//! Test utilities: scripted stream connections and a header-sniffing
//! decode engine.
//!
//! These helpers stand in for the two external collaborators - the live
//! network connection and the JPEG decode engine - so adapter and
//! orchestration behavior can be exercised without either.
//!
//! # Usage
//!
//! ```
//! use jpeg_draw::test_utils::*;
//! use jpeg_draw::{DrawOptions, DrawRegion, Renderer, SourceDescriptor};
//!
//! # fn main() -> jpeg_draw::Result<()> {
//! let image = jpeg_header(320, 640);
//! let mut renderer = Renderer::new(SniffEngine::new());
//! let len = image.len() as u64;
//! let desc = SourceDescriptor::Stream { conn: ChunkedConn::new(image), len };
//! let status = renderer.draw(
//!     desc,
//!     &DrawRegion::new(0, 0, 320, 160),
//!     &DrawOptions::new(),
//!     &mut |_block| {},
//! )?;
//! assert!(status.is_complete());
//! # Ok(())
//! # }
//! ```

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{
    engine::{DecodeEngine, DecodeStatus, ImageInfo},
    error::{Error, Result},
    region::{PixelBlock, PixelOrder},
    scale::Scale,
    source::Source,
};

/// Connection that alternates empty polls with bounded data chunks
///
/// Each cycle reports `WouldBlock` for `stall` polls, then serves at
/// most `chunk` bytes. Once the data runs out it reports `Ok(0)`, the
/// end-of-data signal. Defaults: no stalls, unbounded chunks.
#[derive(Debug)]
pub struct ChunkedConn {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    stall: u32,
    countdown: u32,
    /// Total read calls observed, stalled or not
    pub reads: u32,
}

impl ChunkedConn {
    /// Serve `data`, immediately available in arbitrarily large chunks
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            chunk: usize::MAX,
            stall: 0,
            countdown: 0,
            reads: 0,
        }
    }

    /// Cap the bytes served per successful read
    pub fn chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Report `WouldBlock` this many times before every chunk
    pub fn stall(mut self, stall: u32) -> Self {
        self.stall = stall;
        self.countdown = stall;
        self
    }
}

impl Read for ChunkedConn {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reads += 1;
        if self.pos >= self.data.len() {
            return Ok(0);
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return Err(ErrorKind::WouldBlock.into());
        }
        self.countdown = self.stall;
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Connection that never has data available
#[derive(Debug, Default)]
pub struct StalledConn {
    /// Number of polls observed
    pub polls: u32,
}

impl Read for StalledConn {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        self.polls += 1;
        Err(ErrorKind::WouldBlock.into())
    }
}

/// Build a minimal JPEG header: SOI, one APP0 segment to skip over, an
/// SOF0 frame header carrying the given dimensions, and EOI
pub fn jpeg_header(width: u16, height: u16) -> Vec<u8> {
    let mut v = vec![0xFF, 0xD8];
    // APP0/JFIF, 16 bytes: gives the marker walk a segment to seek past
    v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    v.extend_from_slice(b"JFIF\0");
    v.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    // SOF0, single grayscale component
    v.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
    v.extend_from_slice(&height.to_be_bytes());
    v.extend_from_slice(&width.to_be_bytes());
    v.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    v.extend_from_slice(&[0xFF, 0xD9]);
    v
}

/// Is this a start-of-frame marker carrying image dimensions?
fn is_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Decode engine stand-in that reads real SOF dimensions and records
/// how it was driven
///
/// `open` walks the JPEG marker stream through the source's read and
/// seek capabilities, exactly as a real engine would, and reports the
/// dimensions from the first frame header. `decode` records its
/// arguments, emits one synthetic 16x16 block, and returns the scripted
/// verdict.
#[derive(Debug, Default)]
pub struct SniffEngine {
    /// Dimensions reported by the last `open`
    pub info: Option<ImageInfo>,
    /// Last configured output-unit cap
    pub max_output_units: Option<u32>,
    /// Pixel order, if the renderer overrode the default
    pub pixel_order: Option<PixelOrder>,
    /// Arguments of every `decode` call
    pub decoded: Vec<(u32, u32, Scale)>,
    /// When set, `decode` reports `Aborted`
    pub fail_decode: bool,
    /// Number of `close` calls
    pub closes: u32,
}

impl SniffEngine {
    /// Engine whose decodes complete
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose decodes abort (corrupt-stream stand-in)
    pub fn failing() -> Self {
        Self {
            fail_decode: true,
            ..Self::default()
        }
    }
}

impl DecodeEngine for SniffEngine {
    fn open<C: Read>(&mut self, source: &mut Source<C>) -> Result<ImageInfo> {
        let info = sniff_dimensions(source)?;
        self.info = Some(info);
        Ok(info)
    }

    fn set_max_output_units(&mut self, units: u32) {
        self.max_output_units = Some(units);
    }

    fn set_pixel_order(&mut self, order: PixelOrder) {
        self.pixel_order = Some(order);
    }

    fn decode<C: Read>(
        &mut self,
        _source: &mut Source<C>,
        x: u32,
        y: u32,
        scale: Scale,
        on_block: &mut dyn FnMut(&PixelBlock<'_>),
    ) -> DecodeStatus {
        self.decoded.push((x, y, scale));
        if self.fail_decode {
            return DecodeStatus::Aborted;
        }
        let pixels = [0u16; 16 * 16];
        on_block(&PixelBlock {
            x,
            y,
            width: 16,
            height: 16,
            pixels: &pixels,
        });
        DecodeStatus::Complete
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

/// Walk the marker stream until a frame header yields the dimensions
fn sniff_dimensions<C: Read>(source: &mut Source<C>) -> Result<ImageInfo> {
    let mut soi = [0u8; 2];
    source.read_exact(&mut soi)?;
    if soi != [0xFF, 0xD8] {
        return Err(Error::InvalidImage("missing SOI marker".into()));
    }

    let mut pos: u64 = 2;
    loop {
        let mut marker = [0u8; 2];
        source.read_exact(&mut marker)?;
        pos += 2;
        if marker[0] != 0xFF {
            return Err(Error::InvalidImage(format!(
                "expected marker at {}, found {:#04x}",
                pos - 2,
                marker[0]
            )));
        }
        if marker[1] == 0xD9 {
            return Err(Error::InvalidImage("no frame header before EOI".into()));
        }

        let len = source.read_u16::<BigEndian>()? as u64;
        pos += 2;
        if len < 2 {
            return Err(Error::InvalidImage(format!(
                "segment length {} too small at {}",
                len,
                pos - 2
            )));
        }
        if is_sof(marker[1]) {
            let _precision = source.read_u8()?;
            let height = source.read_u16::<BigEndian>()?;
            let width = source.read_u16::<BigEndian>()?;
            return Ok(ImageInfo {
                width: width as u32,
                height: height as u32,
            });
        }
        // Skip the segment payload through the source's seek capability
        pos = source.seek_to(pos + len - 2)?;
    }
}
