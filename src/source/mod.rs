//! Pluggable decode sources
//!
//! A [`Source`] presents one read/seek/close interface to the decode
//! engine regardless of the backing store. The adapter choice is a
//! tagged variant resolved once at open time from a [`SourceDescriptor`].

mod file;
mod stream;

pub use file::FileSource;
pub use stream::{StreamOptions, StreamSource};

use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Caller-provided identification of which backing store to open
///
/// The connection type `C` can be any [`Read`] implementation; pass
/// `&mut conn` to keep ownership of the connection with the caller.
/// File-only callers can pin the connection type with
/// [`SourceDescriptor::file`].
#[derive(Debug)]
pub enum SourceDescriptor<C> {
    /// Live stream decoded incrementally, with its declared byte length
    Stream {
        /// The network connection
        conn: C,
        /// Total encoded image size in bytes
        len: u64,
    },
    /// Live stream prefetched fully into memory before decoding
    ///
    /// Used when the encoded image is known to fit in RAM and buffered
    /// decoding is preferred over incremental reads.
    BufferedStream {
        /// The network connection
        conn: C,
        /// Exact number of bytes to prefetch
        len: usize,
    },
    /// File on local storage
    Path(PathBuf),
}

impl SourceDescriptor<std::io::Empty> {
    /// Describe a file source without naming a stream connection type
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self::Path(path.into())
    }
}

/// An opened decode source: stream-backed, file-backed, or in-memory
///
/// One capability set - read, absolute seek, length, close - over all
/// variants. The `Memory` variant backs buffered-stream decoding, where
/// the whole encoded image was prefetched at open time.
#[derive(Debug)]
pub enum Source<C> {
    /// Live stream with bounded-retry reads and forward-only seeks
    Stream(StreamSource<C>),
    /// Random-access file
    File(FileSource),
    /// Prefetched in-memory image
    Memory(Cursor<Vec<u8>>),
}

impl<C: Read> Source<C> {
    /// Open the backing store named by a descriptor
    ///
    /// For a [`SourceDescriptor::BufferedStream`], the declared length is
    /// prefetched through the bounded-retry read; a short prefetch aborts
    /// the open with [`Error::TruncatedPrefetch`] rather than handing the
    /// engine a truncated image.
    pub fn open(desc: SourceDescriptor<C>, opts: &StreamOptions) -> Result<Self> {
        match desc {
            SourceDescriptor::Stream { conn, len } => {
                log::debug!("opened stream source ({} bytes declared)", len);
                Ok(Self::Stream(StreamSource::new(conn, len, opts.clone())))
            }
            SourceDescriptor::BufferedStream { conn, len } => {
                let mut stream = StreamSource::new(conn, len as u64, opts.clone());
                let mut buf = vec![0u8; len];
                let got = stream.fill(&mut buf)?;
                if got < len {
                    log::warn!("prefetch fell short: {} of {} bytes", got, len);
                    return Err(Error::TruncatedPrefetch { wanted: len, got });
                }
                log::debug!("prefetched stream source ({} bytes)", len);
                Ok(Self::Memory(Cursor::new(buf)))
            }
            SourceDescriptor::Path(path) => Ok(Self::File(FileSource::open(path)?)),
        }
    }

    /// Seek to an absolute byte position
    ///
    /// Streams only move forward (the delta is read and discarded) and
    /// reject backward targets; files and memory seek directly. Returns
    /// the position reached.
    pub fn seek_to(&mut self, pos: u64) -> Result<u64> {
        match self {
            Self::Stream(s) => s.skip_to(pos),
            Self::File(f) => Ok(f.seek_to(pos)?),
            Self::Memory(m) => Ok(m.seek(SeekFrom::Start(pos))?),
        }
    }

    /// Total byte length of the source
    ///
    /// The declared length for streams, the file size for files, the
    /// buffer size for prefetched images.
    pub fn len(&self) -> u64 {
        match self {
            Self::Stream(s) => s.len(),
            Self::File(f) => f.len(),
            Self::Memory(m) => m.get_ref().len() as u64,
        }
    }

    /// True if the source holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the source
    ///
    /// Consuming the source guarantees close happens exactly once. File
    /// handles are released here; stream connections are left untouched,
    /// their lifecycle belongs to the caller.
    pub fn close(self) {}
}

impl<C: Read> Read for Source<C> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Stream(s) => s.read(buf),
            Self::File(f) => f.read(buf),
            Self::Memory(m) => m.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ChunkedConn;
    use std::time::Duration;

    fn immediate() -> StreamOptions {
        StreamOptions::new().poll_delay(Duration::ZERO)
    }

    #[test]
    fn buffered_stream_prefetches_into_memory() {
        let data: Vec<u8> = (0u8..64).collect();
        let desc = SourceDescriptor::BufferedStream {
            conn: ChunkedConn::new(data.clone()).chunk(16).stall(2),
            len: 64,
        };
        let mut source = Source::open(desc, &immediate()).unwrap();
        assert!(matches!(source, Source::Memory(_)));
        assert_eq!(source.len(), 64);

        let mut back = Vec::new();
        source.read_to_end(&mut back).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn short_prefetch_aborts_open() {
        let desc = SourceDescriptor::BufferedStream {
            conn: ChunkedConn::new(vec![1u8; 40]),
            len: 64,
        };
        match Source::open(desc, &immediate()) {
            Err(Error::TruncatedPrefetch { wanted: 64, got: 40 }) => {}
            other => panic!("expected TruncatedPrefetch, got {:?}", other),
        }
    }

    #[test]
    fn memory_source_seeks_anywhere() {
        let desc = SourceDescriptor::BufferedStream {
            conn: ChunkedConn::new((0u8..32).collect()),
            len: 32,
        };
        let mut source = Source::open(desc, &immediate()).unwrap();
        source.seek_to(24).unwrap();
        let mut buf = [0u8; 4];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [24, 25, 26, 27]);
        // Memory sources support backward seeks, unlike live streams
        source.seek_to(0).unwrap();
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0, 1, 2, 3]);
    }
}
