//! Stream source adapter
//!
//! Presents a live network byte stream as a readable, forward-seekable
//! source. The underlying connection delivers data incrementally, so
//! reads poll with a bounded retry budget instead of blocking forever.

use std::io::{ErrorKind, Read};
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Retry policy for stream reads
///
/// A read polls the connection until the buffer is full, the connection
/// reports end of data, or `max_stalls` consecutive empty polls have
/// elapsed. Worst-case wait per read is `max_stalls * poll_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use jpeg_draw::StreamOptions;
///
/// let opts = StreamOptions::new()
///     .poll_delay(Duration::from_millis(50))
///     .max_stalls(20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    /// Delay between empty polls
    pub poll_delay: Duration,
    /// Consecutive empty polls before a read gives up
    pub max_stalls: u32,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_millis(100),
            max_stalls: 10,
        }
    }
}

impl StreamOptions {
    /// Create options with the default retry budget (100 ms, 10 polls)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between empty polls
    pub fn poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    /// Set the number of consecutive empty polls before giving up
    pub fn max_stalls(mut self, max_stalls: u32) -> Self {
        self.max_stalls = max_stalls;
        self
    }
}

/// A live byte stream presented as a decode source
///
/// The connection `C` is any [`Read`] implementation. Availability maps
/// to standard non-blocking semantics: `Ok(n > 0)` delivers data,
/// `Err(WouldBlock)` means nothing is buffered yet, and `Ok(0)` means
/// the peer is done sending. The adapter never owns the connection's
/// lifecycle - pass `&mut conn` to keep ownership with the caller.
#[derive(Debug)]
pub struct StreamSource<C> {
    conn: C,
    pos: u64,
    len: u64,
    opts: StreamOptions,
}

impl<C: Read> StreamSource<C> {
    /// Wrap a connection with a declared total byte length
    pub fn new(conn: C, len: u64, opts: StreamOptions) -> Self {
        Self {
            conn,
            pos: 0,
            len,
            opts,
        }
    }

    /// Bytes consumed from the stream so far
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Declared total byte length of the stream
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True if the stream was declared empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fill `buf` from the connection with bounded retries
    ///
    /// Returns the number of bytes transferred, which may be short (or
    /// zero) if the stall budget ran out or the peer stopped sending.
    /// A short read is not an error; the decode engine interprets it as
    /// exhausted input.
    pub fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        let mut stalls = 0;
        while filled < buf.len() && stalls < self.opts.max_stalls {
            match self.conn.read(&mut buf[filled..]) {
                // Peer is done sending
                Ok(0) => break,
                Ok(n) => {
                    // Reset the stall counter once data arrives
                    stalls = 0;
                    filled += n;
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(self.opts.poll_delay);
                    stalls += 1;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        if stalls >= self.opts.max_stalls {
            log::warn!(
                "stream read gave up after {} empty polls ({} of {} bytes)",
                stalls,
                filled,
                buf.len()
            );
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    /// Advance to an absolute position by discarding bytes
    ///
    /// The stream has no native seek; the position delta is read and
    /// dropped through the same bounded-retry primitive. Seeking to the
    /// current position is a no-op; seeking backward is rejected.
    /// Returns the position actually reached, which falls short of the
    /// target if the stream stalled out.
    pub fn skip_to(&mut self, pos: u64) -> Result<u64> {
        if pos < self.pos {
            return Err(Error::BackwardSeek {
                from: self.pos,
                to: pos,
            });
        }
        let mut scratch = [0u8; 512];
        while self.pos < pos {
            let want = ((pos - self.pos) as usize).min(scratch.len());
            let got = self.fill(&mut scratch[..want])?;
            if got == 0 {
                break;
            }
        }
        Ok(self.pos)
    }

    /// Unwrap the adapter, returning the connection
    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C: Read> Read for StreamSource<C> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.fill(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ChunkedConn, StalledConn};

    fn immediate() -> StreamOptions {
        StreamOptions::new().poll_delay(Duration::ZERO)
    }

    #[test]
    fn stalled_stream_gives_up_after_budget() {
        let mut stream = StreamSource::new(StalledConn::default(), 64, immediate());
        let mut buf = [0u8; 8];
        let got = stream.fill(&mut buf).unwrap();
        assert_eq!(got, 0, "nothing should arrive from a stalled stream");
        assert_eq!(stream.into_inner().polls, 10, "exactly one poll per stall");
    }

    #[test]
    fn stall_counter_resets_on_data() {
        // Three empty polls before every 4-byte chunk: 9 stalls in total,
        // but never more than 3 in a row, so a budget of 5 still succeeds.
        let conn = ChunkedConn::new((0u8..12).collect()).chunk(4).stall(3);
        let mut stream = StreamSource::new(conn, 12, immediate().max_stalls(5));
        let mut buf = [0u8; 12];
        let got = stream.fill(&mut buf).unwrap();
        assert_eq!(got, 12);
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn short_read_when_stalls_exceed_budget() {
        let conn = ChunkedConn::new((0u8..12).collect()).chunk(4).stall(3);
        let mut stream = StreamSource::new(conn, 12, immediate().max_stalls(3));
        let mut buf = [0u8; 12];
        let got = stream.fill(&mut buf).unwrap();
        assert!(got < 12, "three consecutive stalls must end the read");
    }

    #[test]
    fn skip_consumes_exact_delta() {
        let conn = ChunkedConn::new((0u8..100).collect());
        let mut stream = StreamSource::new(conn, 100, immediate());
        assert_eq!(stream.skip_to(40).unwrap(), 40);
        let mut buf = [0u8; 4];
        stream.fill(&mut buf).unwrap();
        assert_eq!(buf, [40, 41, 42, 43]);
        assert_eq!(stream.position(), 44);
    }

    #[test]
    fn skip_to_current_position_is_noop() {
        let conn = ChunkedConn::new((0u8..8).collect());
        let mut stream = StreamSource::new(conn, 8, immediate());
        assert_eq!(stream.skip_to(0).unwrap(), 0);
        assert_eq!(stream.into_inner().reads, 0);
    }

    #[test]
    fn backward_seek_rejected() {
        let conn = ChunkedConn::new((0u8..16).collect());
        let mut stream = StreamSource::new(conn, 16, immediate());
        stream.skip_to(8).unwrap();
        match stream.skip_to(4) {
            Err(Error::BackwardSeek { from: 8, to: 4 }) => {}
            other => panic!("expected BackwardSeek, got {:?}", other),
        }
    }

    #[test]
    fn skip_stops_short_on_exhausted_stream() {
        let conn = ChunkedConn::new((0u8..10).collect());
        let mut stream = StreamSource::new(conn, 10, immediate());
        assert_eq!(stream.skip_to(50).unwrap(), 10);
    }
}
