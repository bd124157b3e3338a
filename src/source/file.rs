//! File source adapter

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

/// A random-access file presented as a decode source
///
/// Reads and seeks pass straight through to the filesystem. The handle
/// is released when the source is dropped (or consumed by
/// [`Source::close`](crate::Source::close)).
#[derive(Debug)]
pub struct FileSource {
    file: File,
    len: u64,
}

impl FileSource {
    /// Open a file and record its total size
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();
        log::debug!("opened file source: {:?} ({} bytes)", path.as_ref(), len);
        Ok(Self { file, len })
    }

    /// Total file size in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True if the file is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Seek to an absolute byte position
    pub fn seek_to(&mut self, pos: u64) -> std::io::Result<u64> {
        self.file.seek(SeekFrom::Start(pos))
    }
}

impl Read for FileSource {
    // Pass-through read; short at end of file, which is not an error
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(data).unwrap();
        path
    }

    #[test]
    fn open_reports_exact_size() {
        let path = temp_file("jpeg_draw_file_size.bin", &[7u8; 321]);
        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.len(), 321);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn read_round_trips_bytes() {
        let data: Vec<u8> = (0u8..=255).collect();
        let path = temp_file("jpeg_draw_file_roundtrip.bin", &data);

        let mut source = FileSource::open(&path).unwrap();
        let mut back = Vec::new();
        source.read_to_end(&mut back).unwrap();
        assert_eq!(back, data);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn seek_then_read_tail() {
        let data: Vec<u8> = (0u8..32).collect();
        let path = temp_file("jpeg_draw_file_seek.bin", &data);

        let mut source = FileSource::open(&path).unwrap();
        source.seek_to(24).unwrap();
        let mut tail = Vec::new();
        source.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, &data[24..]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_path_fails_to_open() {
        assert!(FileSource::open("/nonexistent/jpeg_draw.jpg").is_err());
    }
}
