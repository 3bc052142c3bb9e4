use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::error::DecodeError;

/// Bytes requested from the reader per call.
const READ_CHUNK: usize = 8 * 1024;

/// One open, seekable input and its read position.
///
/// A `ByteSource` owns its reader. Dropping it releases the underlying
/// handle, so the handle is closed on every exit path: normal return,
/// early return, or an error propagated with `?`. [`release`](Self::release)
/// does the same thing explicitly.
///
/// ```text
/// ┌──────────┬───────────────────────────────────────────────┐
/// │ Field    │ Meaning                                       │
/// ├──────────┼───────────────────────────────────────────────┤
/// │ name     │ Path or label, used only for diagnostics      │
/// │ len      │ Total length when the medium reports one      │
/// │ offset   │ Bytes consumed so far; always <= len if known │
/// └──────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub struct ByteSource<R> {
    name: String,
    inner: R,
    len: Option<u64>,
    offset: u64,
}

impl ByteSource<File> {
    /// Open a file read-only. Files are always read as raw bytes.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::NotFound`] if the path does not exist.
    /// - [`DecodeError::PermissionDenied`] if it cannot be opened for reading.
    /// - [`DecodeError::Io`] for anything else, with the OS error as source.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DecodeError::from_io(path, e))?;

        // Pipes and character devices report no useful length.
        let metadata = file.metadata().map_err(|e| DecodeError::from_io(path, e))?;
        let len = metadata.is_file().then(|| metadata.len());

        debug!("opened {} ({len:?} bytes)", path.display());
        Ok(Self {
            name: path.display().to_string(),
            inner: file,
            len,
            offset: 0,
        })
    }
}

impl ByteSource<Cursor<Vec<u8>>> {
    /// An in-memory source. `name` only appears in diagnostics.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let len = bytes.len() as u64;
        Self {
            name: name.into(),
            inner: Cursor::new(bytes),
            len: Some(len),
            offset: 0,
        }
    }
}

impl<R: Read + Seek> ByteSource<R> {
    /// Wrap any seekable reader. The reader's current position becomes
    /// the source's starting offset.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Io`] if the reader cannot report its position or
    /// length.
    pub fn new(name: impl Into<String>, mut inner: R) -> Result<Self, DecodeError> {
        let name = name.into();
        let measure = |inner: &mut R| -> io::Result<(u64, u64)> {
            let offset = inner.stream_position()?;
            let len = inner.seek(SeekFrom::End(0))?;
            inner.seek(SeekFrom::Start(offset))?;
            Ok((offset, len))
        };
        let (offset, len) = measure(&mut inner).map_err(|source| DecodeError::Io {
            name: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            inner,
            len: Some(len),
            offset: offset.min(len),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total length, if known.
    pub fn len(&self) -> Option<u64> {
        self.len
    }

    /// True when the length is known to be zero.
    pub fn is_empty(&self) -> bool {
        self.len == Some(0)
    }

    /// Current read position.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes left before the end, if the length is known.
    pub fn remaining(&self) -> Option<u64> {
        self.len.map(|len| len.saturating_sub(self.offset))
    }

    /// Read exactly `count` bytes from the current offset.
    ///
    /// The offset advances by the number of bytes actually read, even on
    /// failure. A short read is never returned as data. Memory grows with
    /// the bytes actually delivered, so an oversized `count` against a
    /// small input costs no more than the input itself.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Truncated`] if the input ends after `actual < count`
    ///   bytes.
    /// - [`DecodeError::Io`] if the medium reports an error mid-read; the
    ///   original error is the source. Interrupted reads are resumed.
    pub fn read_exact(&mut self, count: usize) -> Result<Vec<u8>, DecodeError> {
        let buf = self.fill(count)?;
        debug!("{}: read {}/{count} bytes", self.name, buf.len());

        if buf.len() < count {
            return Err(DecodeError::Truncated {
                expected: count,
                actual: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Read everything from the current offset to end of input.
    ///
    /// Works whether or not the length is known up front, so pipes and
    /// character devices read completely.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Io`] if the medium reports an error mid-read.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>, DecodeError> {
        let buf = self.fill(usize::MAX)?;
        debug!("{}: read {} bytes to end", self.name, buf.len());
        Ok(buf)
    }

    /// Move the read position to an absolute offset.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::SeekOutOfRange`] if `offset` is past a known length.
    /// - [`DecodeError::Io`] if the underlying seek fails.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), DecodeError> {
        if let Some(len) = self.len
            && offset > len
        {
            return Err(DecodeError::SeekOutOfRange { offset, len });
        }
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|source| DecodeError::Io {
                name: self.name.clone(),
                source,
            })?;
        self.offset = offset;
        Ok(())
    }

    /// Give the underlying reader back, ending this source's ownership.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Close the input now. Equivalent to dropping the source.
    pub fn release(self) {
        debug!("released {}", self.name);
    }

    /// Read up to `limit` bytes, stopping early at end of input.
    fn fill(&mut self, limit: usize) -> Result<Vec<u8>, DecodeError> {
        let known = self
            .remaining()
            .map_or(READ_CHUNK, |r| usize::try_from(r).unwrap_or(usize::MAX));
        let mut buf = Vec::with_capacity(limit.min(known));
        let mut chunk = [0u8; READ_CHUNK];

        while buf.len() < limit {
            let want = (limit - buf.len()).min(READ_CHUNK);
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&chunk[..n]);
                    self.advance(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(DecodeError::Io {
                        name: self.name.clone(),
                        source,
                    });
                }
            }
        }
        Ok(buf)
    }

    fn advance(&mut self, n: usize) {
        self.offset += n as u64;
        // The file grew under us; keep offset <= len.
        if let Some(len) = self.len.as_mut()
            && self.offset > *len
        {
            *len = self.offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    /// Reader that yields a fixed prefix, then fails.
    struct FailingReader {
        prefix: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.prefix.read(buf)? {
                0 => Err(io::Error::other("medium error")),
                n => Ok(n),
            }
        }
    }

    impl Seek for FailingReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.prefix.seek(pos)
        }
    }

    /// Reader that returns `Interrupted` before every successful read.
    struct InterruptingReader {
        inner: Cursor<Vec<u8>>,
        interrupt_next: bool,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt_next = !self.interrupt_next;
            if self.interrupt_next {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = buf.len().min(3);
            self.inner.read(&mut buf[..n])
        }
    }

    impl Seek for InterruptingReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn read_exact_advances_offset() {
        let mut source = ByteSource::from_bytes("mem", vec![1u8, 2, 3, 4, 5]);
        assert_eq!(source.read_exact(2).unwrap(), [1, 2]);
        assert_eq!(source.offset(), 2);
        assert_eq!(source.remaining(), Some(3));
        assert_eq!(source.read_exact(3).unwrap(), [3, 4, 5]);
        assert_eq!(source.remaining(), Some(0));
    }

    #[test]
    fn short_read_is_truncated() {
        let mut source = ByteSource::from_bytes("mem", vec![0u8; 10]);
        let result = source.read_exact(32);
        assert!(matches!(
            result,
            Err(DecodeError::Truncated {
                expected: 32,
                actual: 10
            })
        ));
        assert_eq!(source.offset(), 10);
        assert_eq!(source.len(), Some(10));
    }

    #[test]
    fn oversized_count_is_truncated_not_allocated() {
        let mut source = ByteSource::from_bytes("mem", vec![7u8; 10]);
        let result = source.read_exact(usize::MAX);
        assert!(matches!(
            result,
            Err(DecodeError::Truncated {
                expected: usize::MAX,
                actual: 10
            })
        ));
        assert_eq!(source.offset(), 10);
    }

    #[test]
    fn read_spanning_several_chunks() {
        let bytes: Vec<u8> = (0..3 * READ_CHUNK + 5).map(|i| (i % 256) as u8).collect();
        let mut source = ByteSource::from_bytes("big", bytes.clone());
        assert_eq!(source.read_exact(bytes.len()).unwrap(), bytes);
    }

    #[test]
    fn read_to_end_takes_the_rest() {
        let mut source = ByteSource::from_bytes("mem", (0u8..10).collect::<Vec<_>>());
        source.read_exact(4).unwrap();
        assert_eq!(source.read_to_end().unwrap(), [4, 5, 6, 7, 8, 9]);
        assert_eq!(source.remaining(), Some(0));
        assert!(source.read_to_end().unwrap().is_empty());
    }

    #[test]
    fn zero_count_read_succeeds() {
        let mut source = ByteSource::from_bytes("mem", Vec::new());
        assert!(source.is_empty());
        assert_eq!(source.read_exact(0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn mid_read_error_keeps_cause() {
        let reader = FailingReader {
            prefix: Cursor::new(vec![9u8; 4]),
        };
        let mut source = ByteSource::new("flaky", reader).unwrap();
        let err = source.read_exact(8).unwrap_err();
        match err {
            DecodeError::Io { name, source: cause } => {
                assert_eq!(name, "flaky");
                assert_eq!(cause.to_string(), "medium error");
            }
            other => panic!("expected Io, got {other:?}"),
        }
        assert_eq!(source.offset(), 4);
    }

    #[test]
    fn interrupted_reads_are_resumed() {
        let reader = InterruptingReader {
            inner: Cursor::new((0u8..8).collect()),
            interrupt_next: false,
        };
        let mut source = ByteSource::new("eintr", reader).unwrap();
        assert_eq!(source.read_exact(8).unwrap(), (0u8..8).collect::<Vec<_>>());
    }

    #[test]
    fn new_respects_current_position() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        cursor.set_position(6);
        let source = ByteSource::new("mid", cursor).unwrap();
        assert_eq!(source.offset(), 6);
        assert_eq!(source.len(), Some(16));
        assert_eq!(source.into_inner().position(), 6);
    }

    #[test]
    fn seek_within_and_past_end() {
        let mut source = ByteSource::from_bytes("mem", (0u8..10).collect::<Vec<_>>());
        source.seek_to(8).unwrap();
        assert_eq!(source.read_exact(2).unwrap(), [8, 9]);
        assert!(matches!(
            source.seek_to(11),
            Err(DecodeError::SeekOutOfRange { offset: 11, len: 10 })
        ));
        assert_eq!(source.offset(), 10);
    }

    #[test]
    fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ByteSource::open(dir.path().join("missing.segd"));
        assert!(matches!(result, Err(DecodeError::NotFound { .. })));
    }

    #[test]
    fn open_reads_raw_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\r\n\x00\x1a\r\n").unwrap();
        file.flush().unwrap();

        let mut source = ByteSource::open(file.path()).unwrap();
        assert_eq!(source.len(), Some(6));
        assert_eq!(source.read_exact(6).unwrap(), b"\r\n\x00\x1a\r\n");
        source.release();
    }
}
