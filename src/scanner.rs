use std::collections::TryReserveError;

use thiserror::Error;

use crate::partition::ByteRange;
use crate::source::{ByteSource, SourceError};
use crate::tokenizer::{self, scan_window};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("short read at offset {offset}: expected {expected} bytes, got {got}")]
    ShortRead {
        offset: u64,
        expected: usize,
        got: usize,
    },
    #[error("failed to allocate scan window: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Reusable fixed-capacity read buffer, one per worker.
pub struct ScanWindow {
    buf: Vec<u8>,
}

impl ScanWindow {
    /// Allocate the window up front, fallibly, so resource exhaustion
    /// surfaces as an error instead of an abort mid-run.
    pub fn with_capacity(capacity: usize) -> Result<Self, ScanError> {
        let capacity = capacity.max(1);
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        buf.resize(capacity, 0);
        Ok(Self { buf })
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Fill exactly `len` bytes from `source` starting at `offset`. The
    /// caller never asks past the end of its range, so anything short of
    /// `len` means the source shrank or the read failed.
    fn fill(
        &mut self,
        source: &dyn ByteSource,
        offset: u64,
        len: usize,
    ) -> Result<&[u8], ScanError> {
        let dst = &mut self.buf[..len];
        let mut filled = 0usize;
        while filled < len {
            let n = source.read_at(offset + filled as u64, &mut dst[filled..])?;
            if n == 0 {
                return Err(ScanError::ShortRead {
                    offset,
                    expected: len,
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(dst)
    }
}

/// Count the words of one byte range.
///
/// `preceding_byte` is the byte just before `range.start` when the range does
/// not begin the file. The first window starts inside a word exactly when
/// that byte exists and is non-whitespace; every later window carries the
/// previous window's `ends_inside_word`. The final read is clipped to the
/// range remainder, and an empty range issues no read at all.
pub fn scan_range(
    source: &dyn ByteSource,
    range: ByteRange,
    preceding_byte: Option<u8>,
    buffer_capacity: usize,
) -> Result<u64, ScanError> {
    if range.length == 0 {
        return Ok(0);
    }

    let mut window = ScanWindow::with_capacity(buffer_capacity)?;
    let mut inside_word =
        range.start != 0 && preceding_byte.is_some_and(|byte| !tokenizer::is_whitespace(byte));

    let mut words = 0u64;
    let mut consumed = 0u64;

    while consumed < range.length {
        let remaining = range.length - consumed;
        let len = remaining.min(window.capacity() as u64) as usize;
        let offset = range.start + consumed;

        let scan = scan_window(window.fill(source, offset, len)?, inside_word);
        words += scan.words;
        inside_word = scan.ends_inside_word;
        consumed += len as u64;
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FileSource;
    use std::fs;
    use std::path::Path;

    fn write_input(dir: &Path, content: &[u8]) -> FileSource {
        let path = dir.join("input.txt");
        fs::write(&path, content).expect("write input");
        FileSource::open(&path).expect("open")
    }

    fn range(start: u64, length: u64) -> ByteRange {
        ByteRange {
            index: 0,
            start,
            length,
        }
    }

    #[test]
    fn counts_whole_file_in_one_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"the quick brown fox");
        let words = scan_range(&source, range(0, 19), None, 64 * 1024).expect("scan");
        assert_eq!(words, 4);
    }

    #[test]
    fn window_smaller_than_words_still_counts_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"the quick brown fox");
        // 3-byte windows split "quick" and "brown" across fills.
        let words = scan_range(&source, range(0, 19), None, 3).expect("scan");
        assert_eq!(words, 4);
    }

    #[test]
    fn empty_range_issues_no_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"irrelevant");
        let words = scan_range(&source, range(0, 0), None, 4096).expect("scan");
        assert_eq!(words, 0);
    }

    #[test]
    fn preceding_word_byte_suppresses_seam_word() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"the quick brown fox");
        // Range starts inside "quick"; byte 5 is 'u', byte 4 is 'q'.
        let words = scan_range(&source, range(5, 14), Some(b'q'), 4096).expect("scan");
        assert_eq!(words, 2);
    }

    #[test]
    fn preceding_whitespace_keeps_seam_word() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"the quick brown fox");
        // Range starts exactly at "quick"; byte 3 is a space.
        let words = scan_range(&source, range(4, 15), Some(b' '), 4096).expect("scan");
        assert_eq!(words, 3);
    }

    #[test]
    fn range_past_end_of_file_is_a_short_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"tiny");
        let err = scan_range(&source, range(0, 32), None, 4096).expect_err("should fail");
        assert!(matches!(err, ScanError::ShortRead { .. }));
    }

    #[test]
    fn single_byte_window_is_correct() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write_input(dir.path(), b"  leading and trailing  ");
        let words = scan_range(&source, range(0, 24), None, 1).expect("scan");
        assert_eq!(words, 3);
    }
}
