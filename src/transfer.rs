// CLASSIFICATION: COMMUNITY
// Filename: transfer.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-02

//! Chunked file staging with bounded memory.

use crate::digest::{digest_reader, DIGEST_LEN};
use log::debug;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Copy and digest chunk size.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Verification verdicts. A digest mismatch means the file is wrong and
/// should be re-acquired; an I/O error means the medium could not be read.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("could not read file: {0}")]
    Io(#[from] io::Error),
    #[error("digest mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },
}

/// Copy `src` to `dst` in fixed-size chunks. On any read or write error the
/// partially written destination is removed before the error is returned,
/// so no half-written file survives a failed copy.
pub fn copy(src: &Path, dst: &Path) -> io::Result<()> {
    let reader = File::open(src)?;
    copy_stream(reader, dst)
}

/// Chunked copy from an open reader to `dst`. Split out of [`copy`] so a
/// failing source can be driven through the same cleanup path.
pub fn copy_stream<R: Read>(mut reader: R, dst: &Path) -> io::Result<()> {
    let mut writer = File::create(dst)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    if let Err(err) = pump(&mut reader, &mut writer, &mut buf) {
        drop(writer);
        let _ = fs::remove_file(dst);
        return Err(err);
    }
    debug!("copied stream to {}", dst.display());
    Ok(())
}

fn pump<R: Read, W: Write>(reader: &mut R, writer: &mut W, buf: &mut [u8]) -> io::Result<()> {
    loop {
        let read = reader.read(buf)?;
        if read == 0 {
            return Ok(());
        }
        writer.write_all(&buf[..read])?;
    }
}

/// Stream `path` through the digest engine and compare against `expected`.
pub fn verify(path: &Path, expected: &[u8; DIGEST_LEN]) -> Result<(), VerifyError> {
    let file = File::open(path)?;
    let actual = digest_reader(file)?;
    if actual != *expected {
        return Err(VerifyError::Mismatch {
            expected: hex::encode(expected),
            actual: hex::encode(actual),
        });
    }
    debug!("digest verified for {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::StreamDigest;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// Reader that yields `good` bytes and then fails.
    struct FailingReader {
        good: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let read = self.good.read(buf)?;
            if read == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "simulated read fault"));
            }
            Ok(read)
        }
    }

    #[test]
    fn copy_is_byte_identical_across_chunk_boundaries() {
        let dir = tempdir().unwrap();
        for len in [0usize, 1, CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, 3 * CHUNK_SIZE + 17] {
            let src = dir.path().join(format!("src-{len}"));
            let dst = dir.path().join(format!("dst-{len}"));
            let data: Vec<u8> = (0..len).map(|i| (i % 253) as u8).collect();
            fs::write(&src, &data).unwrap();
            copy(&src, &dst).unwrap();
            assert_eq!(fs::read(&dst).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn failed_copy_leaves_no_destination() {
        let dir = tempdir().unwrap();
        let dst = dir.path().join("partial");
        let reader = FailingReader {
            good: Cursor::new(vec![0xAB; CHUNK_SIZE + 100]),
        };
        let err = copy_stream(reader, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(!dst.exists(), "partial destination must be removed");
    }

    #[test]
    fn copy_missing_source_fails_without_destination() {
        let dir = tempdir().unwrap();
        let dst = dir.path().join("out");
        let err = copy(&dir.path().join("nope"), &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dst.exists());
    }

    #[test]
    fn verify_distinguishes_mismatch_from_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");
        fs::write(&path, b"payload").unwrap();

        let mut digest = StreamDigest::new();
        digest.update(b"payload");
        let good = digest.finalize();
        verify(&path, &good).unwrap();

        let bad = [0u8; DIGEST_LEN];
        match verify(&path, &bad) {
            Err(VerifyError::Mismatch { expected, actual }) => {
                assert_eq!(expected, hex::encode(bad));
                assert_eq!(actual, hex::encode(good));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }

        match verify(&dir.path().join("absent"), &good) {
            Err(VerifyError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
