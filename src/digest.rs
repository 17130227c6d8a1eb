// CLASSIFICATION: COMMUNITY
// Filename: digest.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-30

//! Streaming SHA-256 over arbitrarily large inputs.

use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Length in bytes of every digest this crate produces.
pub const DIGEST_LEN: usize = 32;

/// Streaming digest accumulator. Chunk boundaries do not affect the
/// result: any split of the input yields the digest of the concatenation.
pub struct StreamDigest {
    inner: Sha256,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Append `bytes` to the running digest.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Consume the accumulator and yield the final digest. The state is
    /// moved out, so a second finalize cannot be expressed.
    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        self.inner.finalize().into()
    }
}

impl Default for StreamDigest {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest a reader chunk by chunk until end of stream.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<[u8; DIGEST_LEN]> {
    let mut buf = vec![0u8; crate::transfer::CHUNK_SIZE];
    let mut digest = StreamDigest::new();
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        digest.update(&buf[..read]);
    }
    Ok(digest.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn empty_input_matches_pinned_vector() {
        let digest = StreamDigest::new().finalize();
        assert_eq!(hex::encode(digest), EMPTY_SHA256);
    }

    #[test]
    fn known_vector_matches() {
        let mut digest = StreamDigest::new();
        digest.update(b"abc");
        assert_eq!(hex::encode(digest.finalize()), ABC_SHA256);
    }

    #[test]
    fn chunk_boundaries_do_not_matter() {
        let input: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();

        let mut whole = StreamDigest::new();
        whole.update(&input);
        let expected = whole.finalize();

        for split in [1usize, 63, 64, 65, 4096, 99_999] {
            let mut split_digest = StreamDigest::new();
            for chunk in input.chunks(split) {
                split_digest.update(chunk);
            }
            assert_eq!(split_digest.finalize(), expected, "split {split}");
        }
    }

    #[test]
    fn reader_digest_equals_buffer_digest() {
        let input: Vec<u8> = (0..200_000u32).map(|i| (i * 7 % 256) as u8).collect();
        let mut buffered = StreamDigest::new();
        buffered.update(&input);
        let streamed = digest_reader(Cursor::new(&input)).unwrap();
        assert_eq!(streamed, buffered.finalize());
    }
}
