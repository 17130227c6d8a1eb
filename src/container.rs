// CLASSIFICATION: COMMUNITY
// Filename: container.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-08-09

//! Vendor update container parsing and payload extraction.
//!
//! Exactly one layout is understood: a master header carrying an 8-byte
//! magic and a little-endian entry count at offset 0x18, followed by a
//! flat table at offset 0x80 of 32-byte entries
//! `{id: u64, offset: u64, length: u64, reserved: u64}`. Entry ids are
//! neither sorted nor unique; the scan is linear and the first match wins.

use log::{debug, info};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;

/// Header magic of the vendor container format.
pub const CONTAINER_MAGIC: [u8; 8] = *b"SCEUF\0\0\0";
/// Offset of the little-endian `u32` entry count.
pub const ENTRY_COUNT_OFFSET: u64 = 0x18;
/// Offset of the first file-table entry.
pub const ENTRY_TABLE_OFFSET: u64 = 0x80;
/// Size of one file-table entry on disk.
pub const ENTRY_SIZE: usize = 32;

const EXTRACT_CHUNK: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("bad container magic")]
    BadMagic,
    #[error("entry 0x{0:x} not found in container")]
    EntryNotFound(u64),
    #[error("truncated entry: {want} bytes missing")]
    Truncated { want: u64 },
}

/// A resolved file-table entry. Valid only while the owning container
/// handle is open; consumed once to drive the bounded copy loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    pub id: u64,
    pub offset: u64,
    pub length: u64,
}

fn le64(raw: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(raw);
    u64::from_le_bytes(word)
}

/// Scan the header and file table of an open container for `target`.
pub fn find_entry<R: Read + Seek>(src: &mut R, target: u64) -> Result<FileEntry, ExtractError> {
    let mut magic = [0u8; 8];
    src.read_exact(&mut magic)?;
    if magic != CONTAINER_MAGIC {
        return Err(ExtractError::BadMagic);
    }

    src.seek(SeekFrom::Start(ENTRY_COUNT_OFFSET))?;
    let mut raw_count = [0u8; 4];
    src.read_exact(&mut raw_count)?;
    let count = u32::from_le_bytes(raw_count);
    debug!("container declares {count} entries");

    src.seek(SeekFrom::Start(ENTRY_TABLE_OFFSET))?;
    let mut raw = [0u8; ENTRY_SIZE];
    for _ in 0..count {
        match src.read_exact(&mut raw) {
            Ok(()) => {}
            // A table shorter than its declared count means the target id
            // can never be found.
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(ExtractError::EntryNotFound(target));
            }
            Err(err) => return Err(err.into()),
        }
        let entry = FileEntry {
            id: le64(&raw[0..8]),
            offset: le64(&raw[8..16]),
            length: le64(&raw[16..24]),
        };
        if entry.id == target {
            return Ok(entry);
        }
    }
    Err(ExtractError::EntryNotFound(target))
}

/// Stream the entry identified by `target_id` out of `container` into
/// `dest`. A partial destination may be left behind on failure; callers run
/// against a freshly cleaned directory and keep partials for diagnosis.
pub fn extract(container: &Path, target_id: u64, dest: &Path) -> Result<(), ExtractError> {
    let mut src = File::open(container)?;
    let entry = find_entry(&mut src, target_id)?;
    info!(
        "extracting entry 0x{:x} ({} bytes at offset 0x{:x})",
        entry.id, entry.length, entry.offset
    );

    let mut dst = File::create(dest)?;
    src.seek(SeekFrom::Start(entry.offset))?;

    let mut buf = [0u8; EXTRACT_CHUNK];
    let mut remaining = entry.length;
    while remaining > 0 {
        let want = remaining.min(EXTRACT_CHUNK as u64) as usize;
        let read = src.read(&mut buf[..want])?;
        if read == 0 {
            return Err(ExtractError::Truncated { want: remaining });
        }
        dst.write_all(&buf[..read])?;
        remaining -= read as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Build a container with the given `(id, payload)` entries laid out
    /// back to back after the table.
    fn build_container(entries: &[(u64, &[u8])]) -> Vec<u8> {
        let table_end = ENTRY_TABLE_OFFSET as usize + entries.len() * ENTRY_SIZE;
        let mut data_offset = table_end;
        let mut image = vec![0u8; table_end];
        image[..8].copy_from_slice(&CONTAINER_MAGIC);
        image[ENTRY_COUNT_OFFSET as usize..ENTRY_COUNT_OFFSET as usize + 4]
            .copy_from_slice(&(entries.len() as u32).to_le_bytes());
        for (i, (id, payload)) in entries.iter().enumerate() {
            let base = ENTRY_TABLE_OFFSET as usize + i * ENTRY_SIZE;
            image[base..base + 8].copy_from_slice(&id.to_le_bytes());
            image[base + 8..base + 16].copy_from_slice(&(data_offset as u64).to_le_bytes());
            image[base + 16..base + 24].copy_from_slice(&(payload.len() as u64).to_le_bytes());
            data_offset += payload.len();
        }
        for (_, payload) in entries {
            image.extend_from_slice(payload);
        }
        image
    }

    #[test]
    fn extracts_exact_entry_bytes() {
        let dir = tempdir().unwrap();
        let payload = [0x5Au8; 16];
        let image = build_container(&[
            (0x100, b"first".as_slice()),
            (0x200, payload.as_slice()),
            (0x300, b"third".as_slice()),
        ]);
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        let out = dir.path().join("out.bin");
        extract(&container, 0x200, &out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), payload);
    }

    #[test]
    fn first_match_wins_on_duplicate_ids() {
        let dir = tempdir().unwrap();
        let image = build_container(&[(0x200, b"winner".as_slice()), (0x200, b"loser".as_slice())]);
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        let out = dir.path().join("out.bin");
        extract(&container, 0x200, &out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"winner");
    }

    #[test]
    fn missing_entry_is_a_distinct_verdict() {
        let dir = tempdir().unwrap();
        let image = build_container(&[(0x100, b"x".as_slice())]);
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        match extract(&container, 0x200, &dir.path().join("out")) {
            Err(ExtractError::EntryNotFound(0x200)) => {}
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn declared_length_past_end_is_truncated() {
        let dir = tempdir().unwrap();
        let mut image = build_container(&[(0x200, b"short".as_slice())]);
        // Inflate the declared length past the available bytes.
        let base = ENTRY_TABLE_OFFSET as usize;
        image[base + 16..base + 24].copy_from_slice(&1000u64.to_le_bytes());
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        match extract(&container, 0x200, &dir.path().join("out")) {
            Err(ExtractError::Truncated { want }) => assert_eq!(want, 1000 - 5),
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = tempdir().unwrap();
        let mut image = build_container(&[(0x200, b"x".as_slice())]);
        image[0] = b'X';
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        match extract(&container, 0x200, &dir.path().join("out")) {
            Err(ExtractError::BadMagic) => {}
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn short_table_reports_entry_not_found() {
        let dir = tempdir().unwrap();
        let mut image = build_container(&[(0x100, b"x".as_slice())]);
        // Claim more entries than the table holds.
        image[ENTRY_COUNT_OFFSET as usize..ENTRY_COUNT_OFFSET as usize + 4]
            .copy_from_slice(&50u32.to_le_bytes());
        image.truncate(ENTRY_TABLE_OFFSET as usize + ENTRY_SIZE);
        let container = dir.path().join("c.pup");
        fs::write(&container, &image).unwrap();

        match extract(&container, 0x999, &dir.path().join("out")) {
            Err(ExtractError::EntryNotFound(0x999)) => {}
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }
}
