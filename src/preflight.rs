// CLASSIFICATION: COMMUNITY
// Filename: preflight.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-08-01

//! Raw-device probe for a prior incompatible installation.
//!
//! The probe reads the master block at a fixed device offset and matches
//! it against the foreign boot-record signature a prior modification
//! leaves behind. A match is a hard refusal: the two states are mutually
//! exclusive and the prior one must be uninstalled first.

use log::debug;

/// Device offset of the master block.
pub const MASTER_BLOCK_OFFSET: u64 = 0x200;
/// Size of the master block read from the device.
pub const MASTER_BLOCK_LEN: usize = 512;
/// Minimum battery reserve before an irreversible procedure may start.
pub const MIN_BATTERY_PERCENT: u32 = 50;

const MASTER_MAGIC: &[u8; 0x20] = b"Sony Computer Entertainment Inc.";
const MASTER_TRAILER: u16 = 0xAA55;
const TRAILER_OFFSET: usize = MASTER_BLOCK_LEN - 2;

/// True when `block` carries the foreign boot-record signature: the vendor
/// magic at offset 0 and the boot trailer in the last two bytes.
pub fn is_foreign_boot_record(block: &[u8]) -> bool {
    if block.len() < MASTER_BLOCK_LEN {
        debug!("master block short read: {} bytes", block.len());
        return false;
    }
    if &block[..MASTER_MAGIC.len()] != MASTER_MAGIC {
        return false;
    }
    u16::from_le_bytes([block[TRAILER_OFFSET], block[TRAILER_OFFSET + 1]]) == MASTER_TRAILER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreign_block() -> Vec<u8> {
        let mut block = vec![0u8; MASTER_BLOCK_LEN];
        block[..MASTER_MAGIC.len()].copy_from_slice(MASTER_MAGIC);
        block[TRAILER_OFFSET..].copy_from_slice(&MASTER_TRAILER.to_le_bytes());
        block
    }

    #[test]
    fn detects_foreign_record() {
        assert!(is_foreign_boot_record(&foreign_block()));
    }

    #[test]
    fn stock_block_is_not_foreign() {
        let block = vec![0u8; MASTER_BLOCK_LEN];
        assert!(!is_foreign_boot_record(&block));
    }

    #[test]
    fn magic_without_trailer_is_not_foreign() {
        let mut block = foreign_block();
        block[TRAILER_OFFSET] = 0;
        assert!(!is_foreign_boot_record(&block));
    }

    #[test]
    fn trailer_without_magic_is_not_foreign() {
        let mut block = foreign_block();
        block[0] = b'X';
        assert!(!is_foreign_boot_record(&block));
    }

    #[test]
    fn short_read_is_not_foreign() {
        assert!(!is_foreign_boot_record(&foreign_block()[..100]));
    }
}
