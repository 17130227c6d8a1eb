// CLASSIFICATION: COMMUNITY
// Filename: patch/records.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! The fixed patch set installed against the stock updater.
//!
//! The data-injection offsets are valid only for one exact build of the
//! target; each record therefore pins the stock path string expected at
//! its offset, and a mismatch rejects the whole install.

use super::interceptors::{BootModeOverride, CommandUnlock, RemoveNeutralizer};
use super::manager::PatchRecord;
use super::PowerRelease;
use std::sync::Arc;

/// Import library of the update-manager functions.
pub const UPDATE_MGR_LIB_NID: u32 = 0x31406C49;
/// Boot-mode query import.
pub const GET_BOOT_MODE_NID: u32 = 0x8E834565;
/// Command dispatch import.
pub const SEND_COMMAND_NID: u32 = 0x1825D954;
/// Import library of the I/O functions.
pub const IO_LIB_NID: u32 = 0xCAE9ACE6;
/// File removal import.
pub const IO_REMOVE_NID: u32 = 0xE20ED0F3;

/// Segment-0 offsets of the three embedded path strings in the target.
pub const DATA_DIR_OFFSET: u64 = 0x2EB408;
pub const PAYLOAD_PATH_OFFSET: u64 = 0x2EB428;
pub const CONTAINER_PATH_OFFSET: u64 = 0x2EB448;

/// NUL-terminated bytes of an embedded path string.
fn path_bytes(path: &str) -> Vec<u8> {
    let mut bytes = path.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// The shipped record list, in install order: three import hooks, then the
/// three path-string rewrites pointing the target at the staged artifacts.
pub fn stock_updater_patches(power: Arc<dyn PowerRelease>) -> Vec<PatchRecord> {
    vec![
        PatchRecord::HookImport {
            library_nid: UPDATE_MGR_LIB_NID,
            function_nid: GET_BOOT_MODE_NID,
            handler: Box::new(BootModeOverride),
        },
        PatchRecord::HookImport {
            library_nid: UPDATE_MGR_LIB_NID,
            function_nid: SEND_COMMAND_NID,
            handler: Box::new(CommandUnlock::new(power)),
        },
        PatchRecord::HookImport {
            library_nid: IO_LIB_NID,
            function_nid: IO_REMOVE_NID,
            handler: Box::new(RemoveNeutralizer),
        },
        PatchRecord::InjectData {
            segment: 0,
            offset: DATA_DIR_OFFSET,
            expected: Some(path_bytes("ux0:data")),
            bytes: path_bytes("ux0:/data"),
        },
        PatchRecord::InjectData {
            segment: 0,
            offset: PAYLOAD_PATH_OFFSET,
            expected: Some(path_bytes("ud0:PSP2UPDATE/psp2swu.self")),
            bytes: path_bytes("ud0:/PSP2UPDATE/ensoswu.self"),
        },
        PatchRecord::InjectData {
            segment: 0,
            offset: CONTAINER_PATH_OFFSET,
            expected: Some(path_bytes("ud0:PSP2UPDATE/PSP2UPDAT.PUP")),
            bytes: path_bytes("ud0:/PSP2UPDATE/ENSOUPDAT.PUP"),
        },
    ]
}
