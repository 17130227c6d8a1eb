// CLASSIFICATION: COMMUNITY
// Filename: layout.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-10

//! Fixed storage paths and pinned constants of the installer.

use crate::digest::DIGEST_LEN;
use std::path::PathBuf;

/// File-table id of the updater executable inside the container.
pub const PAYLOAD_ENTRY_ID: u64 = 0x200;

/// Pinned digest of the shipped update container.
pub const PUP_SHA256: [u8; DIGEST_LEN] = [
    0x86, 0x85, 0x9B, 0x30, 0x71, 0x68, 0x12, 0x68, 0xB6, 0xD0, 0xBE, 0xB5, 0xEF, 0x69, 0x1D,
    0xA8, 0x74, 0xB6, 0x72, 0x6E, 0x85, 0xB6, 0xF0, 0x6A, 0x1C, 0xDF, 0x6A, 0x0E, 0x18, 0x3E,
    0x77, 0xC6,
];

/// The storage roots this installer operates on. The shipped binary uses
/// [`Default`]; tests point the roots at scratch directories.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Application directory holding the input container and the
    /// privileged modules.
    pub app_dir: PathBuf,
    /// Staging directory the stock updater consumes.
    pub staging_dir: PathBuf,
    /// Primary loader-config directory.
    pub tai_dir: PathBuf,
    /// Backup loader-config directory, also home of the legacy artifacts.
    pub tai_backup_dir: PathBuf,
    /// Raw block device probed for a prior installation.
    pub raw_device: PathBuf,
    /// Expected digest of the staged container.
    pub pup_digest: [u8; DIGEST_LEN],
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("ux0:app/UPDATE365"),
            staging_dir: PathBuf::from("ud0:PSP2UPDATE"),
            tai_dir: PathBuf::from("ux0:tai"),
            tai_backup_dir: PathBuf::from("ur0:tai"),
            raw_device: PathBuf::from("sdstor0:int-lp-act-entire"),
            pup_digest: PUP_SHA256,
        }
    }
}

impl Layout {
    /// Input container as delivered.
    pub fn input_pup(&self) -> PathBuf {
        self.app_dir.join("PSP2UPDAT.PUP")
    }

    /// Repacked container copy under the name the stock updater opens.
    pub fn staged_pup(&self) -> PathBuf {
        self.staging_dir.join("ENSOUPDAT.PUP")
    }

    /// Extracted updater executable.
    pub fn staged_swu(&self) -> PathBuf {
        self.staging_dir.join("ensoswu.self")
    }

    /// Diagnostic privileged module used as the load-path probe.
    pub fn diag_module(&self) -> PathBuf {
        self.app_dir.join("kernel2.skprx")
    }

    /// Privileged module whose load is the final handoff.
    pub fn handoff_module(&self) -> PathBuf {
        self.app_dir.join("kernel.skprx")
    }

    /// Residue a prior or competing attempt may have left in staging.
    pub fn residue_paths(&self) -> Vec<PathBuf> {
        vec![
            self.staging_dir.join("PSP2UPDAT.PUP"),
            self.staging_dir.join("psp2swu.self"),
            self.staging_dir.join("ENSOUPDAT.PUP"),
            self.staging_dir.join("ensoswu.self"),
        ]
    }

    /// Legacy loader artifacts removed before the config rewrite.
    pub fn legacy_paths(&self) -> Vec<PathBuf> {
        vec![
            self.tai_dir.join("config.txt"),
            self.tai_backup_dir.join("config.txt"),
            self.tai_backup_dir.join("boot_config.txt"),
            self.tai_backup_dir.join("taihen.skprx"),
            self.tai_backup_dir.join("henkaku.skprx"),
            self.tai_backup_dir.join("henkaku.suprx"),
            self.tai_backup_dir.join("henkaku_config.bin"),
        ]
    }

    /// Primary config destination.
    pub fn primary_config(&self) -> PathBuf {
        self.tai_dir.join("config.txt")
    }

    /// Recovery config destination.
    pub fn recovery_config(&self) -> PathBuf {
        self.tai_backup_dir.join("config.txt")
    }
}
