// CLASSIFICATION: COMMUNITY
// Filename: platform/mod.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! Host collaborator seams.
//!
//! Everything the orchestrator needs from the device that is not plain
//! file I/O goes through [`Platform`]: the on-screen console, the
//! execution-permission probe, the battery gate, the power lock, the
//! confirmation input, raw master-block reads and the privileged module
//! loader. OS error codes stay raw `i32` and are rendered `0x{:08X}` in
//! user messages.

use bitflags::bitflags;
use std::io;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "vita")]
pub mod vita;

bitflags! {
    /// Logical confirmation-input state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u32 {
        const ACCEPT = 1 << 0;
        const CANCEL = 1 << 1;
    }
}

/// Handle of a loaded privileged module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle(pub i32);

pub trait Platform {
    /// Print user-facing installer text on the device screen.
    fn show(&mut self, text: &str);

    /// True when the host permits unrestricted execution.
    fn unsafe_homebrew_enabled(&self) -> bool;

    /// Stored energy reserve in percent.
    fn battery_percent(&self) -> u32;

    /// Hold the system awake for the duration of the procedure.
    fn power_lock(&mut self);

    /// Release the hold taken by [`Platform::power_lock`].
    fn power_unlock(&mut self);

    /// Sample the confirmation input once, without blocking.
    fn poll_buttons(&mut self) -> Buttons;

    fn sleep(&self, duration: Duration);

    /// Read the master block from the raw storage device.
    fn read_master_block(&self) -> io::Result<Vec<u8>>;

    /// Load and start a privileged module, returning its handle or the raw
    /// OS error code.
    fn load_start_module(&mut self, path: &Path) -> Result<ModuleHandle, i32>;

    /// Stop and unload a previously loaded privileged module.
    fn stop_unload_module(&mut self, handle: ModuleHandle) -> Result<(), i32>;
}
