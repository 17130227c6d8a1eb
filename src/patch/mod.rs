// CLASSIFICATION: COMMUNITY
// Filename: patch/mod.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! Runtime patch injection against the stock updater process.
//!
//! The privileged host loader loads this layer as its own module: start
//! installs the fixed patch set against the already-running target, stop
//! reverses every installed record in strict reverse order. Install is
//! all-or-nothing: a failed record releases everything installed before it
//! inside the same call.

pub mod interceptors;
pub mod manager;
pub mod records;

use log::info;
use manager::InjectionManager;
use std::sync::Arc;
use thiserror::Error;

/// Name of the one target program this layer patches.
pub const TARGET_MODULE: &str = "ScePsp2Swu";

/// Identifier of a loaded module inside the protected context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleId(pub i32);

/// Handle of an installed function intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(pub i32);

/// Handle of an installed data injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectId(pub i32);

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("could not lock system: 0x{0:08X}")]
    LockFailed(i32),
    #[error("target module {0} not found")]
    TargetNotFound(String),
    #[error("hook install failed: 0x{0:08X}")]
    HookFailed(i32),
    #[error("data injection failed: 0x{0:08X}")]
    InjectFailed(i32),
    #[error("segment read failed: 0x{0:08X}")]
    SegmentRead(i32),
    #[error("release failed: 0x{0:08X}")]
    ReleaseFailed(i32),
    #[error("segment bytes at 0x{offset:x} do not match the expected image")]
    UnexpectedImage { offset: u64 },
}

/// One intercepted import call, marshalled for handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdaterCall {
    /// Boot-mode query; `mode` is the value the target will observe.
    GetBootMode { mode: i32 },
    /// Update command dispatch.
    SendCommand { cmd: i32, arg: i32 },
    /// File removal issued by the target.
    RemoveFile { path: String },
}

/// Capability to invoke the unhooked import behind a handler with the
/// (possibly altered) arguments of the current call.
pub trait OriginalFn {
    fn invoke(&self, call: &mut UpdaterCall) -> i32;
}

/// Substitute implementation installed over an imported function. Pure
/// function of the call frame and the continuation capability.
pub trait ImportHandler {
    fn on_call(&self, call: &mut UpdaterCall, original: &dyn OriginalFn) -> i32;
}

/// Release of the held power lock from inside an intercepted call frame.
pub trait PowerRelease {
    fn release(&self);
}

/// Privileged hooking interface of the protected execution context.
pub trait PatchHost {
    /// Take the system locks the patch layer holds for its lifetime
    /// (power lock, shell lock, foreground takeover).
    fn lock_system(&mut self) -> Result<(), PatchError>;

    /// Resolve an already-loaded module by name.
    fn resolve_module(&mut self, name: &str) -> Result<ModuleId, PatchError>;

    /// Redirect calls to a named import of `target` to `handler`.
    fn hook_import(
        &mut self,
        target: &str,
        library_nid: u32,
        function_nid: u32,
        handler: Box<dyn ImportHandler>,
    ) -> Result<HookId, PatchError>;

    /// Read current bytes from a loaded segment of `module`.
    fn read_segment(
        &self,
        module: ModuleId,
        segment: usize,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<(), PatchError>;

    /// Overwrite bytes at a fixed offset inside a loaded segment.
    fn inject_data(
        &mut self,
        module: ModuleId,
        segment: usize,
        offset: u64,
        bytes: &[u8],
    ) -> Result<InjectId, PatchError>;

    fn release_hook(&mut self, hook: HookId) -> Result<(), PatchError>;

    fn release_inject(&mut self, inject: InjectId) -> Result<(), PatchError>;
}

/// Module lifecycle driven by the host loader.
#[derive(Debug)]
pub struct PatchModule {
    manager: InjectionManager,
}

impl PatchModule {
    /// Module start: lock the system, then install the fixed patch set.
    /// Any failure leaves nothing installed.
    pub fn start<H: PatchHost>(
        host: &mut H,
        power: Arc<dyn PowerRelease>,
    ) -> Result<Self, PatchError> {
        host.lock_system()?;
        let mut manager = InjectionManager::new(TARGET_MODULE);
        manager.install_all(host, records::stock_updater_patches(power))?;
        info!("patch module started against {TARGET_MODULE}");
        Ok(Self { manager })
    }

    /// Module stop: reverse every installed record. Safe to call again;
    /// the second call finds nothing to release.
    pub fn stop<H: PatchHost>(&mut self, host: &mut H) {
        self.manager.teardown(host);
    }

    /// Number of records currently active.
    pub fn active(&self) -> usize {
        self.manager.active()
    }
}
