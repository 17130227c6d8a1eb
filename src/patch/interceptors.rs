// CLASSIFICATION: COMMUNITY
// Filename: patch/interceptors.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! The three behavior overrides applied to the stock updater.

use super::{ImportHandler, OriginalFn, PowerRelease, UpdaterCall};
use std::sync::Arc;

/// Interactive boot mode the updater is forced into.
pub const BOOT_MODE_GUI: i32 = 0x40;
/// Command code starting the update.
pub const CMD_START: i32 = 0;
/// Command code committing the update.
pub const CMD_COMMIT: i32 = 1;

/// Force the reported boot mode to the interactive value, whatever the
/// original reported. The original's return value is preserved.
pub struct BootModeOverride;

impl ImportHandler for BootModeOverride {
    fn on_call(&self, call: &mut UpdaterCall, original: &dyn OriginalFn) -> i32 {
        let ret = original.invoke(call);
        if let UpdaterCall::GetBootMode { mode } = call {
            *mode = BOOT_MODE_GUI;
        }
        ret
    }
}

/// Release the held power lock when the start or commit command passes
/// through, then forward the call unchanged.
pub struct CommandUnlock {
    power: Arc<dyn PowerRelease>,
}

impl CommandUnlock {
    pub fn new(power: Arc<dyn PowerRelease>) -> Self {
        Self { power }
    }
}

impl ImportHandler for CommandUnlock {
    fn on_call(&self, call: &mut UpdaterCall, original: &dyn OriginalFn) -> i32 {
        if let UpdaterCall::SendCommand { cmd, .. } = call {
            if *cmd == CMD_START || *cmd == CMD_COMMIT {
                self.power.release();
            }
        }
        original.invoke(call)
    }
}

/// The launch path leaves the staging directory read-restricted, so the
/// target's own removal calls fail there. Keep issuing the removal but
/// always report success to the caller.
pub struct RemoveNeutralizer;

impl ImportHandler for RemoveNeutralizer {
    fn on_call(&self, call: &mut UpdaterCall, original: &dyn OriginalFn) -> i32 {
        let _ = original.invoke(call);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubOriginal {
        boot_mode: i32,
        ret: i32,
    }

    impl OriginalFn for StubOriginal {
        fn invoke(&self, call: &mut UpdaterCall) -> i32 {
            if let UpdaterCall::GetBootMode { mode } = call {
                *mode = self.boot_mode;
            }
            self.ret
        }
    }

    struct CountingPower {
        releases: AtomicUsize,
    }

    impl PowerRelease for CountingPower {
        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn boot_mode_is_forced_and_return_preserved() {
        let original = StubOriginal {
            boot_mode: 0x20,
            ret: 7,
        };
        let mut call = UpdaterCall::GetBootMode { mode: 0 };
        let ret = BootModeOverride.on_call(&mut call, &original);
        assert_eq!(ret, 7);
        assert_eq!(call, UpdaterCall::GetBootMode { mode: BOOT_MODE_GUI });
    }

    #[test]
    fn unlock_fires_only_on_start_and_commit() {
        let power = Arc::new(CountingPower {
            releases: AtomicUsize::new(0),
        });
        let handler = CommandUnlock::new(power.clone());
        let original = StubOriginal { boot_mode: 0, ret: 0 };

        for (cmd, expected_total) in [(CMD_START, 1), (CMD_COMMIT, 2), (5, 2), (-1, 2)] {
            let mut call = UpdaterCall::SendCommand { cmd, arg: 0 };
            handler.on_call(&mut call, &original);
            assert_eq!(power.releases.load(Ordering::SeqCst), expected_total, "cmd {cmd}");
        }
    }

    #[test]
    fn removal_failure_is_reported_as_success() {
        let original = StubOriginal {
            boot_mode: 0,
            ret: -2147418107,
        };
        let mut call = UpdaterCall::RemoveFile {
            path: "ux0:data/stale".into(),
        };
        assert_eq!(RemoveNeutralizer.on_call(&mut call, &original), 0);
    }
}
