// CLASSIFICATION: COMMUNITY
// Filename: patch/manager.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! Ordered install and teardown of the patch record set.

use super::{HookId, ImportHandler, InjectId, ModuleId, PatchError, PatchHost};
use log::{info, warn};

/// Declarative description of one runtime modification.
pub enum PatchRecord {
    /// Redirect a named import of the target to a substitute handler.
    HookImport {
        library_nid: u32,
        function_nid: u32,
        handler: Box<dyn ImportHandler>,
    },
    /// Overwrite a byte range inside a loaded segment of the target.
    /// When `expected` is present the current bytes are compared first and
    /// a mismatch rejects the install instead of corrupting an image with
    /// a different layout.
    InjectData {
        segment: usize,
        offset: u64,
        expected: Option<Vec<u8>>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug)]
enum Installed {
    Hook(HookId),
    Inject(InjectId),
}

/// Owner of the installed-patch set. Records are released only by the
/// manager that installed them, in strict reverse order.
#[derive(Debug)]
pub struct InjectionManager {
    target: &'static str,
    installed: Vec<Installed>,
}

impl InjectionManager {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            installed: Vec::new(),
        }
    }

    /// Install every record in order. On the first failure the records
    /// already installed are released in reverse order before the error is
    /// returned, so the set is never left partially active.
    pub fn install_all<H: PatchHost>(
        &mut self,
        host: &mut H,
        records: Vec<PatchRecord>,
    ) -> Result<(), PatchError> {
        let module = host.resolve_module(self.target)?;
        for record in records {
            match self.install_one(host, module, record) {
                Ok(installed) => self.installed.push(installed),
                Err(err) => {
                    warn!("install failed after {} records: {err}", self.installed.len());
                    self.teardown(host);
                    return Err(err);
                }
            }
        }
        info!("{} patches active against {}", self.installed.len(), self.target);
        Ok(())
    }

    fn install_one<H: PatchHost>(
        &mut self,
        host: &mut H,
        module: ModuleId,
        record: PatchRecord,
    ) -> Result<Installed, PatchError> {
        match record {
            PatchRecord::HookImport {
                library_nid,
                function_nid,
                handler,
            } => host
                .hook_import(self.target, library_nid, function_nid, handler)
                .map(Installed::Hook),
            PatchRecord::InjectData {
                segment,
                offset,
                expected,
                bytes,
            } => {
                if let Some(expected) = expected {
                    let mut current = vec![0u8; expected.len()];
                    host.read_segment(module, segment, offset, &mut current)?;
                    if current != expected {
                        return Err(PatchError::UnexpectedImage { offset });
                    }
                }
                host.inject_data(module, segment, offset, &bytes)
                    .map(Installed::Inject)
            }
        }
    }

    /// Release every installed record in strict reverse order. Records
    /// that were never installed are not in the set, so nothing is
    /// double-released; calling this on an empty set is a no-op.
    pub fn teardown<H: PatchHost>(&mut self, host: &mut H) {
        while let Some(entry) = self.installed.pop() {
            let result = match entry {
                Installed::Hook(id) => host.release_hook(id),
                Installed::Inject(id) => host.release_inject(id),
            };
            if let Err(err) = result {
                warn!("release failed: {err}");
            }
        }
    }

    pub fn active(&self) -> usize {
        self.installed.len()
    }
}
