// CLASSIFICATION: COMMUNITY
// Filename: orchestrator.rs v0.6
// Author: Lukas Bower
// Date Modified: 2026-08-12

//! Installer phase machine.
//!
//! Phases run in a fixed order and every one is a hard gate: the first
//! failure short-circuits the rest, no phase is retried and none can be
//! skipped. Past the config rewrite there is no rollback, and past the
//! handoff the device belongs to the stock updater.

use crate::cleanup::{self, CleanupError};
use crate::config;
use crate::container::{self, ExtractError};
use crate::layout::{Layout, PAYLOAD_ENTRY_ID};
use crate::platform::{Buttons, Platform};
use crate::preflight::{self, MIN_BATTERY_PERCENT};
use crate::transfer::{self, VerifyError};
use log::info;
use std::fs;
use std::io;
use std::time::Duration;
use thiserror::Error;

const BANNER: &str = "3.65 HENkaku Enso Updater\n\n";

const RISK_NOTICE: &str = "\
You are about to update to Custom Firmware 3.65 HENkaku Enso.

- Note that once updated there is no way to downgrade back to your
  current firmware.
- Make sure that all your favorite homebrews and plugins are
  compatible on 3.65 before updating.
- Check that you have a file manager installed and a backup of it,
  in case you accidentally lose it.

";

const TERMS_NOTICE: &str = "\
This software will make PERMANENT modifications to your device.
If anything goes wrong, there is NO RECOVERY (not even with a
hardware flasher). The creators provide this tool \"as is\", without
warranty of any kind, express or implied and cannot be held
liable for any damage done.

";

const RISK_PROMPT: &str = "\
Press X to confirm that you have read and understood all the
risks and suggestions above, R to exit.

";

const TERMS_PROMPT: &str =
    "Press X to accept these terms and start the update, R to not accept and exit.\n\n";

const NO_TOUCH_NOTICE: &str = "\
Please do not press any buttons or power off the device during the
update, otherwise you may cause permanent damage to your device.

";

/// Pause between completed steps so the user can follow along.
const PACING: Duration = Duration::from_millis(500);
/// Mandatory reading time before each consent prompt.
const CONSENT_WAIT: Duration = Duration::from_secs(20);
/// Confirmation-input poll period.
const POLL_PERIOD: Duration = Duration::from_millis(10);
/// How long a successful handoff is given before it counts as failed.
const HANDOFF_WAIT: Duration = Duration::from_secs(60);
/// How long a terminal message stays on screen.
const SHORT_HOLD: Duration = Duration::from_secs(10);
const LONG_HOLD: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Enable unsafe homebrew first before using this software.")]
    UnsafeHomebrewDisabled,
    #[error("Battery has to be at least at {min}%.", min = MIN_BATTERY_PERCENT)]
    LowBattery { percent: u32 },
    #[error(
        "Disable all plugins first before using this software.\n\
         If you have already disabled them, but still get this message,\n\
         reboot your device and launch this software again without\n\
         launching any other applications before. (error 0x{0:08X})"
    )]
    PluginConflict(i32),
    #[error("Error 0x{0:08X} unloading the diagnostic module.")]
    DiagUnload(i32),
    #[error("Error reading the boot device: {0}")]
    DeviceProbe(io::Error),
    #[error(
        "Please uninstall the previous modification first before updating.\n\
         Tip: Unlink Memory Card in HENkaku Settings first\n\
         \x20    before you uninstall it."
    )]
    PriorInstallPresent,
    #[error("Could not find {0}.")]
    InputMissing(String),
    #[error("Error could not clean the staging area: {0}")]
    Residue(#[from] CleanupError),
    #[error("Error copying the update container: {0}")]
    Copy(io::Error),
    #[error("Error verifying the update container: {0}")]
    Verify(#[from] VerifyError),
    #[error("Error extracting the updater executable: {0}")]
    Extract(#[from] ExtractError),
    #[error("Error writing the loader configuration: {0}")]
    ConfigWrite(io::Error),
    #[error("Error 0x{0:08X} loading the updater module.")]
    HandoffLoad(i32),
}

impl InstallError {
    /// Gate failures that need remediation get the long hold.
    fn hold(&self) -> Duration {
        match self {
            InstallError::PluginConflict(_) | InstallError::PriorInstallPresent => LONG_HOLD,
            _ => SHORT_HOLD,
        }
    }
}

/// The named phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreflightEnvironment,
    PreflightPriorAttempt,
    ConsentRisks,
    ConsentTerms,
    CleanResidue,
    CopyInput,
    VerifyInput,
    ExtractPayload,
    RewriteConfig,
    Handoff,
}

/// Terminal results of a run.
#[derive(Debug)]
pub enum Outcome {
    /// The privileged load of the stock updater succeeded. Control is not
    /// expected to return; the caller only ever observes this if it does.
    HandedOff,
    /// The user declined at a consent gate. Not a fault.
    Cancelled,
    Failed { phase: Phase, error: InstallError },
}

/// Result of driving one phase.
#[derive(Debug)]
pub enum Transition {
    Next(Phase),
    Done(Outcome),
}

pub struct Installer<'a, P: Platform> {
    platform: &'a mut P,
    layout: Layout,
}

impl<'a, P: Platform> Installer<'a, P> {
    pub fn new(platform: &'a mut P, layout: Layout) -> Self {
        Self { platform, layout }
    }

    /// Run the machine to a terminal outcome, then perform the terminal
    /// behavior: message, power-lock release, best-effort residue cleanup
    /// and the on-screen hold.
    pub fn run(&mut self) -> Outcome {
        let mut phase = Phase::PreflightEnvironment;
        loop {
            info!("phase {phase:?}");
            match self.step(phase) {
                Transition::Next(next) => phase = next,
                Transition::Done(outcome) => {
                    self.finish(&outcome);
                    return outcome;
                }
            }
        }
    }

    /// Drive a single phase. Public so the transition table is testable
    /// phase by phase.
    pub fn step(&mut self, phase: Phase) -> Transition {
        match phase {
            Phase::PreflightEnvironment => self.preflight_environment(),
            Phase::PreflightPriorAttempt => self.preflight_prior_attempt(),
            Phase::ConsentRisks => self.consent(RISK_NOTICE, RISK_PROMPT, Phase::ConsentTerms),
            Phase::ConsentTerms => self.consent(TERMS_NOTICE, TERMS_PROMPT, Phase::CleanResidue),
            Phase::CleanResidue => self.clean_residue(),
            Phase::CopyInput => self.copy_input(),
            Phase::VerifyInput => self.verify_input(),
            Phase::ExtractPayload => self.extract_payload(),
            Phase::RewriteConfig => self.rewrite_config(),
            Phase::Handoff => self.handoff(),
        }
    }

    fn fail(&self, phase: Phase, error: InstallError) -> Transition {
        Transition::Done(Outcome::Failed { phase, error })
    }

    fn preflight_environment(&mut self) -> Transition {
        let phase = Phase::PreflightEnvironment;
        self.platform.show(BANNER);
        self.platform.power_lock();

        if !self.platform.unsafe_homebrew_enabled() {
            return self.fail(phase, InstallError::UnsafeHomebrewDisabled);
        }

        let percent = self.platform.battery_percent();
        if percent < MIN_BATTERY_PERCENT {
            return self.fail(phase, InstallError::LowBattery { percent });
        }

        // Loading the diagnostic module proves the privileged load path
        // works and that no conflicting module already occupies it.
        let handle = match self.platform.load_start_module(&self.layout.diag_module()) {
            Ok(handle) => handle,
            Err(code) => return self.fail(phase, InstallError::PluginConflict(code)),
        };
        if let Err(code) = self.platform.stop_unload_module(handle) {
            return self.fail(phase, InstallError::DiagUnload(code));
        }

        Transition::Next(Phase::PreflightPriorAttempt)
    }

    fn preflight_prior_attempt(&mut self) -> Transition {
        let phase = Phase::PreflightPriorAttempt;
        let block = match self.platform.read_master_block() {
            Ok(block) => block,
            Err(err) => return self.fail(phase, InstallError::DeviceProbe(err)),
        };
        if preflight::is_foreign_boot_record(&block) {
            return self.fail(phase, InstallError::PriorInstallPresent);
        }

        let input = self.layout.input_pup();
        if fs::metadata(&input).is_err() {
            return self.fail(phase, InstallError::InputMissing(input.display().to_string()));
        }

        Transition::Next(Phase::ConsentRisks)
    }

    fn consent(&mut self, notice: &str, prompt: &str, next: Phase) -> Transition {
        self.platform.show(notice);
        self.platform.show("Continues in 20 seconds.\n\n");
        self.platform.sleep(CONSENT_WAIT);
        self.platform.show(prompt);

        loop {
            let buttons = self.platform.poll_buttons();
            if buttons.contains(Buttons::ACCEPT) {
                return Transition::Next(next);
            }
            if buttons.contains(Buttons::CANCEL) {
                return Transition::Done(Outcome::Cancelled);
            }
            self.platform.sleep(POLL_PERIOD);
        }
    }

    fn clean_residue(&mut self) -> Transition {
        let phase = Phase::CleanResidue;
        self.platform.show("Cleaning the staging area...");
        let residue = self.layout.residue_paths();
        cleanup::clean_all(&residue);
        if let Err(err) = cleanup::verify_all_absent(&residue) {
            return self.fail(phase, err.into());
        }
        self.step_ok();
        Transition::Next(Phase::CopyInput)
    }

    fn copy_input(&mut self) -> Transition {
        let phase = Phase::CopyInput;
        self.platform.show("Copying the update container...");
        if let Err(err) = fs::create_dir_all(&self.layout.staging_dir) {
            return self.fail(phase, InstallError::Copy(err));
        }
        if let Err(err) = transfer::copy(&self.layout.input_pup(), &self.layout.staged_pup()) {
            return self.fail(phase, InstallError::Copy(err));
        }
        self.step_ok();
        Transition::Next(Phase::VerifyInput)
    }

    fn verify_input(&mut self) -> Transition {
        let phase = Phase::VerifyInput;
        self.platform.show("Verifying the update container...");
        if let Err(err) = transfer::verify(&self.layout.staged_pup(), &self.layout.pup_digest) {
            return self.fail(phase, err.into());
        }
        self.step_ok();
        Transition::Next(Phase::ExtractPayload)
    }

    fn extract_payload(&mut self) -> Transition {
        let phase = Phase::ExtractPayload;
        self.platform.show("Extracting the updater executable...");
        if let Err(err) = container::extract(
            &self.layout.staged_pup(),
            PAYLOAD_ENTRY_ID,
            &self.layout.staged_swu(),
        ) {
            return self.fail(phase, err.into());
        }
        self.step_ok();
        Transition::Next(Phase::RewriteConfig)
    }

    fn rewrite_config(&mut self) -> Transition {
        let phase = Phase::RewriteConfig;
        self.platform.show("Removing old loader files...");
        cleanup::clean_all(&self.layout.legacy_paths());
        self.step_ok();

        self.platform.show("Writing new config files...");
        if let Err(err) = config::write_loader_config(&self.layout.primary_config(), false) {
            return self.fail(phase, InstallError::ConfigWrite(err));
        }
        if let Err(err) = config::write_loader_config(&self.layout.recovery_config(), true) {
            return self.fail(phase, InstallError::ConfigWrite(err));
        }
        self.step_ok();
        Transition::Next(Phase::Handoff)
    }

    fn handoff(&mut self) -> Transition {
        let phase = Phase::Handoff;
        self.platform.show("\n");
        self.platform.show(NO_TOUCH_NOTICE);
        self.platform.sleep(Duration::from_secs(5));
        self.platform.show("Have a safe trip and see you on the other side.\n\n");
        self.platform.sleep(Duration::from_secs(3));
        self.platform.show("Starting the updater...\n");
        self.platform.sleep(Duration::from_secs(1));

        self.platform.power_unlock();

        match self.platform.load_start_module(&self.layout.handoff_module()) {
            Ok(_) => Transition::Done(Outcome::HandedOff),
            Err(code) => self.fail(phase, InstallError::HandoffLoad(code)),
        }
    }

    fn step_ok(&mut self) {
        self.platform.show("OK\n");
        self.platform.sleep(PACING);
    }

    fn finish(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::HandedOff => {
                // A successful load never returns control; the end of this
                // wait being reached is itself the failure signal.
                self.platform.sleep(HANDOFF_WAIT);
                self.platform.show("Error starting the updater.\n");
                cleanup::clean_all(&self.layout.residue_paths());
                self.platform.sleep(SHORT_HOLD);
            }
            Outcome::Cancelled => {
                self.platform.show("Canceled by user.\n");
                self.platform.power_unlock();
                cleanup::clean_all(&self.layout.residue_paths());
                self.platform.sleep(SHORT_HOLD);
            }
            Outcome::Failed { error, .. } => {
                self.platform.show(&format!("{error}\n"));
                self.platform.power_unlock();
                cleanup::clean_all(&self.layout.residue_paths());
                self.platform.sleep(error.hold());
            }
        }
    }
}
