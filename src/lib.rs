// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.4
// Date Modified: 2026-08-12
// Author: Lukas Bower

//! Staged firmware installer for the stock vendor updater.
//!
//! The library stages a vendor update container, verifies it by digest,
//! extracts the updater executable from the container's file table and
//! hands control to the stock updater after a privileged patch module has
//! altered its boot mode, its staging paths and its cleanup behavior.

/// Streaming digest engine used by every verification step.
pub mod digest;

/// Chunked copy and digest verification between storage locations.
pub mod transfer;

/// Vendor update container parsing and single-entry extraction.
pub mod container;

/// Residue removal and absence verification.
pub mod cleanup;

/// Raw-device probe for a prior incompatible installation.
pub mod preflight;

/// Loader configuration rewrite.
pub mod config;

/// Fixed storage paths and pinned constants.
pub mod layout;

/// Optional network acquisition of the update container.
pub mod net;

/// Host collaborator seams (console, power, input, module loader).
pub mod platform;

/// Installer phase machine.
pub mod orchestrator;

/// Runtime patch injection against the stock updater process.
pub mod patch;
