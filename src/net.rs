// CLASSIFICATION: COMMUNITY
// Filename: net.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-22

//! Optional network acquisition of the update container.
//!
//! Present for completeness but not wired into the shipped flow: a missing
//! input container is fatal there, matching the release build.

use anyhow::{bail, Context, Result};
use log::info;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const HTTP_CHUNK: usize = 4096;
const USER_AGENT: &str = "Updater/1.00 libhttp/1.1";

/// Download `url` to `dst`, reporting percentage progress from the
/// advertised content length. No resume, no retry.
pub fn download(url: &str, dst: &Path) -> Result<()> {
    let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
    let response = agent.get(url).call().context("request failed")?;
    if response.status() != 200 {
        bail!("unexpected status {}", response.status());
    }
    let total: Option<u64> = response
        .header("Content-Length")
        .and_then(|v| v.parse().ok());

    let mut reader = response.into_reader();
    let mut out = File::create(dst).with_context(|| format!("create {}", dst.display()))?;
    let mut buf = [0u8; HTTP_CHUNK];
    let mut received: u64 = 0;
    let mut last_percent = 0;
    loop {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        out.write_all(&buf[..read])?;
        received += read as u64;
        if let Some(total) = total.filter(|t| *t > 0) {
            let percent = (received * 100 / total) as u32;
            if percent != last_percent {
                info!("downloaded {percent}%");
                last_percent = percent;
            }
        }
    }
    info!("downloaded {received} bytes to {}", dst.display());
    Ok(())
}
