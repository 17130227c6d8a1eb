// CLASSIFICATION: COMMUNITY
// Filename: platform/vita.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-08-11

//! Device backend: raw SDK bindings behind the `vita` feature.

use super::{Buttons, ModuleHandle, Platform};
use crate::preflight::{MASTER_BLOCK_LEN, MASTER_BLOCK_OFFSET};
use std::ffi::CString;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::path::Path;
use std::time::Duration;

const CTRL_CROSS: u32 = 0x0000_4000;
const CTRL_RTRIGGER: u32 = 0x0000_0200;
const CTRL_R1: u32 = 0x0000_0800;

/// Devctl command probing the execution-permission state of a mount.
const DEVCTL_CHECK: c_uint = 0x3001;
/// Error code the probe returns while unrestricted execution is off.
const ERROR_RESTRICTED: c_int = 0x8001_0030_u32 as c_int;

#[repr(C)]
struct SceCtrlData {
    timestamp: u64,
    buttons: u32,
    lx: u8,
    ly: u8,
    rx: u8,
    ry: u8,
    reserved: [u8; 16],
}

extern "C" {
    fn sceIoDevctl(
        dev: *const c_char,
        cmd: c_uint,
        indata: *const c_void,
        inlen: c_uint,
        outdata: *mut c_void,
        outlen: c_uint,
    ) -> c_int;
    fn scePowerGetBatteryLifePercent() -> c_int;
    fn sceKernelPowerLock(lock_type: c_int) -> c_int;
    fn sceKernelPowerUnlock(lock_type: c_int) -> c_int;
    fn sceCtrlPeekBufferPositive(port: c_int, pad: *mut SceCtrlData, count: c_int) -> c_int;
    fn sceKernelDelayThread(usec: c_uint) -> c_int;
    fn taiLoadStartKernelModule(
        path: *const c_char,
        args: c_int,
        argp: *mut c_void,
        flags: c_int,
    ) -> c_int;
    fn taiStopUnloadKernelModule(
        modid: c_int,
        args: c_int,
        argp: *mut c_void,
        flags: c_int,
        opt: *mut c_void,
        res: *mut c_void,
    ) -> c_int;
}

/// Real device implementation of [`Platform`].
pub struct VitaPlatform;

impl VitaPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VitaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn c_path(path: &Path) -> CString {
    // Device paths never contain interior NULs.
    CString::new(path.to_string_lossy().as_bytes()).unwrap_or_default()
}

impl Platform for VitaPlatform {
    fn show(&mut self, text: &str) {
        print!("{text}");
    }

    fn unsafe_homebrew_enabled(&self) -> bool {
        let dev = CString::new("ux0:").unwrap_or_default();
        let ret = unsafe {
            sceIoDevctl(
                dev.as_ptr(),
                DEVCTL_CHECK,
                std::ptr::null(),
                0,
                std::ptr::null_mut(),
                0,
            )
        };
        ret != ERROR_RESTRICTED
    }

    fn battery_percent(&self) -> u32 {
        let percent = unsafe { scePowerGetBatteryLifePercent() };
        percent.max(0) as u32
    }

    fn power_lock(&mut self) {
        unsafe {
            sceKernelPowerLock(0);
        }
    }

    fn power_unlock(&mut self) {
        unsafe {
            sceKernelPowerUnlock(0);
        }
    }

    fn poll_buttons(&mut self) -> Buttons {
        let mut pad = SceCtrlData {
            timestamp: 0,
            buttons: 0,
            lx: 0,
            ly: 0,
            rx: 0,
            ry: 0,
            reserved: [0; 16],
        };
        unsafe {
            sceCtrlPeekBufferPositive(0, &mut pad, 1);
        }
        let mut buttons = Buttons::empty();
        if pad.buttons & CTRL_CROSS != 0 {
            buttons |= Buttons::ACCEPT;
        }
        if pad.buttons & (CTRL_RTRIGGER | CTRL_R1) != 0 {
            buttons |= Buttons::CANCEL;
        }
        buttons
    }

    fn sleep(&self, duration: Duration) {
        unsafe {
            sceKernelDelayThread(duration.as_micros().min(u128::from(c_uint::MAX)) as c_uint);
        }
    }

    fn read_master_block(&self) -> io::Result<Vec<u8>> {
        let mut device = File::open("sdstor0:int-lp-act-entire")?;
        device.seek(SeekFrom::Start(MASTER_BLOCK_OFFSET))?;
        let mut block = vec![0u8; MASTER_BLOCK_LEN];
        device.read_exact(&mut block)?;
        Ok(block)
    }

    fn load_start_module(&mut self, path: &Path) -> Result<ModuleHandle, i32> {
        let path = c_path(path);
        let ret = unsafe { taiLoadStartKernelModule(path.as_ptr(), 0, std::ptr::null_mut(), 0) };
        if ret < 0 {
            return Err(ret);
        }
        Ok(ModuleHandle(ret))
    }

    fn stop_unload_module(&mut self, handle: ModuleHandle) -> Result<(), i32> {
        let ret = unsafe {
            taiStopUnloadKernelModule(
                handle.0,
                0,
                std::ptr::null_mut(),
                0,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        if ret < 0 {
            return Err(ret);
        }
        Ok(())
    }
}
