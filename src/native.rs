//! The platform's own system(), which everything else is built on.

use crate::Error;
use std::ffi::{CStr, CString};

pub fn command(cmd: &str) -> Result<CString, Error> {
    CString::new(cmd).map_err(|_| Error::InvalidCommand)
}

/// Runs cmd through the shell and returns the raw status system() reports.
pub fn system(cmd: &CStr) -> i32 {
    // Safety: cmd is NUL-terminated and outlives the call.
    unsafe { libc::system(cmd.as_ptr()) }
}
