//! The handoff file through which the submitting shell reports the pid of
//! the command it put in the background.
//!
//! The shell writes the pid before it exits, and system() only returns once
//! the shell has exited, so by the time anyone reads the file it is complete.

use crate::Error;
use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// One call's handoff file.  The file is deleted when this is dropped.
#[derive(Debug)]
pub struct HandoffFile {
    id: u64,
    path: PathBuf,
}

impl HandoffFile {
    /// Names the file for submission `id`: `<dir>/<prefix>.<id>`.
    pub fn new(dir: &Path, prefix: &str, id: u64) -> Self {
        HandoffFile {
            id,
            path: dir.join(format!("{}.{}", prefix, id)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes a file left under this name by an earlier process, so a stale
    /// pid is never mistaken for ours.
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    /// Wraps cmd so the shell runs it in the background and records the
    /// background task's pid in this file.
    pub fn augment(&self, cmd: &CStr) -> Result<CString, Error> {
        let mut buf = cmd.to_bytes().to_vec();
        buf.extend_from_slice(b" & printf '%d' \"$!\" > ");
        shell_quote(self.path.as_os_str().as_bytes(), &mut buf);
        CString::new(buf).map_err(|_| Error::InvalidCommand)
    }

    /// Reads the recorded pid.  The file is gone afterwards whether or not
    /// the read succeeded.
    pub fn take_pid(self) -> Result<i32, Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            Error::HandoffUnavailable {
                path: self.path.clone(),
                source,
            }
        })?;
        parse_pid(&content).ok_or_else(|| Error::HandoffUnavailable {
            path: self.path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("bad pid {:?}", content),
            ),
        })
    }
}

impl Drop for HandoffFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Appends s single-quoted for sh.
fn shell_quote(s: &[u8], out: &mut Vec<u8>) {
    out.push(b'\'');
    for &c in s {
        if c == b'\'' {
            out.extend_from_slice(b"'\\''");
        } else {
            out.push(c);
        }
    }
    out.push(b'\'');
}

fn parse_pid(content: &str) -> Option<i32> {
    content.trim().parse::<i32>().ok().filter(|&pid| pid > 0)
}
