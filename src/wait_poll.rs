//! Waits on a process by probing it with kill(pid, 0) until it is gone.
//! Used where the OS offers no waitable handle on a process that isn't
//! our child.

use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn translate_pid(pid: libc::pid_t) -> libc::pid_t {
    pid
}

/// No way to adopt orphans here; an orphaned command goes to init.
#[cfg(not(target_os = "linux"))]
pub fn adopt_orphans() {}

fn alive(pid: libc::pid_t) -> std::io::Result<bool> {
    // Safety: signal 0 only checks for existence and permission.
    if unsafe { libc::kill(pid, 0) } == 0 {
        return Ok(true);
    }
    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Ok(false),
        // Exists, but belongs to someone else.
        Some(libc::EPERM) => Ok(true),
        _ => Err(err),
    }
}

/// Reaps pid if it is a child of ours that has exited.  Some(true) once
/// reaped, Some(false) while it runs, None if it isn't our child.
fn reaped(pid: libc::pid_t) -> std::io::Result<Option<bool>> {
    // Safety: a null status pointer is allowed.
    let ret = unsafe { libc::waitpid(pid, std::ptr::null_mut(), libc::WNOHANG) };
    if ret == pid {
        return Ok(Some(true));
    }
    if ret == 0 {
        return Ok(Some(false));
    }
    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ECHILD) => Ok(None),
        Some(libc::EINTR) => Ok(Some(false)),
        _ => Err(err),
    }
}

fn gone(pid: libc::pid_t) -> std::io::Result<bool> {
    match reaped(pid)? {
        Some(done) => Ok(done),
        None => Ok(!alive(pid)?),
    }
}

pub struct ProcessHandle(libc::pid_t);

impl ProcessHandle {
    pub fn open(pid: libc::pid_t) -> std::io::Result<Self> {
        if !alive(pid)? {
            return Err(std::io::Error::from_raw_os_error(libc::ESRCH));
        }
        Ok(ProcessHandle(pid))
    }

    /// Blocks until the process is gone.  Our own children are reaped here;
    /// anyone else's zombie counts as alive until its parent reaps it.
    pub fn wait(&self) -> std::io::Result<()> {
        while !gone(self.0)? {
            std::thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }
}
