//! Waits on a process through its Windows handle.
//!
//! Cygwin pids are not Windows pids, so a pid must be translated before it
//! is handed to OpenProcess.

use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, HANDLE, WAIT_FAILED};
use windows_sys::Win32::System::Threading::{
    OpenProcess, WaitForSingleObject, INFINITE, PROCESS_SYNCHRONIZE,
};

/// From <sys/cygwin.h>.
const CW_CYGWIN_PID_TO_WINPID: libc::c_uint = 18;

extern "C" {
    fn cygwin_internal(what: libc::c_uint, ...) -> usize;
}

fn win_error(func: &str) -> std::io::Error {
    // Safety: reads thread-local error state.
    let code = unsafe { GetLastError() };
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", func, code))
}

/// Nothing to set up; waits go through Windows process handles.
pub fn adopt_orphans() {}

/// Maps a Cygwin pid to the Windows pid of the same process.
pub fn translate_pid(pid: libc::pid_t) -> u32 {
    // Safety: CW_CYGWIN_PID_TO_WINPID takes a single pid_t.
    unsafe { cygwin_internal(CW_CYGWIN_PID_TO_WINPID, pid) as u32 }
}

/// A process handle with only SYNCHRONIZE access, closed on drop.
pub struct ProcessHandle(HANDLE);

impl ProcessHandle {
    pub fn open(winpid: u32) -> std::io::Result<Self> {
        // Safety: plain call; failure is a null handle.
        let handle = unsafe { OpenProcess(PROCESS_SYNCHRONIZE, 0, winpid) };
        if handle.is_null() {
            return Err(win_error("OpenProcess"));
        }
        Ok(ProcessHandle(handle))
    }

    /// Blocks until the process exits.
    pub fn wait(&self) -> std::io::Result<()> {
        // Safety: self.0 is an open process handle.
        if unsafe { WaitForSingleObject(self.0, INFINITE) } == WAIT_FAILED {
            return Err(win_error("WaitForSingleObject"));
        }
        Ok(())
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // Safety: self.0 is open and closed exactly once.
        unsafe { CloseHandle(self.0) };
    }
}
