//! Waits on a process through pidfd_open(2), which hands out a pollable
//! descriptor for any process we can see, child or not.

use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::Once;

pub use crate::wait_poll::translate_pid;

static ADOPT_ORPHANS: Once = Once::new();

/// Makes this process the reaper of its orphaned descendants.  A command
/// whose submitting shell has exited is then reparented to us and stays a
/// zombie until we wait for it, instead of being reaped by init before it
/// can be opened.
pub fn adopt_orphans() {
    ADOPT_ORPHANS.call_once(|| {
        // Safety: prctl with integer arguments only.
        if unsafe { libc::prctl(libc::PR_SET_CHILD_SUBREAPER, 1 as libc::c_ulong) } != 0 {
            tracing::debug!(
                "PR_SET_CHILD_SUBREAPER: {}",
                std::io::Error::last_os_error()
            );
        }
    });
}

pub enum ProcessHandle {
    Pidfd { fd: OwnedFd, pid: libc::pid_t },
    /// Kernels before 5.3 lack pidfd_open.
    Probe(crate::wait_poll::ProcessHandle),
}

impl ProcessHandle {
    pub fn open(pid: libc::pid_t) -> std::io::Result<Self> {
        // Safety: pidfd_open takes no pointers.
        let fd = unsafe { libc::syscall(libc::SYS_pidfd_open, pid, 0) };
        if fd < 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ENOSYS) {
                return crate::wait_poll::ProcessHandle::open(pid).map(ProcessHandle::Probe);
            }
            return Err(err);
        }
        // Safety: the kernel just gave us this descriptor and nothing else owns it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd as libc::c_int) };
        Ok(ProcessHandle::Pidfd { fd, pid })
    }

    /// Blocks until the process exits, and reaps it if it is our child.
    pub fn wait(&self) -> std::io::Result<()> {
        let (fd, pid) = match self {
            ProcessHandle::Pidfd { fd, pid } => (fd, *pid),
            ProcessHandle::Probe(probe) => return probe.wait(),
        };
        let mut pollfd = libc::pollfd {
            fd: fd.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            // Safety: pollfd is a single valid entry.
            if unsafe { libc::poll(&mut pollfd, 1, -1) } >= 0 {
                break;
            }
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
        reap(pid);
        Ok(())
    }
}

/// Collects pid's exit status if it is our child.  The pidfd can signal a
/// moment before the child is reapable, so this blocks rather than using
/// WNOHANG; the process has already exited, so the block is brief.
fn reap(pid: libc::pid_t) {
    loop {
        // Safety: a null status pointer is allowed.
        if unsafe { libc::waitpid(pid, std::ptr::null_mut(), 0) } >= 0 {
            return;
        }
        // ECHILD: not ours, someone else reaps it.
        if std::io::Error::last_os_error().kind() != std::io::ErrorKind::Interrupted {
            return;
        }
    }
}
