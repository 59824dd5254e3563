//! Waiting on a process that is not our child.
//!
//! The command we wait for was started by the shell that system() ran, so
//! waitpid() can't see it.  Each platform instead opens some handle on the
//! pid that becomes ready when the process exits.  `translate_pid` maps a
//! shell pid into whatever namespace `ProcessHandle::open` expects, and
//! `adopt_orphans` keeps exited commands around to be opened where the OS
//! allows it.

#[cfg(target_os = "cygwin")]
pub use crate::wait_cygwin::{adopt_orphans, translate_pid, ProcessHandle};
#[cfg(target_os = "linux")]
pub use crate::wait_pidfd::{adopt_orphans, translate_pid, ProcessHandle};
#[cfg(all(unix, not(any(target_os = "cygwin", target_os = "linux"))))]
pub use crate::wait_poll::{adopt_orphans, translate_pid, ProcessHandle};
