//! A thread-safe system().
//!
//! POSIX allows system() to be unsafe to call from more than one thread,
//! and on Cygwin it is.  [`system`] is a drop-in replacement that, where
//! needed, serializes only the moment of starting a command and lets the
//! commands themselves run and be waited on in parallel.  Elsewhere it is
//! the native system().

pub mod cli;
mod error;
#[cfg(unix)]
pub mod executor;
#[cfg(unix)]
pub mod handoff;
mod native;
mod system;
pub mod trace;
#[cfg(unix)]
mod wait;
#[cfg(target_os = "cygwin")]
mod wait_cygwin;
#[cfg(target_os = "linux")]
mod wait_pidfd;
#[cfg(all(unix, not(target_os = "cygwin")))]
mod wait_poll;

pub use error::Error;
pub use system::{run, system, FAILURE, SERIALIZED};
