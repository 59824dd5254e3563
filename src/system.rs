//! The thread-safe system() itself.
//!
//! Where the native system() is unsafe to call from several threads at once
//! (Cygwin), commands go through the serialized executor.  Everywhere else
//! this is a plain call to the native system().  Which one is decided when
//! the crate is built.

use crate::Error;

#[cfg(all(windows, feature = "serialized"))]
compile_error!("the serialized executor needs a POSIX shell and is not available on Windows");

/// What system() returns when the command's completion couldn't be tracked.
pub const FAILURE: i32 = -1;

/// Whether this build routes commands through the serialized executor.
pub const SERIALIZED: bool = cfg!(any(target_os = "cygwin", feature = "serialized"));

/// Runs cmd through the shell, blocking until it has finished, and returns
/// the status system() reported.
#[cfg(any(target_os = "cygwin", feature = "serialized"))]
pub fn run(cmd: &str) -> Result<i32, Error> {
    crate::executor::Executor::global().run(cmd)
}

/// Runs cmd through the shell, blocking until it has finished, and returns
/// the status system() reported.
#[cfg(not(any(target_os = "cygwin", feature = "serialized")))]
pub fn run(cmd: &str) -> Result<i32, Error> {
    let cmd = crate::native::command(cmd)?;
    Ok(crate::trace::scope("system", || crate::native::system(&cmd)))
}

/// Like run(), but folds every failure into FAILURE, the way callers of the
/// C system() expect.
pub fn system(cmd: &str) -> i32 {
    run(cmd).unwrap_or(FAILURE)
}
