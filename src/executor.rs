//! The serialized executor.
//!
//! system() on Cygwin corrupts its own state when two threads call it at
//! once.  A lock around the whole call fixes that, but then commands run one
//! at a time.  Here the lock covers only a system() call that puts the real
//! command in the background and records its pid in a handoff file; the
//! caller then waits on that pid with the lock released.

use crate::handoff::HandoffFile;
use crate::{native, trace, wait, Error};
use std::ffi::CStr;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Serializes every submission in the process, whichever executor makes it.
/// The value is the number of submissions so far and names handoff files.
static SUBMISSIONS: Mutex<u64> = Mutex::new(0);

static GLOBAL: OnceLock<Executor> = OnceLock::new();

fn lock_submissions() -> MutexGuard<'static, u64> {
    SUBMISSIONS.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where handoff files are written.  Empty means the current directory.
    pub handoff_dir: PathBuf,
    /// Handoff file name prefix; the submission number follows after a `.`.
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            handoff_dir: PathBuf::new(),
            prefix: "_safesys_system_".to_string(),
        }
    }
}

/// Sets the configuration of the global executor.  Once the global executor
/// exists, because of an earlier configure() or any call through it, the
/// config is handed back unused.
pub fn configure(config: Config) -> Result<(), Config> {
    GLOBAL
        .set(Executor::new(config))
        .map_err(|executor| executor.config)
}

#[derive(Debug)]
pub struct Executor {
    config: Config,
}

impl Executor {
    pub fn new(config: Config) -> Self {
        Executor { config }
    }

    /// The process-wide executor, created with the default config on first
    /// use unless configure() got there first.
    pub fn global() -> &'static Executor {
        GLOBAL.get_or_init(|| Executor::new(Config::default()))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs cmd and blocks until the command itself, not just the shell that
    /// started it, has exited.  Returns the status system() reported for the
    /// submitting shell.
    pub fn run(&self, cmd: &str) -> Result<i32, Error> {
        let result = self.run_impl(cmd);
        if let Err(err) = &result {
            tracing::debug!("{}", err);
        }
        result
    }

    fn run_impl(&self, cmd: &str) -> Result<i32, Error> {
        let cmd = native::command(cmd)?;
        let (status, handoff) = trace::scope("submit", || self.submit(&cmd))?;
        let pid = handoff.take_pid()?;
        tracing::debug!(pid, status, "submitted");
        let handle = wait::ProcessHandle::open(wait::translate_pid(pid))
            .map_err(|source| Error::HandleUnavailable { pid, source })?;
        trace::scope("wait", || handle.wait()).map_err(|source| Error::Wait { pid, source })?;
        Ok(status)
    }

    /// Starts cmd in the background while holding the submission lock.
    /// The lock is released on return, however long cmd goes on running.
    fn submit(&self, cmd: &CStr) -> Result<(i32, HandoffFile), Error> {
        wait::adopt_orphans();
        let mut submissions = lock_submissions();
        let handoff = HandoffFile::new(
            &self.config.handoff_dir,
            &self.config.prefix,
            *submissions,
        );
        *submissions += 1;

        handoff
            .clear()
            .map_err(|source| Error::HandoffUnavailable {
                path: handoff.path().to_path_buf(),
                source,
            })?;
        let augmented = handoff.augment(cmd)?;
        tracing::debug!("*SYSTEM* >>{}<<", augmented.to_string_lossy());
        let status = native::system(&augmented);
        Ok((status, handoff))
    }
}
