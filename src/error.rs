use std::path::PathBuf;

/// Why a command could not be run to completion.
///
/// A command that ran and exited non-zero is not an error; its status is
/// returned like any other.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The command can't be passed to system() as a C string.
    #[error("command contains a NUL byte")]
    InvalidCommand,

    /// The pid of the backgrounded command never arrived.
    #[error("handoff file {}: {source}", .path.display())]
    HandoffUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backgrounded command could not be opened for waiting, either
    /// because it already exited or because it never existed.
    #[error("open process {pid}: {source}")]
    HandleUnavailable { pid: i32, source: std::io::Error },

    /// The wait itself failed after the process was opened.
    #[error("wait for process {pid}: {source}")]
    Wait { pid: i32, source: std::io::Error },
}
