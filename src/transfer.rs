//! Transfer gateway: drive the external synchronization tool.
//!
//! The tool does the byte-level work. Here we only hand it a source and a
//! destination, and read back remote content hashes for change detection.

use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use tracing::info;

use crate::model::Direction;

/// Hash name passed to `rclone lsf --hash`. Must match the local
/// fingerprint's content hash.
pub const REMOTE_HASH: &str = "md5";

/// Errors from the external synchronization tool.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// The external synchronization tool's query and transfer surface.
pub trait SyncTool {
    /// Content hashes of every file under a remote endpoint, one per file.
    ///
    /// A file the backend cannot hash is reported as an empty string.
    fn list_hashes(&self, endpoint: &str) -> Result<Vec<String>, TransferError>;

    /// Make `destination` match `source`.
    fn sync(&self, source: &str, destination: &str) -> Result<(), TransferError>;
}

/// Transfer a task's directories in the given direction.
///
/// Upload makes the remote match local; download makes local match the remote.
/// No retry: a failure here is retried on a later tick, because the
/// fingerprints will still differ.
pub fn transfer(
    tool: &impl SyncTool,
    direction: Direction,
    local: &Path,
    remote: &str,
) -> Result<(), TransferError> {
    let local = local.to_string_lossy();
    match direction {
        Direction::Upload => {
            info!("Uploading: {local} → {remote}");
            tool.sync(&local, remote)
        }
        Direction::Download => {
            info!("Downloading: {remote} → {local}");
            tool.sync(remote, &local)
        }
    }
}

/// `rclone` driven through its CLI.
#[derive(Debug, Clone)]
pub struct Rclone {
    program: PathBuf,
}

impl Rclone {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run rclone with the given args and return its stdout on success.
    fn run(&self, args: &[&str]) -> Result<String, TransferError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| TransferError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransferError::Failed {
                command: format!("rclone {}", args.join(" ")),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SyncTool for Rclone {
    fn list_hashes(&self, endpoint: &str) -> Result<Vec<String>, TransferError> {
        let stdout = self.run(&[
            "lsf",
            "--recursive",
            "--files-only",
            "--format",
            "h",
            "--hash",
            REMOTE_HASH,
            endpoint,
        ])?;
        Ok(parse_hash_listing(&stdout))
    }

    fn sync(&self, source: &str, destination: &str) -> Result<(), TransferError> {
        self.run(&["sync", source, destination]).map(|_| ())
    }
}

/// One hash per line, lowercased. Blank lines are files without a hash.
fn parse_hash_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|line| line.trim().to_ascii_lowercase())
        .collect()
}
