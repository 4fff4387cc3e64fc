//! Network identity: which wireless network, if any, the host is joined to.

use std::{path::PathBuf, process::Command};

use tracing::debug;

/// Answers "which network am I on right now?"
///
/// Every failure is "no network": callers never see an error.
pub trait NetworkProbe {
    fn current_network(&self) -> Option<String>;
}

/// Queries the connected SSID through `iwgetid -r`.
#[derive(Debug, Clone)]
pub struct Iwgetid {
    program: PathBuf,
}

impl Iwgetid {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl NetworkProbe for Iwgetid {
    fn current_network(&self) -> Option<String> {
        let output = match Command::new(&self.program).arg("-r").output() {
            Ok(output) => output,
            Err(e) => {
                debug!(program = %self.program.display(), error = %e, "network query failed to start");
                return None;
            }
        };

        // iwgetid exits non-zero when not associated with any network.
        if !output.status.success() {
            debug!(status = %output.status, "not connected to a wireless network");
            return None;
        }

        parse_ssid(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the SSID from `iwgetid -r` output. Blank means none.
fn parse_ssid(stdout: &str) -> Option<String> {
    let ssid = stdout.trim();
    (!ssid.is_empty()).then(|| ssid.to_string())
}
