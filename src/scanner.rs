use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, info};

use crate::config::Config;

/// Fixed option set for every scan, safe for unprivileged lab use:
/// skip host discovery (`-Pn`), scan the top 100 common ports, TCP connect
/// scan (`-sT`, no root needed), light service fingerprinting, XML report
/// on stdout (`-oX -`). The target is appended as the final argument.
const SCAN_ARGS: &[&str] = &[
    "-T4",
    "--top-ports",
    "100",
    "-sT",
    "-sV",
    "--version-light",
    "-Pn",
    "-oX",
    "-",
];

/// Exit statuses accepted as a completed scan. nmap exits 1 for benign
/// partial outcomes such as some ports being unreachable.
const ACCEPTED_STATUSES: &[i32] = &[0, 1];

/// Failure kinds of one external scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scan tool failed ({status}): {stderr}")]
    ToolFailed { status: String, stderr: String },
    #[error("scan did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Run one scan of the configured target and return the raw XML report text.
///
/// The external process is bounded by `config.scan_timeout`; on expiry the
/// child is killed and the run fails with `DeadlineExceeded`. No retries.
pub async fn run_scan(config: &Config) -> Result<String, ScanError> {
    info!(target = %config.target, "starting scan");

    let mut cmd = Command::new(&config.nmap_path);
    cmd.args(SCAN_ARGS)
        .arg(&config.target)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = match time::timeout(config.scan_timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ScanError::Launch {
                tool: config.nmap_path.clone(),
                source: e,
            })
        }
        Err(_) => return Err(ScanError::DeadlineExceeded(config.scan_timeout)),
    };

    debug!(code = ?output.status.code(), "scan process exited");
    evaluate(output.status.code(), &output.stdout, &output.stderr)
}

/// Apply the exit-status policy to a finished process: statuses in
/// `ACCEPTED_STATUSES` yield the report text, anything else (including
/// signal death, where no code is available) yields the captured stderr
/// as the failure detail.
fn evaluate(code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Result<String, ScanError> {
    match code {
        Some(c) if ACCEPTED_STATUSES.contains(&c) => {
            Ok(String::from_utf8_lossy(stdout).into_owned())
        }
        _ => {
            let status = match code {
                Some(c) => format!("exit status {c}"),
                None => "terminated by signal".to_string(),
            };
            Err(ScanError::ToolFailed {
                status,
                stderr: String::from_utf8_lossy(stderr).trim().to_string(),
            })
        }
    }
}
